//! Domain types: typed rows and the controlled product vocabulary.

pub mod product;
pub mod rows;

pub use product::FuelProduct;
pub use rows::{
    BrentMonthlyRow, BrentRow, BrentStatsRow, CurrencyMonthlyRow, CurrencyRow, FuelMonthlyDetailRow,
    FuelMonthlyRow, FuelRow, RateSource,
};
