//! The canonical fuel product vocabulary.
//!
//! Raw archive rows label products with free-text descriptions; everything
//! downstream works on a fixed eight-value vocabulary. The mapping is
//! domain-fixed and versioned with the code, keyed by the lowercased raw
//! label. Labels outside the table (including the `n/d` placeholder the
//! archive uses for missing products) are unmappable and their rows are
//! dropped by the cleaner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight standardized product labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FuelProduct {
    NaftaGrado1,
    NaftaGrado2,
    NaftaGrado3,
    GasoilGrado2,
    GasoilGrado3,
    Gnc,
    Kerosene,
    Glpa,
}

impl FuelProduct {
    pub const ALL: [FuelProduct; 8] = [
        FuelProduct::NaftaGrado1,
        FuelProduct::NaftaGrado2,
        FuelProduct::NaftaGrado3,
        FuelProduct::GasoilGrado2,
        FuelProduct::GasoilGrado3,
        FuelProduct::Gnc,
        FuelProduct::Kerosene,
        FuelProduct::Glpa,
    ];

    /// Canonical label as it appears in clean artifacts and warehouse tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelProduct::NaftaGrado1 => "NAFTA GRADO 1",
            FuelProduct::NaftaGrado2 => "NAFTA GRADO 2",
            FuelProduct::NaftaGrado3 => "NAFTA GRADO 3",
            FuelProduct::GasoilGrado2 => "GASOIL GRADO 2",
            FuelProduct::GasoilGrado3 => "GASOIL GRADO 3",
            FuelProduct::Gnc => "GNC",
            FuelProduct::Kerosene => "KEROSENE",
            FuelProduct::Glpa => "GLPA",
        }
    }

    /// Look up a raw archive label. Matching is case-insensitive; anything
    /// not in the table returns `None`.
    pub fn from_raw_label(label: &str) -> Option<FuelProduct> {
        match label.trim().to_lowercase().as_str() {
            "nafta (común) hasta 92 ron" => Some(FuelProduct::NaftaGrado1),
            "nafta (super) entre 92 y 95 ron" => Some(FuelProduct::NaftaGrado2),
            "nafta (premium) de más de 95 ron" => Some(FuelProduct::NaftaGrado3),
            "gas oil grado 2" => Some(FuelProduct::GasoilGrado2),
            "gas oil grado 3" => Some(FuelProduct::GasoilGrado3),
            "gnc" => Some(FuelProduct::Gnc),
            "kerosene" => Some(FuelProduct::Kerosene),
            "glpa" => Some(FuelProduct::Glpa),
            _ => None,
        }
    }

    /// Parse a canonical label back into the enum (loader round trips).
    pub fn from_canonical(label: &str) -> Option<FuelProduct> {
        FuelProduct::ALL.iter().copied().find(|p| p.as_str() == label)
    }
}

impl fmt::Display for FuelProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_canonical_label_round_trips() {
        for product in FuelProduct::ALL {
            assert_eq!(FuelProduct::from_canonical(product.as_str()), Some(product));
        }
    }

    #[test]
    fn raw_labels_map_case_insensitively() {
        assert_eq!(
            FuelProduct::from_raw_label("GAS OIL GRADO 2"),
            Some(FuelProduct::GasoilGrado2)
        );
        assert_eq!(
            FuelProduct::from_raw_label("Nafta (Super) Entre 92 Y 95 Ron"),
            Some(FuelProduct::NaftaGrado2)
        );
    }

    #[test]
    fn placeholder_and_unknown_labels_are_unmappable() {
        assert_eq!(FuelProduct::from_raw_label("n/d"), None);
        assert_eq!(FuelProduct::from_raw_label("hydrogen"), None);
    }
}
