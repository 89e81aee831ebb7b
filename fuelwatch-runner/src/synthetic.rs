//! Deterministic synthetic raw data.
//!
//! Lets the pipeline be exercised end to end with no network access and no
//! archive download: `seed` writes raw CSVs shaped exactly like the real
//! sources, messy headers included. Generators are seeded from the series
//! name, so repeated seeds produce identical files.

use crate::sources::{BrentQuote, CurrencyQuote, FUEL_RAW};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

use crate::sources::SourceError;

fn rng_for(name: &str) -> StdRng {
    let seed: [u8; 32] = *blake3::hash(name.as_bytes()).as_bytes();
    StdRng::from_seed(seed)
}

/// Random-walk Brent settlements on weekdays.
pub fn synthetic_brent(start: NaiveDate, end: NaiveDate) -> Vec<BrentQuote> {
    let mut rng = rng_for("brent");
    let mut price = 80.0_f64;
    let mut quotes = Vec::new();
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }
        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        price *= 1.0 + daily_return;
        quotes.push(BrentQuote {
            date: current,
            price: (price * 100.0).round() / 100.0,
        });
        current += chrono::Duration::days(1);
    }

    quotes
}

/// Daily official/parallel quote pairs; the parallel rate tracks the
/// official one with a drifting gap.
pub fn synthetic_currency(start: NaiveDate, end: NaiveDate) -> Vec<CurrencyQuote> {
    let mut rng = rng_for("currency");
    let mut official = 100.0_f64;
    let mut quotes = Vec::new();
    let mut current = start;

    while current <= end {
        official *= 1.0 + rng.gen_range(-0.002..0.004);
        let gap: f64 = rng.gen_range(1.6..2.0);
        let parallel = official * gap;
        let date = current.format("%Y-%m-%d").to_string();

        quotes.push(CurrencyQuote {
            date: date.clone(),
            source: "Oficial".to_string(),
            value_buy: (official * 0.98 * 100.0).round() / 100.0,
            value_sell: (official * 100.0).round() / 100.0,
        });
        quotes.push(CurrencyQuote {
            date,
            source: "Blue".to_string(),
            value_buy: ((parallel - 5.0) * 100.0).round() / 100.0,
            value_sell: (parallel * 100.0).round() / 100.0,
        });
        current += chrono::Duration::days(1);
    }

    quotes
}

/// One synthetic archive row, shaped like the raw file: free-text labels,
/// month-granularity period strings.
#[derive(Debug, Clone)]
pub struct FuelSample {
    pub period: String,
    pub province: String,
    pub flag: String,
    pub product: String,
    pub pump_price: f64,
    pub volume: f64,
}

const PROVINCES: &[&str] = &["Buenos Aires", "Córdoba", "Santa Fe", "Mendoza", "Salta"];
const FLAGS: &[&str] = &["YPF", "Shell", "Axion", "Puma"];
const RAW_LABELS: &[&str] = &[
    "NAFTA (SUPER) ENTRE 92 Y 95 RON",
    "NAFTA (PREMIUM) DE MÁS DE 95 RON",
    "NAFTA (COMÚN) HASTA 92 RON",
    "GAS OIL GRADO 2",
    "GAS OIL GRADO 3",
    "GNC",
    "KEROSENE",
    "GLPA",
    "N/D",
];

/// Archive-shaped pump-price readings covering `months` months from
/// `start`. A small fraction carries the `N/D` placeholder or a sentinel
/// price, the way the real archive does.
pub fn synthetic_fuel(start: NaiveDate, months: u32, rows_per_month: usize) -> Vec<FuelSample> {
    let mut rng = rng_for("fuel");
    let mut samples = Vec::new();

    for offset in 0..months {
        let month0 = start.month0() + offset;
        let year = start.year() + (month0 / 12) as i32;
        let month = month0 % 12 + 1;
        let period = format!("{year}/{month:02}");

        for _ in 0..rows_per_month {
            let product = RAW_LABELS[rng.gen_range(0..RAW_LABELS.len())].to_string();
            let pump_price = if rng.gen_bool(0.02) {
                rng.gen_range(0.0..1.0) // sentinel reading
            } else {
                (rng.gen_range(90.0..400.0_f64) * 100.0).round() / 100.0
            };
            samples.push(FuelSample {
                period: period.clone(),
                province: PROVINCES[rng.gen_range(0..PROVINCES.len())].to_string(),
                flag: FLAGS[rng.gen_range(0..FLAGS.len())].to_string(),
                product,
                pump_price,
                volume: (rng.gen_range(100.0..50_000.0_f64)).round(),
            });
        }
    }

    samples
}

/// Write the synthetic archive with the real file's mixed-case headers.
pub fn write_fuel_csv(dir: &Path, samples: &[FuelSample]) -> Result<PathBuf, SourceError> {
    std::fs::create_dir_all(dir).map_err(|source| SourceError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    let path = dir.join(FUEL_RAW);

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record([
        "Periodo",
        "Provincia",
        "Bandera",
        "Producto",
        "Precio Surtidor",
        "Volumen",
    ])?;
    for sample in samples {
        writer.write_record([
            sample.period.clone(),
            sample.province.clone(),
            sample.flag.clone(),
            sample.product.clone(),
            sample.pump_price.to_string(),
            sample.volume.to_string(),
        ])?;
    }
    writer.flush().map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path)
}
