//! FuelWatch CLI — warehouse init, sample data, and the four pipeline stages.
//!
//! Commands:
//! - `run` — full pipeline: extract → transform → both loads in parallel
//! - `extract` / `transform` / `load` — individual stages, for the
//!   external scheduler to sequence (extract → transform → load×2 daily)
//! - `init-db` — create destination tables from the fixed DDL
//! - `seed` — write deterministic synthetic raw files for offline runs

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fuelwatch_runner::pipeline::{
    run_extract, run_load, run_loads_parallel, run_pipeline, run_transform,
};
use fuelwatch_runner::report::RunReport;
use fuelwatch_runner::sources::{self, write_brent_csv, write_currency_csv};
use fuelwatch_runner::synthetic::{
    synthetic_brent, synthetic_currency, synthetic_fuel, write_fuel_csv,
};
use fuelwatch_runner::warehouse::{open, Destination, DestinationReport};
use fuelwatch_runner::PipelineConfig;

#[derive(Parser)]
#[command(name = "fuelwatch", about = "FuelWatch — commodity/fuel/currency price ETL")]
struct Cli {
    /// Path to the TOML config. Defaults are used when the file is absent.
    #[arg(long, default_value = "fuelwatch.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: extract → transform → both loads in parallel.
    Run {
        /// Reuse existing raw files instead of fetching the quote APIs.
        #[arg(long, default_value_t = false)]
        offline: bool,
    },
    /// Fetch the quote APIs and land raw CSVs under {data_dir}/raw/.
    Extract {
        /// Only verify that raw files are already present.
        #[arg(long, default_value_t = false)]
        offline: bool,
    },
    /// Clean and aggregate all three series into Parquet artifacts.
    Transform,
    /// Load persisted artifacts into one or both destinations.
    Load {
        #[arg(long, value_enum, default_value_t = LoadTarget::Both)]
        target: LoadTarget,
    },
    /// Create destination tables from the fixed DDL.
    InitDb {
        #[arg(long, value_enum, default_value_t = LoadTarget::Both)]
        target: LoadTarget,
    },
    /// Write deterministic synthetic raw files for offline runs.
    Seed {
        /// First day of synthetic data (YYYY-MM-DD).
        #[arg(long, default_value = "2024-01-01")]
        start: String,

        /// Number of months to generate.
        #[arg(long, default_value_t = 3)]
        months: u32,

        /// Fuel archive rows per month.
        #[arg(long, default_value_t = 200)]
        rows_per_month: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LoadTarget {
    Staging,
    Analytics,
    Both,
}

impl std::fmt::Display for LoadTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LoadTarget::Staging => "staging",
            LoadTarget::Analytics => "analytics",
            LoadTarget::Both => "both",
        };
        f.write_str(name)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        PipelineConfig::from_file(&cli.config)?
    } else {
        PipelineConfig::default()
    };
    config.apply_env_overrides();

    match cli.command {
        Commands::Run { offline } => cmd_run(&config, offline),
        Commands::Extract { offline } => cmd_extract(&config, offline),
        Commands::Transform => cmd_transform(&config),
        Commands::Load { target } => cmd_load(&config, target),
        Commands::InitDb { target } => cmd_init_db(&config, target),
        Commands::Seed {
            start,
            months,
            rows_per_month,
        } => cmd_seed(&config, &start, months, rows_per_month),
    }
}

fn cmd_run(config: &PipelineConfig, offline: bool) -> Result<()> {
    let report = run_pipeline(config, offline)?;
    print_report(&report);

    if !report.all_loads_ok() {
        bail!("one or more destination loads failed; see the run report");
    }
    Ok(())
}

fn cmd_extract(config: &PipelineConfig, offline: bool) -> Result<()> {
    let summary = run_extract(config, offline)?;
    println!("Extract complete:");
    println!("  brent:    {} raw rows", summary.brent_rows);
    println!("  fuel:     {} raw rows", summary.fuel_rows);
    println!("  currency: {} raw rows", summary.currency_rows);
    Ok(())
}

fn cmd_transform(config: &PipelineConfig) -> Result<()> {
    let summary = run_transform(config)?;
    println!("Transform complete:");
    println!(
        "  brent:    {} clean rows, {} monthly",
        summary.brent.rows_out, summary.brent_monthly_rows
    );
    println!(
        "  fuel:     {} clean rows, {} monthly",
        summary.fuel.rows_out, summary.fuel_monthly_rows
    );
    println!(
        "  currency: {} clean rows, {} monthly",
        summary.currency.rows_out, summary.currency_monthly_rows
    );
    Ok(())
}

fn cmd_load(config: &PipelineConfig, target: LoadTarget) -> Result<()> {
    match target {
        LoadTarget::Staging => {
            print_destination(&run_load(config, Destination::Staging)?);
        }
        LoadTarget::Analytics => {
            print_destination(&run_load(config, Destination::Analytics)?);
        }
        LoadTarget::Both => {
            let (staging, analytics) = run_loads_parallel(config);
            let mut failed = false;
            for outcome in [staging, analytics] {
                match outcome {
                    Ok(report) => print_destination(&report),
                    Err(e) => {
                        eprintln!("Load failed: {e}");
                        failed = true;
                    }
                }
            }
            if failed {
                bail!("one or more destination loads failed");
            }
        }
    }
    Ok(())
}

fn cmd_init_db(config: &PipelineConfig, target: LoadTarget) -> Result<()> {
    let destinations: &[Destination] = match target {
        LoadTarget::Staging => &[Destination::Staging],
        LoadTarget::Analytics => &[Destination::Analytics],
        LoadTarget::Both => &[Destination::Staging, Destination::Analytics],
    };

    for &dest in destinations {
        let path = config.db_path(dest);
        open(dest, path)?;
        println!("Initialized {dest} warehouse at {}", path.display());
    }
    Ok(())
}

fn cmd_seed(config: &PipelineConfig, start: &str, months: u32, rows_per_month: usize) -> Result<()> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")?;
    let end = end_of_window(start, months);
    let raw = sources::raw_dir(config.data_dir());

    let brent = write_brent_csv(&raw, &synthetic_brent(start, end))?;
    let currency = write_currency_csv(&raw, &synthetic_currency(start, end))?;
    let fuel = write_fuel_csv(&raw, &synthetic_fuel(start, months, rows_per_month))?;

    println!("Seeded synthetic raw files:");
    for path in [brent, currency, fuel] {
        println!("  {}", path.display());
    }
    Ok(())
}

fn end_of_window(start: NaiveDate, months: u32) -> NaiveDate {
    use chrono::Datelike;
    let month0 = start.month0() + months.saturating_sub(1);
    let year = start.year() + (month0 / 12) as i32;
    let month = month0 % 12 + 1;
    fuelwatch_core::calendar::month_end(year, month)
}

fn print_destination(report: &DestinationReport) {
    println!("Loaded {}:", report.destination);
    for table in &report.tables {
        println!("  {:<18} {:>8} rows", table.table, table.rows);
    }
}

fn print_report(report: &RunReport) {
    println!();
    println!("=== Pipeline Run ===");
    println!("Run id:      {}", &report.run_id[..16.min(report.run_id.len())]);
    println!("Duration:    {:.2}s", report.duration_secs);
    println!(
        "Extract:     brent {} / fuel {} / currency {} raw rows",
        report.extract.brent_rows, report.extract.fuel_rows, report.extract.currency_rows
    );
    println!(
        "Transform:   brent {} / fuel {} / currency {} clean rows",
        report.transform.brent.rows_out,
        report.transform.fuel.rows_out,
        report.transform.currency.rows_out
    );
    print_outcome("staging", &report.load_staging);
    print_outcome("analytics", &report.load_analytics);
    println!();
}

fn print_outcome(name: &str, outcome: &fuelwatch_runner::report::StageOutcome) {
    use fuelwatch_runner::report::StageOutcome;
    match outcome {
        StageOutcome::Succeeded { report } => {
            println!("Load {name}: OK ({} rows)", report.total_rows());
        }
        StageOutcome::Failed { error } => {
            println!("Load {name}: FAILED — {error}");
        }
    }
}
