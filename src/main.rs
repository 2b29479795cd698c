//! Scrape configured bank pages and export their AER records.
//!
//! Usage:
//!   aer-scraper --config banks.toml --output rates.csv

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};

use aer_scraper::export::default_output_name;
use aer_scraper::logging::init_logging;
use aer_scraper::{export_to_path, ExportFormat, ScraperConfig, Scraper};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Jsonl,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => ExportFormat::Csv,
            Format::Jsonl => ExportFormat::JsonLines,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "aer-scraper")]
#[command(about = "Scrape savings AER rates from bank websites")]
struct Args {
    /// Bank configuration file (TOML)
    #[arg(short, long, default_value = "banks.toml")]
    config: PathBuf,

    /// Output file (defaults to savings_rates_<timestamp>.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: Format,

    /// Override the HTTP timeout from the config, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose).context("failed to initialise logging")?;

    let mut config = ScraperConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    if let Some(timeout) = args.timeout {
        config.fetch.timeout_secs = timeout;
    }

    println!("Loaded {} bank(s) from {}", config.banks.len(), args.config.display());

    let scraper = Scraper::new(config);
    let report = scraper.scrape_all();

    for bank in &report.banks {
        match &bank.fetch_error {
            Some(e) => println!("{}: no data ({e})", bank.bank_name),
            None => println!(
                "{}: {} rate(s) from {} container(s)",
                bank.bank_name,
                bank.records.len(),
                bank.containers
            ),
        }
        for record in &bank.records {
            println!(
                "  {} - {:.2}% AER",
                record.product_name(),
                record.aer_rate_percent()
            );
        }
    }

    let records = report.into_records();
    if records.is_empty() {
        println!("No rates were scraped");
        return Ok(());
    }

    let format = ExportFormat::from(args.format);
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(default_output_name(Utc::now(), format)));
    let written = export_to_path(&records, &output, format)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("Saved {written} rate(s) to {}", output.display());

    Ok(())
}
