//! Record export
//!
//! Columns: `bank_name, product_name, aer_rate, aer_rate_percent, url, scraped_at`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::ExportError;
use crate::record::RateRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    JsonLines,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::JsonLines => "jsonl",
        }
    }
}

/// Flat export row
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    bank_name: &'a str,
    product_name: &'a str,
    aer_rate: f64,
    aer_rate_percent: f64,
    url: &'a str,
    scraped_at: String,
}

impl<'a> From<&'a RateRecord> for ExportRow<'a> {
    fn from(record: &'a RateRecord) -> Self {
        Self {
            bank_name: record.bank_name(),
            product_name: record.product_name(),
            aer_rate: record.aer_rate(),
            aer_rate_percent: record.aer_rate_percent(),
            url: record.source_url(),
            scraped_at: record.scraped_at().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Write records as CSV with a header row. Returns the number of rows written.
pub fn write_csv<W: Write>(records: &[RateRecord], writer: W) -> Result<usize, ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(ExportRow::from(record))?;
    }
    wtr.flush()?;
    Ok(records.len())
}

/// Write records as JSON, one object per line
pub fn write_json_lines<W: Write>(records: &[RateRecord], mut writer: W) -> Result<usize, ExportError> {
    for record in records {
        serde_json::to_writer(&mut writer, &ExportRow::from(record))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Write records to `path`. Nothing is created when `records` is empty.
pub fn export_to_path<P: AsRef<Path>>(
    records: &[RateRecord],
    path: P,
    format: ExportFormat,
) -> Result<usize, ExportError> {
    if records.is_empty() {
        tracing::info!("no rates to save");
        return Ok(0);
    }

    let path = path.as_ref();
    let writer = BufWriter::new(File::create(path)?);
    let written = match format {
        ExportFormat::Csv => write_csv(records, writer)?,
        ExportFormat::JsonLines => write_json_lines(records, writer)?,
    };
    tracing::info!(path = %path.display(), "saved {written} rate(s)");
    Ok(written)
}

/// `savings_rates_YYYYMMDD_HHMMSS.<ext>`
pub fn default_output_name(now: DateTime<Utc>, format: ExportFormat) -> String {
    format!(
        "savings_rates_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}
