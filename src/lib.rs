//! AER scraper for bank savings pages
//!
//! Extracts the Annual Equivalent Rate of a named savings product from bank pages using
//! per-bank CSS selector configuration:
//! - Ordered selector fallbacks (first match wins)
//! - Product-type filtering on the product name
//! - Rate text normalization to a decimal fraction
//! - Validated, immutable rate records
//! - CSV / JSON-lines export

pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
pub mod fetch;
pub mod logging;
pub mod rate;
pub mod record;
pub mod scrape;
pub mod selectors;

pub use config::{BankConfig, FetchSettings, ScraperConfig, SelectorSpec};
pub use error::{
    ConfigError, ExportError, FetchError, RateParseError, SelectorError, SkipReason, ValidationError,
};
pub use export::{export_to_path, write_csv, write_json_lines, ExportFormat};
pub use extractor::{ContainerOutcome, Extraction, RateExtractor, Skip};
pub use fetch::{HttpFetcher, PageFetcher};
pub use rate::parse_rate;
pub use record::RateRecord;
pub use scrape::{scrape_html, BankReport, ScrapeReport, Scraper};
pub use selectors::{SelectScope, SelectorChain};
