//! Scrape driver: fetch each bank page in order and extract its rates

use tracing::{info, warn};

use crate::config::{BankConfig, ScraperConfig};
use crate::error::FetchError;
use crate::extractor::{Extraction, RateExtractor, Skip};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::record::RateRecord;

/// Outcome for one bank
#[derive(Debug)]
pub struct BankReport {
    pub bank_name: String,
    pub url: String,
    pub containers: usize,
    pub records: Vec<RateRecord>,
    pub skipped: Vec<Skip>,
    /// Set when the page could not be fetched; the bank then has no records
    pub fetch_error: Option<FetchError>,
}

impl BankReport {
    fn from_extraction(bank: &BankConfig, extraction: Extraction) -> Self {
        Self {
            bank_name: bank.name.clone(),
            url: bank.url.clone(),
            containers: extraction.containers,
            records: extraction.records,
            skipped: extraction.skipped,
            fetch_error: None,
        }
    }

    fn fetch_failed(bank: &BankConfig, error: FetchError) -> Self {
        Self {
            bank_name: bank.name.clone(),
            url: bank.url.clone(),
            containers: 0,
            records: Vec::new(),
            skipped: Vec::new(),
            fetch_error: Some(error),
        }
    }
}

/// Outcome for a whole run, banks in configured order
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub banks: Vec<BankReport>,
}

impl ScrapeReport {
    /// All records, bank order then document order
    pub fn records(&self) -> Vec<RateRecord> {
        self.banks
            .iter()
            .flat_map(|bank| bank.records.iter().cloned())
            .collect()
    }

    pub fn into_records(self) -> Vec<RateRecord> {
        self.banks.into_iter().flat_map(|bank| bank.records).collect()
    }

    pub fn record_count(&self) -> usize {
        self.banks.iter().map(|bank| bank.records.len()).sum()
    }
}

/// Extract one bank's records from HTML that has already been fetched
pub fn scrape_html(bank: &BankConfig, html: &str) -> BankReport {
    let extraction = RateExtractor::for_bank(bank).extract_html(html);
    BankReport::from_extraction(bank, extraction)
}

pub struct Scraper<F = HttpFetcher> {
    config: ScraperConfig,
    fetcher: F,
}

impl Scraper<HttpFetcher> {
    pub fn new(config: ScraperConfig) -> Self {
        let fetcher = HttpFetcher::new(&config.fetch);
        Self { config, fetcher }
    }
}

impl<F: PageFetcher> Scraper<F> {
    pub fn with_fetcher(config: ScraperConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Fetch and extract one bank. Fetch failures are reported, not returned.
    pub fn scrape_bank(&self, bank: &BankConfig) -> BankReport {
        match self.fetcher.fetch(&bank.url) {
            Ok(html) => scrape_html(bank, &html),
            Err(e) => {
                warn!(bank = %bank.name, "error fetching page: {e}");
                BankReport::fetch_failed(bank, e)
            }
        }
    }

    /// Scrape every configured bank sequentially
    pub fn scrape_all(&self) -> ScrapeReport {
        let mut report = ScrapeReport::default();
        for bank in &self.config.banks {
            info!(bank = %bank.name, url = %bank.url, "scraping");
            let bank_report = self.scrape_bank(bank);
            info!(
                bank = %bank.name,
                found = bank_report.records.len(),
                skipped = bank_report.skipped.len(),
                "done"
            );
            report.banks.push(bank_report);
        }
        report
    }
}
