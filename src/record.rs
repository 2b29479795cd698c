//! The extracted rate value object

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::error::ValidationError;

/// One bank/product/rate observation.
///
/// Fields are private and there are no mutators: a record that passed
/// [`RateRecord::new`] stays valid. A correction means building a new record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRecord {
    bank_name: String,
    product_name: String,
    aer_rate: f64,
    #[serde(rename = "url")]
    source_url: String,
    scraped_at: DateTime<Utc>,
}

impl RateRecord {
    /// Validate and build a record stamped with the current time
    pub fn new(
        bank_name: impl Into<String>,
        product_name: impl Into<String>,
        aer_rate: f64,
        source_url: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::observed_at(bank_name, product_name, aer_rate, source_url, Utc::now())
    }

    /// Validate and build a record with an explicit extraction time
    pub fn observed_at(
        bank_name: impl Into<String>,
        product_name: impl Into<String>,
        aer_rate: f64,
        source_url: impl Into<String>,
        scraped_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let bank_name = bank_name.into().trim().to_string();
        if bank_name.is_empty() {
            return Err(ValidationError::EmptyBankName);
        }

        let product_name = product_name.into().trim().to_string();
        if product_name.is_empty() {
            return Err(ValidationError::EmptyProductName);
        }

        // NaN fails the range check too
        if !(0.0..=1.0).contains(&aer_rate) {
            return Err(ValidationError::RateOutOfRange(aer_rate));
        }

        let source_url = source_url.into();
        Url::parse(&source_url).map_err(|e| ValidationError::MalformedUrl {
            url: source_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            bank_name,
            product_name,
            aer_rate,
            source_url,
            scraped_at,
        })
    }

    pub fn bank_name(&self) -> &str {
        &self.bank_name
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// AER as a fraction in `[0, 1]`
    pub fn aer_rate(&self) -> f64 {
        self.aer_rate
    }

    /// AER in percentage points
    pub fn aer_rate_percent(&self) -> f64 {
        self.aer_rate * 100.0
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn scraped_at(&self) -> DateTime<Utc> {
        self.scraped_at
    }

    /// Equal in every field except the extraction timestamp
    pub fn same_observation(&self, other: &RateRecord) -> bool {
        self.bank_name == other.bank_name
            && self.product_name == other.product_name
            && self.aer_rate == other.aer_rate
            && self.source_url == other.source_url
    }
}
