//! Error types
//!
//! Hard errors (`ConfigError`, `ExportError`) stop the caller. Everything that can go
//! wrong for a single product is a soft failure and ends up as a [`SkipReason`].

use thiserror::Error;

/// A selector chain could not be built from its configured strings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("selector chain is empty")]
    Empty,

    #[error("invalid CSS selector '{selector}': {reason}")]
    Invalid { selector: String, reason: String },
}

/// Rate text held no recognizable number
#[derive(Error, Debug, Clone, PartialEq)]
#[error("no numeric rate found in '{text}'")]
pub struct RateParseError {
    pub text: String,
}

/// A `RateRecord` invariant was violated
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("bank name is empty")]
    EmptyBankName,

    #[error("product name is empty")]
    EmptyProductName,

    #[error("AER {0} is outside [0, 1]")]
    RateOutOfRange(f64),

    #[error("source url '{url}' is not well-formed: {reason}")]
    MalformedUrl { url: String, reason: String },
}

/// Why a single container produced no record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("no element matched {field} selectors [{}]", .tried.join(", "))]
    SelectorMiss { field: &'static str, tried: Vec<String> },

    #[error("product '{product}' does not match filter '{filter}'")]
    ProductTypeMismatch { product: String, filter: String },

    #[error(transparent)]
    RateParse(#[from] RateParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SkipReason {
    /// Filter mismatches are expected and not worth a warning
    pub fn is_expected(&self) -> bool {
        matches!(self, SkipReason::ProductTypeMismatch { .. })
    }
}

/// Fetching a bank page failed
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: ureq::Error,
    },
}

/// Loading or validating the bank configuration failed
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("bank #{index}: {reason}")]
    InvalidBank { index: usize, reason: String },

    #[error("bank '{bank}', {field} selectors: {source}")]
    Selector {
        bank: String,
        field: &'static str,
        #[source]
        source: SelectorError,
    },
}

/// Writing records out failed
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
