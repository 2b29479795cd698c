//! Rate text normalization
//!
//! Bank pages render the same AER as "5.00%", "5.00" or "0.05". [`parse_rate`] turns any
//! of those into a decimal fraction.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RateParseError;

// First number in the text, with an optional percent sign after it.
static RATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?|\.\d+)\s*(%)?").expect("rate pattern is valid")
});

/// Parse human-formatted rate text into a decimal fraction.
///
/// - a `%` suffix always means percentage points: `"12%"` is `0.12`
/// - without `%`, values up to and including `1.0` are taken as fractions and larger
///   values as percentage points: `"0.05"` and `"5.00"` both give `0.05`
///
/// The boundary is inclusive, so a bare `"1"` or `"1.0"` parses as `1.0` (100%).
pub fn parse_rate(text: &str) -> Result<f64, RateParseError> {
    let trimmed = text.trim();
    let caps = RATE_TOKEN.captures(trimmed).ok_or_else(|| RateParseError {
        text: trimmed.to_string(),
    })?;

    let value: f64 = caps[1].parse().map_err(|_| RateParseError {
        text: trimmed.to_string(),
    })?;

    let is_percent = caps.get(2).is_some();
    if is_percent || value > 1.0 {
        Ok(value / 100.0)
    } else {
        Ok(value)
    }
}

/// Like [`parse_rate`], but a `%`-suffixed number anywhere in the text wins over an
/// earlier bare number. Used when scanning free text rather than a rate element.
pub fn parse_rate_preferring_percent(text: &str) -> Result<f64, RateParseError> {
    let percent = RATE_TOKEN
        .captures_iter(text)
        .find(|caps| caps.get(2).is_some())
        .and_then(|caps| caps[1].parse::<f64>().ok());

    match percent {
        Some(value) => Ok(value / 100.0),
        None => parse_rate(text),
    }
}
