//! Rate extraction from matched product containers
//!
//! Each container yields a [`ContainerOutcome`]: either a validated record or the reason
//! it was skipped. Nothing here fails the document as a whole.

use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use crate::config::{BankConfig, SelectorSpec};
use crate::error::SkipReason;
use crate::rate::{parse_rate, parse_rate_preferring_percent};
use crate::record::RateRecord;
use crate::selectors::{element_text, text_excluding};

/// Result of processing one container
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerOutcome {
    Extracted(RateRecord),
    Skipped(SkipReason),
}

/// A container that produced no record, and why
#[derive(Debug, Clone, PartialEq)]
pub struct Skip {
    /// Position of the container in document order
    pub index: usize,
    pub reason: SkipReason,
}

/// Everything extracted from one page
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub containers: usize,
    pub records: Vec<RateRecord>,
    pub skipped: Vec<Skip>,
}

/// Pulls rate records for one bank out of its page
pub struct RateExtractor<'c> {
    bank_name: &'c str,
    source_url: &'c str,
    spec: &'c SelectorSpec,
    container_text_fallback: bool,
}

impl<'c> RateExtractor<'c> {
    pub fn new(bank_name: &'c str, source_url: &'c str, spec: &'c SelectorSpec) -> Self {
        Self {
            bank_name,
            source_url,
            spec,
            container_text_fallback: false,
        }
    }

    pub fn for_bank(bank: &'c BankConfig) -> Self {
        Self::new(&bank.name, &bank.url, &bank.selectors)
            .with_container_text_fallback(bank.fallback_to_container_text)
    }

    pub fn with_container_text_fallback(mut self, enabled: bool) -> Self {
        self.container_text_fallback = enabled;
        self
    }

    /// Parse `html` and extract from every container it holds
    pub fn extract_html(&self, html: &str) -> Extraction {
        let document = Html::parse_document(html);
        let containers = self.spec.container.resolve(&&document);
        if containers.is_empty() {
            warn!(
                bank = self.bank_name,
                selectors = ?self.spec.container.sources(),
                "no product containers found"
            );
        }
        self.extract(&containers)
    }

    /// Extract from already-resolved containers, keeping document order
    pub fn extract(&self, containers: &[ElementRef<'_>]) -> Extraction {
        let mut extraction = Extraction {
            containers: containers.len(),
            ..Extraction::default()
        };

        for (index, container) in containers.iter().enumerate() {
            match self.extract_container(index, container) {
                ContainerOutcome::Extracted(record) => {
                    debug!(
                        bank = self.bank_name,
                        index,
                        product = record.product_name(),
                        aer = record.aer_rate(),
                        "extracted rate"
                    );
                    extraction.records.push(record);
                }
                ContainerOutcome::Skipped(reason) => {
                    if reason.is_expected() {
                        debug!(bank = self.bank_name, index, "{reason}");
                    } else {
                        warn!(bank = self.bank_name, index, "skipping product: {reason}");
                    }
                    extraction.skipped.push(Skip { index, reason });
                }
            }
        }

        extraction
    }

    /// Run the name filter, rate lookup and validation for the container at `index`
    pub fn extract_container(&self, index: usize, container: &ElementRef<'_>) -> ContainerOutcome {
        match self.try_extract(index, container) {
            Ok(record) => ContainerOutcome::Extracted(record),
            Err(reason) => ContainerOutcome::Skipped(reason),
        }
    }

    fn try_extract(&self, index: usize, container: &ElementRef<'_>) -> Result<RateRecord, SkipReason> {
        let name_el = self
            .spec
            .product_name
            .resolve_first(container)
            .ok_or_else(|| SkipReason::SelectorMiss {
                field: "product_name",
                tried: self.spec.product_name.sources(),
            })?;

        let product_name = element_text(&name_el);
        if !self.spec.matches_product(&product_name) {
            return Err(SkipReason::ProductTypeMismatch {
                product: product_name,
                filter: self.spec.product_type.clone(),
            });
        }

        let aer_rate = self.rate_in(index, container, &name_el)?;
        Ok(RateRecord::new(
            self.bank_name,
            product_name,
            aer_rate,
            self.source_url,
        )?)
    }

    fn rate_in(
        &self,
        index: usize,
        container: &ElementRef<'_>,
        name_el: &ElementRef<'_>,
    ) -> Result<f64, SkipReason> {
        let from_element = match self.spec.aer_rate.resolve_first(container) {
            Some(rate_el) => parse_rate(&element_text(&rate_el)).map_err(SkipReason::from),
            None => Err(SkipReason::SelectorMiss {
                field: "aer_rate",
                tried: self.spec.aer_rate.sources(),
            }),
        };

        match from_element {
            Err(reason) if self.container_text_fallback => {
                debug!(bank = self.bank_name, index, "{reason}; parsing container text");
                // name text excluded so a term like "1 Year" is never taken as the rate
                let text = text_excluding(container, name_el);
                Ok(parse_rate_preferring_percent(&text)?)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    const URL: &str = "https://www.securetrustbank.com/savings";

    const STB_PAGE: &str = r#"
    <html>
        <head><title>Secure Trust Bank Savings</title></head>
        <body>
            <div class="savings-products">
                <div class="product-card">
                    <h3 class="product-title">Easy Access Savings</h3>
                    <div class="rate-info">
                        <span class="aer-rate">3.5%</span>
                        <span class="label">AER</span>
                    </div>
                </div>
                <div class="product-card">
                    <h3 class="product-title">1 Year Fixed Rate Savings</h3>
                    <div class="rate-info">
                        <span class="aer-rate">5.25%</span>
                        <span class="label">AER</span>
                    </div>
                    <p class="product-description">Lock in your savings for 1 year</p>
                </div>
                <div class="product-card">
                    <h3 class="product-title">2 Year Fixed Rate Savings</h3>
                    <div class="rate-info">
                        <span class="aer-rate">5.50%</span>
                        <span class="label">AER</span>
                    </div>
                </div>
            </div>
        </body>
    </html>
    "#;

    fn spec(container: &str, name: &str, rate: &str, product_type: &str) -> SelectorSpec {
        SelectorSpec::from_delimited(container, name, rate, product_type).unwrap()
    }

    #[test]
    fn test_picks_matching_product() {
        let spec = spec(".product-card", ".product-title", ".aer-rate", "1 Year Fixed");
        let extraction = RateExtractor::new("Secure Trust Bank", URL, &spec).extract_html(STB_PAGE);

        assert_eq!(extraction.containers, 3);
        assert_eq!(extraction.records.len(), 1);
        let record = &extraction.records[0];
        assert_eq!(record.bank_name(), "Secure Trust Bank");
        assert_eq!(record.product_name(), "1 Year Fixed Rate Savings");
        assert!((record.aer_rate() - 0.0525).abs() < 1e-12);
        assert_eq!(record.source_url(), URL);

        // the other two are filtered out, not failures
        assert_eq!(extraction.skipped.len(), 2);
        assert!(extraction.skipped.iter().all(|s| s.reason.is_expected()));
        assert_eq!(extraction.skipped[0].index, 0);
        assert_eq!(extraction.skipped[1].index, 2);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let html = r#"<div class="p"><span class="n">1 Year Fixed ISA</span><span class="r">4.10%</span></div>"#;
        let spec = spec(".p", ".n", ".r", "1 year fixed");
        let extraction = RateExtractor::new("Bank", URL, &spec).extract_html(html);

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].product_name(), "1 Year Fixed ISA");
    }

    #[test]
    fn test_records_keep_document_order() {
        let spec = spec(".product-card", ".product-title", ".aer-rate", "fixed");
        let extraction = RateExtractor::new("Bank", URL, &spec).extract_html(STB_PAGE);

        let names: Vec<_> = extraction.records.iter().map(|r| r.product_name()).collect();
        assert_eq!(names, vec!["1 Year Fixed Rate Savings", "2 Year Fixed Rate Savings"]);
    }

    #[test]
    fn test_alternative_structure_uses_fallbacks() {
        let html = r#"
        <div class="rate-table">
            <div class="savings-product">
                <h4>Fixed Rate Savings - 1 Year</h4>
                <div class="interest-rate">AER 5.10%</div>
            </div>
        </div>
        "#;
        let spec = spec(
            ".savings-product, .product-card, .rate-table",
            ".product-title, h3, h4",
            ".aer-rate, .rate, .interest-rate",
            "1 Year",
        );
        let extraction = RateExtractor::new("Bank", URL, &spec).extract_html(html);

        assert_eq!(extraction.containers, 1);
        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].product_name(), "Fixed Rate Savings - 1 Year");
        assert!((extraction.records[0].aer_rate() - 0.051).abs() < 1e-12);
    }

    #[test]
    fn test_no_containers_is_empty_not_error() {
        let spec = spec(".nothing-here", ".n", ".r", "1 Year");
        let extraction = RateExtractor::new("Bank", URL, &spec).extract_html(STB_PAGE);

        assert_eq!(extraction.containers, 0);
        assert!(extraction.records.is_empty());
        assert!(extraction.skipped.is_empty());
    }

    #[test]
    fn test_soft_failures_do_not_stop_later_containers() {
        let html = r#"
        <div class="p"><span class="r">5%</span></div>
        <div class="p"><span class="n">1 Year Fixed A</span></div>
        <div class="p"><span class="n">1 Year Fixed B</span><span class="r">N/A</span></div>
        <div class="p"><span class="n">1 Year Fixed C</span><span class="r">150%</span></div>
        <div class="p"><span class="n">1 Year Fixed D</span><span class="r">4.5%</span></div>
        "#;
        let spec = spec(".p", ".n", ".r", "1 Year Fixed");
        let extraction = RateExtractor::new("Bank", URL, &spec).extract_html(html);

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].product_name(), "1 Year Fixed D");

        let reasons: Vec<_> = extraction.skipped.iter().map(|s| &s.reason).collect();
        assert!(matches!(reasons[0], SkipReason::SelectorMiss { field: "product_name", .. }));
        assert!(matches!(reasons[1], SkipReason::SelectorMiss { field: "aer_rate", .. }));
        assert!(matches!(reasons[2], SkipReason::RateParse(_)));
        assert!(matches!(
            reasons[3],
            SkipReason::Validation(ValidationError::RateOutOfRange(_))
        ));
    }

    #[test]
    fn test_container_text_fallback() {
        let html = r#"
        <div class="product">
            <div class="name">Fixed Bond</div>
            <p>Earn 4.60% AER on balances over £1,000</p>
        </div>
        "#;
        let spec = spec(".product", ".name", ".rate", "Fixed Bond");

        let strict = RateExtractor::new("Bank", URL, &spec).extract_html(html);
        assert!(strict.records.is_empty());
        assert!(matches!(
            strict.skipped[0].reason,
            SkipReason::SelectorMiss { field: "aer_rate", .. }
        ));

        let lenient = RateExtractor::new("Bank", URL, &spec)
            .with_container_text_fallback(true)
            .extract_html(html);
        assert_eq!(lenient.records.len(), 1);
        assert!((lenient.records[0].aer_rate() - 0.046).abs() < 1e-12);
    }

    #[test]
    fn test_container_text_fallback_ignores_term_in_product_name() {
        let html = r#"
        <div class="product">
            <h3 class="product__name">1 Year Fixed Bond</h3>
            <p>Earn 4.60% AER</p>
        </div>
        "#;
        let spec = spec(".product", ".product__name", ".product__aer", "1 Year Fixed");
        let extraction = RateExtractor::new("Example Bank", URL, &spec)
            .with_container_text_fallback(true)
            .extract_html(html);

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].product_name(), "1 Year Fixed Bond");
        assert!((extraction.records[0].aer_rate() - 0.046).abs() < 1e-12);
    }

    #[test]
    fn test_container_text_fallback_after_unparseable_rate_element() {
        let html = r#"
        <div class="product">
            <h3 class="product__name">1 Year Fixed Bond</h3>
            <span class="product__aer">See below</span>
            <p>Term 12 months, 4.35% AER fixed</p>
        </div>
        "#;
        let spec = spec(".product", ".product__name", ".product__aer", "1 Year Fixed");

        let strict = RateExtractor::new("Bank", URL, &spec).extract_html(html);
        assert!(matches!(strict.skipped[0].reason, SkipReason::RateParse(_)));

        let lenient = RateExtractor::new("Bank", URL, &spec)
            .with_container_text_fallback(true)
            .extract_html(html);
        assert!((lenient.records[0].aer_rate() - 0.0435).abs() < 1e-12);
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let spec = spec(".product-card", ".product-title", ".aer-rate", "Fixed");
        let extractor = RateExtractor::new("Bank", URL, &spec);

        let first = extractor.extract_html(STB_PAGE);
        let second = extractor.extract_html(STB_PAGE);

        assert_eq!(first.records.len(), second.records.len());
        assert!(first
            .records
            .iter()
            .zip(&second.records)
            .all(|(a, b)| a.same_observation(b)));
    }
}
