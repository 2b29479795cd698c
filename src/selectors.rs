//! Ordered CSS selector fallbacks
//!
//! A [`SelectorChain`] holds alternative selectors for one field. Resolution tries them
//! strictly in order and the first selector matching at least one element wins; later
//! entries are never consulted, even when the winning match set is small.

use scraper::{ElementRef, Html, Selector};

use crate::error::SelectorError;

/// Something CSS selectors can be run against: a whole document or an element subtree
pub trait SelectScope<'a> {
    fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'a>>;
}

impl<'a> SelectScope<'a> for &'a Html {
    fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        let document: &'a Html = *self;
        document.select(selector).collect()
    }
}

impl<'a> SelectScope<'a> for ElementRef<'a> {
    fn select_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }
}

/// Ordered, non-empty list of compiled selectors with short-circuit resolution
#[derive(Debug, Clone)]
pub struct SelectorChain {
    entries: Vec<(String, Selector)>,
}

impl SelectorChain {
    /// Compile each selector string in order.
    ///
    /// Blank entries are dropped. Any entry that fails to parse fails the whole chain.
    pub fn new<I, S>(selectors: I) -> Result<Self, SelectorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for raw in selectors {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let selector = Selector::parse(raw).map_err(|e| SelectorError::Invalid {
                selector: raw.to_string(),
                reason: e.to_string(),
            })?;
            entries.push((raw.to_string(), selector));
        }

        if entries.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { entries })
    }

    /// Split a comma-delimited selector group into individual fallbacks
    pub fn from_delimited(selectors: &str) -> Result<Self, SelectorError> {
        Self::new(selectors.split(','))
    }

    /// All elements matched by the first selector that matches anything, in document
    /// order. Empty when no selector matches.
    pub fn resolve<'a, S: SelectScope<'a>>(&self, scope: &S) -> Vec<ElementRef<'a>> {
        for (raw, selector) in &self.entries {
            let matched = scope.select_all(selector);
            if !matched.is_empty() {
                tracing::trace!(selector = %raw, count = matched.len(), "selector matched");
                return matched;
            }
        }
        Vec::new()
    }

    /// First element of the winning selector's match set
    pub fn resolve_first<'a, S: SelectScope<'a>>(&self, scope: &S) -> Option<ElementRef<'a>> {
        self.resolve(scope).into_iter().next()
    }

    /// Selector strings in fallback order
    pub fn sources(&self) -> Vec<String> {
        self.entries.iter().map(|(raw, _)| raw.clone()).collect()
    }
}

/// Trimmed text content of an element.
///
/// Interior whitespace runs (including the newlines and indentation between nested
/// tags) collapse to a single space, so an exported product name reads as one line.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`element_text`], but leaves out any text inside `skip`
pub fn text_excluding(element: &ElementRef<'_>, skip: &ElementRef<'_>) -> String {
    element
        .descendants()
        .filter(|node| !node.ancestors().any(|a| a.id() == skip.id()))
        .filter_map(|node| node.value().as_text())
        .flat_map(|text| text.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
