//! Bank configuration
//!
//! Loaded from TOML and validated up front, so the extraction core only ever sees
//! compiled selector chains and well-formed URLs.

use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::{ConfigError, SelectorError};
use crate::selectors::SelectorChain;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Selectors and product filter for one bank page
#[derive(Debug, Clone)]
pub struct SelectorSpec {
    /// Product block fallbacks
    pub container: SelectorChain,
    /// Product name fallbacks, resolved inside each container
    pub product_name: SelectorChain,
    /// Rate fallbacks, resolved inside each container
    pub aer_rate: SelectorChain,
    /// Case-insensitive substring the product name must contain
    pub product_type: String,
}

impl SelectorSpec {
    /// Build from comma-delimited selector groups
    pub fn from_delimited(
        container: &str,
        product_name: &str,
        aer_rate: &str,
        product_type: impl Into<String>,
    ) -> Result<Self, SelectorError> {
        Ok(Self {
            container: SelectorChain::from_delimited(container)?,
            product_name: SelectorChain::from_delimited(product_name)?,
            aer_rate: SelectorChain::from_delimited(aer_rate)?,
            product_type: product_type.into(),
        })
    }

    pub fn matches_product(&self, product_name: &str) -> bool {
        product_name
            .to_lowercase()
            .contains(&self.product_type.to_lowercase())
    }
}

#[derive(Debug, Clone)]
pub struct BankConfig {
    pub name: String,
    pub url: String,
    pub selectors: SelectorSpec,
    /// Parse the whole container text when the rate element is missing or unparseable
    pub fallback_to_container_text: bool,
}

impl BankConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>, selectors: SelectorSpec) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            selectors,
            fallback_to_container_text: false,
        }
    }

    pub fn with_container_text_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_container_text = enabled;
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub fetch: FetchSettings,
    pub banks: Vec<BankConfig>,
}

impl ScraperConfig {
    pub fn new(banks: Vec<BankConfig>) -> Self {
        Self {
            fetch: FetchSettings::default(),
            banks,
        }
    }

    /// Load and validate a TOML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let banks = raw
            .banks
            .into_iter()
            .enumerate()
            .map(|(index, bank)| bank.validate(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            fetch: raw.fetch,
            banks,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    fetch: FetchSettings,
    #[serde(default)]
    banks: Vec<RawBank>,
}

#[derive(Debug, Deserialize)]
struct RawBank {
    name: String,
    url: String,
    product_type: String,
    #[serde(default)]
    fallback_to_container_text: bool,
    selectors: RawSelectors,
}

#[derive(Debug, Deserialize)]
struct RawSelectors {
    container: SelectorList,
    product_name: SelectorList,
    aer_rate: SelectorList,
}

/// A comma-delimited string or an explicit list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SelectorList {
    Delimited(String),
    List(Vec<String>),
}

impl SelectorList {
    fn compile(&self) -> Result<SelectorChain, SelectorError> {
        match self {
            SelectorList::Delimited(s) => SelectorChain::from_delimited(s),
            SelectorList::List(items) => SelectorChain::new(items),
        }
    }
}

impl RawBank {
    fn validate(self, index: usize) -> Result<BankConfig, ConfigError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ConfigError::InvalidBank {
                index,
                reason: "name is empty".to_string(),
            });
        }
        if self.product_type.trim().is_empty() {
            return Err(ConfigError::InvalidBank {
                index,
                reason: format!("'{name}' has an empty product_type"),
            });
        }
        if let Err(e) = Url::parse(&self.url) {
            return Err(ConfigError::InvalidBank {
                index,
                reason: format!("'{name}' has invalid url '{}': {e}", self.url),
            });
        }

        let chain = |field: &'static str, list: &SelectorList| {
            list.compile().map_err(|source| ConfigError::Selector {
                bank: name.clone(),
                field,
                source,
            })
        };
        let selectors = SelectorSpec {
            container: chain("container", &self.selectors.container)?,
            product_name: chain("product_name", &self.selectors.product_name)?,
            aer_rate: chain("aer_rate", &self.selectors.aer_rate)?,
            product_type: self.product_type.trim().to_string(),
        };

        Ok(BankConfig {
            name,
            url: self.url,
            selectors,
            fallback_to_container_text: self.fallback_to_container_text,
        })
    }
}
