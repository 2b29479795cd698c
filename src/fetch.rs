//! Page fetching
//!
//! The extraction core never touches the network; it only sees complete HTML handed to
//! it by a [`PageFetcher`].

use std::time::Duration;

use crate::config::FetchSettings;
use crate::error::FetchError;

pub trait PageFetcher {
    /// Return the full body of the page at `url`
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher backed by ureq
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
                .user_agent(settings.user_agent.as_str())
                .build(),
        );
        Self { agent }
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = match self.agent.get(url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::StatusCode(status)) => {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                })
            }
            Err(source) => {
                return Err(FetchError::Transport {
                    url: url.to_string(),
                    source,
                })
            }
        };

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.into_body()
            .read_to_string()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })
    }
}
