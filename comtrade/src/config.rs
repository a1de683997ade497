//! Client configuration

use crate::error::ComtradeResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Data API endpoint
pub const DEFAULT_BASE_URL: &str = "http://comtrade.un.org/api/get";

/// Location of the reference lists of valid parameter values
pub const DEFAULT_REFERENCE_BASE_URL: &str = "http://comtrade.un.org/data/cache";

/// Comtrade client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Data API endpoint queried by `execute`
    pub base_url: String,
    /// Base URL of the reference value lists
    pub reference_base_url: String,
    /// Whole-request timeout in seconds, none by default
    pub timeout_seconds: Option<u64>,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            reference_base_url: DEFAULT_REFERENCE_BASE_URL.to_string(),
            timeout_seconds: None,
            user_agent: concat!("comtrade/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at a different data endpoint
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load configuration from file, overridden by `COMTRADE_*` variables
    pub fn from_file(path: &str) -> ComtradeResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("COMTRADE"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Timeout as a duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Build the blocking HTTP client described by this configuration
    pub(crate) fn http_client(&self) -> ComtradeResult<reqwest::blocking::Client> {
        // The blocking builder applies a 30s default unless given an explicit value
        let client = reqwest::blocking::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout())
            .build()?;
        Ok(client)
    }
}
