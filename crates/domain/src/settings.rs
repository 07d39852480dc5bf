//! Client Settings Domain Model
//!
//! Process-wide transport settings, fixed once the client is built.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Base URL and timeout of the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Absolute base URL request paths are joined onto.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientSettings {
    /// Builds settings from optional raw values.
    ///
    /// Blank URLs and zero or unparsable timeouts fall back to the defaults.
    #[must_use]
    pub fn from_raw(base_url: Option<&str>, timeout_ms: Option<&str>) -> Self {
        let base_url = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string();
        let timeout_ms = timeout_ms
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        Self {
            base_url,
            timeout_ms,
        }
    }

    /// Request timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Checks that the base URL is absolute.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSetting`] when the URL does not parse.
    pub fn validate(&self) -> DomainResult<()> {
        Url::parse(&self.base_url).map_err(|e| DomainError::InvalidSetting {
            key: "base_url".to_string(),
            reason: format!("{e}: {}", self.base_url),
        })?;
        Ok(())
    }
}
