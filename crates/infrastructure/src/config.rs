//! Environment configuration.
//!
//! Settings are read once at startup from `COURIER_*` variables:
//! - `COURIER_API_BASE_URL`: absolute base URL
//! - `COURIER_API_TIMEOUT`: request timeout in milliseconds

use config::{Config, Environment};
use courier_domain::{ClientSettings, DomainError};

/// Prefix of the environment variables read.
pub const ENV_PREFIX: &str = "COURIER";

const BASE_URL_KEY: &str = "api_base_url";
const TIMEOUT_KEY: &str = "api_timeout";

/// Errors raised while loading settings or building adapters from them.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration source could not be read.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A loaded value is unusable.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Loads settings from the process environment.
///
/// # Errors
///
/// Returns an error if the environment cannot be read or the base URL is not
/// absolute.
pub fn load_settings() -> Result<ClientSettings, ConfigError> {
    settings_from(Environment::with_prefix(ENV_PREFIX))
}

/// Loads settings from an explicit environment source.
///
/// # Errors
///
/// Returns an error if the source cannot be read or the base URL is not
/// absolute.
pub fn settings_from(source: Environment) -> Result<ClientSettings, ConfigError> {
    let raw = Config::builder().add_source(source).build()?;
    let base_url = raw.get_string(BASE_URL_KEY).ok();
    let timeout = raw.get_string(TIMEOUT_KEY).ok();

    let settings = ClientSettings::from_raw(base_url.as_deref(), timeout.as_deref());
    settings.validate()?;
    Ok(settings)
}
