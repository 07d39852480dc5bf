//! Courier Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus environment configuration
//! and a one-call client bootstrap.

pub mod adapters;
pub mod config;
pub mod http;
pub mod persistence;
pub mod serialization;

use std::path::Path;
use std::sync::Arc;

use courier_application::{ApiClient, CredentialStore};
use courier_domain::ClientSettings;

pub use adapters::ReqwestTransport;
pub use crate::config::{ConfigError, ENV_PREFIX, load_settings, settings_from};
pub use http::{BodyBuildError, build_multipart, file_part_from_path};
pub use persistence::{CREDENTIALS_FILE, FileCredentialStore};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes};

/// Builds an [`ApiClient`] over the reqwest transport, keeping the token in
/// `credentials_dir`.
///
/// # Errors
///
/// Returns an error if the settings are invalid or the HTTP client cannot be
/// created.
pub fn build_client(
    settings: &ClientSettings,
    credentials_dir: &Path,
) -> Result<ApiClient, ConfigError> {
    let transport = ReqwestTransport::new(settings)?;
    let credentials: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::new(credentials_dir));
    Ok(ApiClient::new(Arc::new(transport), credentials))
}
