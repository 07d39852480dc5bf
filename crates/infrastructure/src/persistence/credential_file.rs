//! File-backed credential store.
//!
//! The token is kept in `credentials.json` under the platform data directory:
//! - Linux: ~/.local/share/courier/credentials.json
//! - macOS: ~/Library/Application Support/courier/credentials.json
//! - Windows: %LOCALAPPDATA%/courier/credentials.json

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use courier_application::{CredentialStore, CredentialStoreError};
use courier_domain::AuthToken;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

/// File name of the credential file.
pub const CREDENTIALS_FILE: &str = "credentials.json";

/// On-disk layout. Unknown keys are preserved across writes.
///
/// ```json
/// {
///   "auth_token": "eyJhbGciOi..."
/// }
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<AuthToken>,
    #[serde(flatten)]
    other: BTreeMap<String, Value>,
}

fn to_store_error(e: SerializationError) -> CredentialStoreError {
    CredentialStoreError::Serialization(e.to_string())
}

/// Persists the bearer token as JSON so it survives restarts.
///
/// A missing file, or a file without the `auth_token` key, means no token.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Creates a store keeping its file in `dir`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CREDENTIALS_FILE),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the default directory, if the platform has one.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("courier"))
    }

    /// Path of the credential file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<CredentialFile, CredentialStoreError> {
        match fs::read(&self.path).await {
            Ok(content) => from_json_bytes(&content).map_err(to_store_error),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(CredentialFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, file: &CredentialFile) -> Result<(), CredentialStoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await?;
        }
        let content = to_json_stable_bytes(file).map_err(to_store_error)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Result<Option<AuthToken>, CredentialStoreError> {
        Ok(self.read().await?.auth_token)
    }

    async fn set(&self, token: AuthToken) -> Result<(), CredentialStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read().await?;
        file.auth_token = Some(token);
        self.write(&file).await?;
        debug!(path = %self.path.display(), "stored credential");
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read().await?;
        if file.auth_token.take().is_none() {
            return Ok(());
        }
        self.write(&file).await?;
        debug!(path = %self.path.display(), "cleared credential");
        Ok(())
    }
}
