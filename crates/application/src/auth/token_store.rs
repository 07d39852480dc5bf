//! In-memory credential storage.

use std::sync::Arc;

use async_trait::async_trait;
use courier_domain::AuthToken;
use tokio::sync::RwLock;

use crate::ports::{CredentialStore, CredentialStoreError};

/// Thread-safe in-memory token store.
///
/// Clones share the same token. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    token: Arc<RwLock<Option<AuthToken>>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `token`.
    #[must_use]
    pub fn with_token(token: impl Into<AuthToken>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self) -> Result<Option<AuthToken>, CredentialStoreError> {
        Ok(self.token.read().await.clone())
    }

    async fn set(&self, token: AuthToken) -> Result<(), CredentialStoreError> {
        *self.token.write().await = Some(token);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        self.token.write().await.take();
        Ok(())
    }
}
