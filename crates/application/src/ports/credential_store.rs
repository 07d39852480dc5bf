//! Credential store port
//!
//! Holds the single bearer token the client decorates requests with.

use async_trait::async_trait;
use courier_domain::AuthToken;

/// Errors that can occur while reading or writing the stored token.
#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Storage for the process-wide bearer token.
///
/// Writes replace the token wholesale.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the stored token, if any.
    async fn get(&self) -> Result<Option<AuthToken>, CredentialStoreError>;

    /// Stores `token`, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the token cannot be persisted.
    async fn set(&self, token: AuthToken) -> Result<(), CredentialStoreError>;

    /// Removes the stored token. Clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be updated.
    async fn clear(&self) -> Result<(), CredentialStoreError>;
}
