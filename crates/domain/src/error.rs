//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while assembling requests or settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The base URL or request path does not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A client setting has an unusable value.
    #[error("invalid setting `{key}`: {reason}")]
    InvalidSetting {
        /// Setting name.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
