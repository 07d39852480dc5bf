//! Uniform success/data/message/errors response wrapper.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name to ordered validation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Wrapped API response, as returned by the `*_wrapped` facade calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the server considers the call successful.
    pub success: bool,
    /// Payload, present on success.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Per-field validation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiEnvelope<T> {
    /// Creates a successful envelope around `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    /// Converts the envelope into a `Result`, keeping the envelope on failure.
    ///
    /// # Errors
    ///
    /// Returns the envelope itself when `success` is false or `data` is absent.
    pub fn into_result(self) -> Result<T, Self> {
        match self {
            Self {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            other => Err(other),
        }
    }
}
