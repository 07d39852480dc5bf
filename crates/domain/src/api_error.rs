//! The uniform error shape every failed call resolves to.
//!
//! An `ApiError` carries exactly one terminal cause:
//! - the server answered with an error status (`status` is set),
//! - the request was sent but nothing came back (`code = NETWORK_ERROR`),
//! - the request never left (`code = UNKNOWN_ERROR`).
//!
//! Callers branch on `status` and `code`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::response::{FieldErrors, UNAUTHORIZED};

/// Code for requests that were sent but got no response.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
/// Code for requests that could not be built or sent.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
/// Code for 2xx responses whose body did not decode into the expected type.
pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";

/// Message used when an error response carries no message of its own.
pub const DEFAULT_RESPONSE_MESSAGE: &str = "An error occurred";
/// Message for the no-response case.
pub const NETWORK_ERROR_MESSAGE: &str = "No response from server. Please check your connection.";
/// Message for the not-sent case when the underlying failure has no text.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Normalized API failure.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable message, never empty.
    pub message: String,
    /// Failure classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Transport status, present only when a response arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Per-field validation messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    /// Raw server-supplied body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Which terminal cause an [`ApiError`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A response arrived with an error status.
    Response,
    /// The request was sent but no response arrived.
    NoResponse,
    /// The request was never sent.
    NotSent,
}

impl ApiError {
    /// Error for a response with a non-2xx status.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: non_empty(message.into(), DEFAULT_RESPONSE_MESSAGE),
            code: None,
            status: Some(status),
            errors: None,
            payload: None,
        }
    }

    /// Error for a request that was sent but got no response.
    #[must_use]
    pub fn network() -> Self {
        Self {
            message: NETWORK_ERROR_MESSAGE.to_string(),
            code: Some(NETWORK_ERROR.to_string()),
            status: None,
            errors: None,
            payload: None,
        }
    }

    /// Error for a request that could not be built or sent.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            message: non_empty(message.into(), UNKNOWN_ERROR_MESSAGE),
            code: Some(UNKNOWN_ERROR.to_string()),
            status: None,
            errors: None,
            payload: None,
        }
    }

    /// Error for a 2xx body that did not decode.
    #[must_use]
    pub fn invalid_response(status: u16, reason: impl std::fmt::Display, raw: String) -> Self {
        Self {
            message: format!("Failed to decode response body: {reason}"),
            code: Some(INVALID_RESPONSE.to_string()),
            status: Some(status),
            errors: None,
            payload: (!raw.is_empty()).then_some(Value::String(raw)),
        }
    }

    /// Sets the code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the field errors.
    #[must_use]
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Sets the raw payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Returns the terminal cause.
    #[must_use]
    pub fn cause(&self) -> FailureKind {
        if self.status.is_some() {
            FailureKind::Response
        } else if self.code.as_deref() == Some(NETWORK_ERROR) {
            FailureKind::NoResponse
        } else {
            FailureKind::NotSent
        }
    }

    /// True for authorization-denied responses.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(UNAUTHORIZED)
    }

    /// True when no response arrived.
    #[must_use]
    pub fn is_network_error(&self) -> bool {
        self.cause() == FailureKind::NoResponse
    }

    /// Validation messages for one field.
    #[must_use]
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors
            .as_ref()
            .and_then(|errors| errors.get(field))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

fn non_empty(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
