//! Error normalization.
//!
//! Decision order:
//! 1. a response arrived with an error status: message, code and field errors
//!    come from the body when present
//! 2. the request was sent but nothing came back: `NETWORK_ERROR`
//! 3. the request never left: `UNKNOWN_ERROR`

use courier_domain::{ApiError, FieldErrors, TransportResponse};
use serde_json::Value;

use crate::ports::TransportError;

/// A failed round trip, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// A response arrived with a non-2xx status.
    Rejected(TransportResponse),
    /// No response is available.
    Transport(TransportError),
}

impl From<TransportError> for TransportFailure {
    fn from(error: TransportError) -> Self {
        Self::Transport(error)
    }
}

/// Converts any failure into an [`ApiError`]. Never fails.
#[must_use]
pub fn format_error(failure: &TransportFailure) -> ApiError {
    match failure {
        TransportFailure::Rejected(response) => from_response(response),
        TransportFailure::Transport(TransportError::NoResponse(_)) => ApiError::network(),
        TransportFailure::Transport(TransportError::NotSent(reason)) => ApiError::unknown(reason),
    }
}

fn from_response(response: &TransportResponse) -> ApiError {
    let payload = if response.is_body_empty() {
        None
    } else {
        Some(
            response
                .json_value()
                .unwrap_or_else(|| Value::String(response.text())),
        )
    };

    let body = payload.as_ref().and_then(Value::as_object);
    let message = body
        .and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let mut error = ApiError::from_status(response.status, message);

    if let Some(code) = body.and_then(|b| b.get("code")).and_then(Value::as_str) {
        error = error.with_code(code);
    }
    if let Some(errors) = body
        .and_then(|b| b.get("errors"))
        .and_then(|e| serde_json::from_value::<FieldErrors>(e.clone()).ok())
    {
        error = error.with_errors(errors);
    }
    if let Some(payload) = payload {
        error = error.with_payload(payload);
    }
    error
}
