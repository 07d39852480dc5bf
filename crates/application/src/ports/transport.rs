//! Transport port
//!
//! The generic HTTP transport the interceptor pipeline wraps. Implementations
//! return every received response as `Ok`, whatever its status; deciding what
//! counts as a failure is the pipeline's job.

use std::sync::Arc;

use async_trait::async_trait;
use courier_domain::{OutgoingRequest, TransportResponse};
use thiserror::Error;

/// Receives raw transfer progress: bytes moved so far and the total, if known.
///
/// Uploads report request-body bytes; downloads report response-body bytes.
pub type TransferObserver = Arc<dyn Fn(u64, Option<u64>) + Send + Sync>;

/// Failures where no HTTP response is available.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request was sent but no response arrived (timeout, reset, DNS,
    /// refused connection, body stream interrupted).
    #[error("no response received: {0}")]
    NoResponse(String),

    /// The request could not be built or sent.
    #[error("request not sent: {0}")]
    NotSent(String),
}

/// Port for performing HTTP round trips.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the request.
    ///
    /// `observer`, when given, is called as body bytes move.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response could be obtained.
    async fn send(
        &self,
        request: OutgoingRequest,
        observer: Option<TransferObserver>,
    ) -> Result<TransportResponse, TransportError>;
}
