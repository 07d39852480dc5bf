//! Scripted transport for unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Mutex;

use async_trait::async_trait;
use courier_domain::{OutgoingRequest, TransportResponse};
use serde_json::Value;

use crate::ports::{TransferObserver, Transport, TransportError};

type Handler =
    Box<dyn Fn(&OutgoingRequest) -> Result<TransportResponse, TransportError> + Send + Sync>;

/// Transport that answers from a closure and records what it was sent.
pub struct ScriptedTransport {
    handler: Handler,
    progress: Vec<(u64, Option<u64>)>,
    sent: Mutex<Vec<OutgoingRequest>>,
}

impl ScriptedTransport {
    pub fn new(
        handler: impl Fn(&OutgoingRequest) -> Result<TransportResponse, TransportError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            progress: Vec::new(),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Always answers `status` with `body` as JSON.
    pub fn replying(status: u16, body: Value) -> Self {
        Self::new(move |_| Ok(TransportResponse::json(status, &body)))
    }

    /// Always fails with `error`.
    pub fn failing(error: TransportError) -> Self {
        Self::new(move |_| Err(error.clone()))
    }

    /// Progress events fed to the observer on every send.
    pub fn with_progress(mut self, events: Vec<(u64, Option<u64>)>) -> Self {
        self.progress = events;
        self
    }

    pub fn sent(&self) -> Vec<OutgoingRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_sent(&self) -> OutgoingRequest {
        self.sent().pop().expect("no request was sent")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        request: OutgoingRequest,
        observer: Option<TransferObserver>,
    ) -> Result<TransportResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        if let Some(observer) = observer {
            for (loaded, total) in &self.progress {
                observer(*loaded, *total);
            }
        }
        (self.handler)(&request)
    }
}
