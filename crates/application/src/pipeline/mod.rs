//! Transport interceptor pipeline.
//!
//! Every call passes two stages around the transport:
//! - request stage: the call's headers/params are merged in, then each
//!   [`RequestInterceptor`] decorates the request (auth first)
//! - response stage: 2xx responses pass through untouched; everything else is
//!   normalized into an [`ApiError`]. A 401 additionally clears the stored
//!   token and broadcasts [`ClientEvent::Unauthorized`]
//!
//! The 401 side effects do not look at `skip_error_handler`; the flag is only
//! forwarded on the event.

mod normalizer;

use std::sync::Arc;

use async_trait::async_trait;
use courier_domain::{ApiError, HttpMethod, OutgoingRequest, RequestConfig, TransportResponse};
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

use crate::auth::AuthInterceptor;
use crate::ports::{CredentialStore, TransferObserver, Transport};

pub use normalizer::{TransportFailure, format_error};

/// Notifications the client emits for the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A call was rejected with 401 and the stored token has been cleared.
    ///
    /// Applications typically navigate to their login boundary.
    Unauthorized {
        /// Verb of the rejected call.
        method: HttpMethod,
        /// Path of the rejected call.
        path: String,
        /// Whether the call was made with `skip_error_handler`.
        error_handler_skipped: bool,
    },
}

/// Decorates outgoing requests before they reach the transport.
///
/// Interceptors cannot fail a request; they may only modify it.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Modifies `request` in place.
    async fn intercept(&self, request: &mut OutgoingRequest, config: &RequestConfig);
}

/// The two-stage pipeline wrapped around a [`Transport`].
pub struct InterceptorPipeline {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
    events: broadcast::Sender<ClientEvent>,
}

impl InterceptorPipeline {
    /// Creates a pipeline with the auth interceptor followed by `extra`.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialStore>,
        extra: Vec<Arc<dyn RequestInterceptor>>,
        event_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        let mut interceptors: Vec<Arc<dyn RequestInterceptor>> =
            vec![Arc::new(AuthInterceptor::new(Arc::clone(&credentials)))];
        interceptors.extend(extra);
        Self {
            transport,
            credentials,
            interceptors,
            events,
        }
    }

    /// Subscribes to [`ClientEvent`]s emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Request stage: merges `config` and runs the interceptors.
    pub async fn prepare(
        &self,
        mut request: OutgoingRequest,
        config: &RequestConfig,
    ) -> OutgoingRequest {
        request.apply_config(config);
        for interceptor in &self.interceptors {
            interceptor.intercept(&mut request, config).await;
        }
        request
    }

    /// Runs both stages around one transport round trip.
    ///
    /// # Errors
    ///
    /// Returns the normalized [`ApiError`] for any non-2xx response or
    /// transport failure.
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub async fn execute(
        &self,
        request: OutgoingRequest,
        config: RequestConfig,
        observer: Option<TransferObserver>,
    ) -> Result<TransportResponse, ApiError> {
        let request = self.prepare(request, &config).await;
        let method = request.method;
        let path = request.path.clone();

        debug!("sending request");
        let failure = match self.transport.send(request, observer).await {
            Ok(response) if response.is_success() => {
                debug!(status = response.status, "request succeeded");
                return Ok(response);
            }
            Ok(response) => TransportFailure::Rejected(response),
            Err(error) => TransportFailure::Transport(error),
        };

        Err(self.reject(method, path, &config, &failure).await)
    }

    /// Response stage for failures.
    async fn reject(
        &self,
        method: HttpMethod,
        path: String,
        config: &RequestConfig,
        failure: &TransportFailure,
    ) -> ApiError {
        let error = format_error(failure);
        debug!(status = ?error.status, code = ?error.code, "request failed");

        if error.is_unauthorized() {
            warn!(%method, %path, "authorization rejected; clearing stored credential");
            if let Err(e) = self.credentials.clear().await {
                warn!(error = %e, "failed to clear stored credential");
            }
            // No subscribers is fine: nobody is listening for navigation.
            let _ = self.events.send(ClientEvent::Unauthorized {
                method,
                path,
                error_handler_skipped: config.skip_error_handler,
            });
        }

        error
    }
}
