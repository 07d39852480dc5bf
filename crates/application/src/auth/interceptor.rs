//! Bearer token request interceptor.

use std::sync::Arc;

use async_trait::async_trait;
use courier_domain::{OutgoingRequest, RequestConfig};
use tracing::warn;

use crate::pipeline::RequestInterceptor;
use crate::ports::CredentialStore;

/// Attaches `Authorization: Bearer <token>` unless the call sets `skip_auth`.
///
/// A missing token, or a store that cannot be read, leaves the request
/// unauthenticated rather than failing it.
pub struct AuthInterceptor {
    credentials: Arc<dyn CredentialStore>,
}

impl AuthInterceptor {
    /// Creates an interceptor reading from `credentials`.
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl RequestInterceptor for AuthInterceptor {
    async fn intercept(&self, request: &mut OutgoingRequest, config: &RequestConfig) {
        if config.skip_auth {
            return;
        }
        match self.credentials.get().await {
            Ok(Some(token)) => request.headers.set("Authorization", token.bearer_header()),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not read stored credential; sending without it"),
        }
    }
}
