//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port. Every response that arrives
//! is returned as `Ok`, whatever its status; only failures without a
//! response become errors.

use async_trait::async_trait;
use courier_application::{TransferObserver, Transport, TransportError};
use courier_domain::{
    ClientSettings, Headers, HttpMethod, OutgoingRequest, RequestBody, ResponseKind,
    TransportResponse,
};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response};
use tracing::{debug, instrument};

use crate::config::ConfigError;
use crate::http::build_multipart;

/// HTTP transport backed by `reqwest::Client`.
///
/// Sends `Accept: application/json` unless the request overrides it and
/// enforces the configured timeout on every call.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl ReqwestTransport {
    /// Creates a transport from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the client cannot be
    /// created.
    pub fn new(settings: &ClientSettings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let accept = HeaderValue::from_str(mime::APPLICATION_JSON.as_ref())
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, accept);

        let client = Client::builder()
            .user_agent(concat!("courier/", env!("CARGO_PKG_VERSION")))
            .default_headers(default_headers)
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            timeout_ms: settings.timeout_ms,
        })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to transport failures.
    fn map_error(&self, error: &reqwest::Error) -> TransportError {
        if error.is_builder() {
            return TransportError::NotSent(error.to_string());
        }
        if error.is_timeout() {
            return TransportError::NoResponse(format!("timed out after {} ms", self.timeout_ms));
        }
        if error.is_connect() {
            return TransportError::NoResponse(format!("connection failed: {error}"));
        }
        TransportError::NoResponse(error.to_string())
    }

    fn collect_headers(response: &Response) -> Headers {
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.set(name.as_str(), value);
            }
        }
        headers
    }

    /// Reads the body chunk by chunk, reporting bytes against the content
    /// length.
    async fn read_with_progress(
        &self,
        mut response: Response,
        observer: &TransferObserver,
    ) -> Result<Vec<u8>, TransportError> {
        let total = response.content_length();
        let mut body = Vec::with_capacity(
            total
                .and_then(|t| usize::try_from(t).ok())
                .unwrap_or_default(),
        );
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_error(&e))? {
            body.extend_from_slice(&chunk);
            observer(body.len() as u64, total);
        }
        Ok(body)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn send(
        &self,
        request: OutgoingRequest,
        observer: Option<TransferObserver>,
    ) -> Result<TransportResponse, TransportError> {
        let url = request
            .resolve_url(&self.base_url)
            .map_err(|e| TransportError::NotSent(e.to_string()))?;
        debug!(%url, "sending");

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);

        let multipart = matches!(request.body, RequestBody::Multipart(_));
        for header in request.headers.iter() {
            // reqwest sets the multipart content type with its boundary
            if multipart && header.name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => {
                let upload_observer = observer.clone();
                let form = build_multipart(form, upload_observer)
                    .map_err(|e| TransportError::NotSent(e.to_string()))?;
                builder.multipart(form)
            }
        };

        let response = builder.send().await.map_err(|e| self.map_error(&e))?;
        let status = response.status().as_u16();
        let headers = Self::collect_headers(&response);
        debug!(status, "response received");

        let body = match (&observer, request.response_kind) {
            (Some(observer), ResponseKind::Binary) => {
                self.read_with_progress(response, observer).await?
            }
            _ => response
                .bytes()
                .await
                .map_err(|e| self.map_error(&e))?
                .to_vec(),
        };

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
