//! Outgoing request specification
//!
//! `OutgoingRequest` is the plain-data request handed to the transport after
//! the pipeline has decorated it.

use url::Url;

use super::{Headers, HttpMethod, QueryParams, RequestBody, RequestConfig};
use crate::error::{DomainError, DomainResult};

/// How the transport should treat the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    /// JSON document.
    #[default]
    Json,
    /// Opaque bytes, read chunk by chunk so progress can be reported.
    Binary,
}

/// A request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path relative to the base URL, or an absolute `http(s)` URL.
    pub path: String,
    /// Query parameters.
    pub query: QueryParams,
    /// Request headers.
    pub headers: Headers,
    /// Request body.
    pub body: RequestBody,
    /// Expected response body kind.
    pub response_kind: ResponseKind,
}

impl OutgoingRequest {
    /// Creates a bodiless request.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            headers: Headers::new(),
            body: RequestBody::Empty,
            response_kind: ResponseKind::Json,
        }
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Sets the expected response kind.
    #[must_use]
    pub const fn with_response_kind(mut self, kind: ResponseKind) -> Self {
        self.response_kind = kind;
        self
    }

    /// Merges the call's headers and params into the request.
    pub fn apply_config(&mut self, config: &RequestConfig) {
        self.headers.merge(&config.headers);
        self.query.merge(&config.params);
    }

    /// Resolves the absolute URL against `base_url`, query string included.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] if the joined string is not a URL.
    pub fn resolve_url(&self, base_url: &str) -> DomainResult<Url> {
        let joined = join_url(base_url, &self.path);
        let mut url =
            Url::parse(&joined).map_err(|e| DomainError::InvalidUrl(format!("{e}: {joined}")))?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in self.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }
        Ok(url)
    }
}

/// Joins a request path onto the base URL.
///
/// Absolute `http://`/`https://` paths bypass the base URL.
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if path.is_empty() {
        return base_url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Percent-encodes `segment` for use as a single path segment.
///
/// `/`, `?`, `#` and `%` are escaped so the value cannot change the request
/// target.
#[must_use]
pub fn encode_path_segment(segment: &str) -> String {
    Url::parse("http://localhost/")
        .ok()
        .and_then(|mut url| {
            url.path_segments_mut().ok()?.clear().push(segment);
            Some(url.path().trim_start_matches('/').to_string())
        })
        .unwrap_or_else(|| segment.to_string())
}
