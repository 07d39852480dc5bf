//! Per-call request options.

use super::{Headers, QueryParams};

/// Options for a single facade call.
///
/// Built fresh for every call and consumed by it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    /// Extra headers; they override the client defaults.
    pub headers: Headers,
    /// Query parameters appended to the URL.
    pub params: QueryParams,
    /// Do not attach the stored bearer token.
    pub skip_auth: bool,
    /// Marks the caller as handling errors itself.
    ///
    /// The 401 side effects (credential clear and `Unauthorized` event) still
    /// happen; the flag is forwarded on the event.
    pub skip_error_handler: bool,
}

impl RequestConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.set(key, value);
        self
    }

    /// Replaces the query parameters.
    #[must_use]
    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Skips bearer token decoration.
    #[must_use]
    pub const fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    /// Sets the `skip_error_handler` flag.
    #[must_use]
    pub const fn skip_error_handler(mut self) -> Self {
        self.skip_error_handler = true;
        self
    }

    /// Returns a copy whose params are `params` overlaid on the existing ones.
    #[must_use]
    pub fn with_merged_params(mut self, params: &QueryParams) -> Self {
        self.params.merge(params);
        self
    }
}
