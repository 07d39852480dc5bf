//! Courier Application - Ports, pipeline and typed client
//!
//! This crate holds the client logic: the interceptor pipeline around the
//! transport port, error normalization, the typed request facade and the
//! stateful helpers built on it (resource state, pagination, uploads).
//! Concrete transports and stores live in the infrastructure crate.

pub mod auth;
pub mod client;
pub mod pagination;
pub mod pipeline;
pub mod ports;
pub mod resource;
pub mod upload;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use auth::{AuthInterceptor, InMemoryCredentialStore};
pub use client::{ApiClient, ApiClientBuilder, ProgressCallback};
pub use pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, PaginatedCursor};
pub use pipeline::{
    ClientEvent, InterceptorPipeline, RequestInterceptor, TransportFailure, format_error,
};
pub use ports::{
    CredentialStore, CredentialStoreError, TransferObserver, Transport, TransportError,
};
pub use resource::{Resource, ResourceSnapshot};
pub use upload::{UploadSnapshot, UploadTracker};
pub use use_cases::{EXAMPLES_PATH, ExampleService};
