//! Courier Domain - Core client types
//!
//! This crate defines the data model of the Courier API client: requests,
//! responses, the normalized error, pagination and progress.
//! All types here are pure Rust with no I/O dependencies.

pub mod api_error;
pub mod auth;
pub mod error;
pub mod example;
pub mod progress;
pub mod request;
pub mod response;
pub mod settings;
pub mod state;

pub use api_error::{
    ApiError, DEFAULT_RESPONSE_MESSAGE, FailureKind, INVALID_RESPONSE, NETWORK_ERROR,
    NETWORK_ERROR_MESSAGE, UNKNOWN_ERROR, UNKNOWN_ERROR_MESSAGE,
};
pub use auth::{AUTH_TOKEN_KEY, AuthToken};
pub use error::{DomainError, DomainResult};
pub use example::{CreateExample, ExampleItem, UpdateExample};
pub use progress::{ProgressTracker, percentage};
pub use request::{
    FilePart, FormField, FormValue, Headers, HttpMethod, MultipartForm, OutgoingRequest,
    QueryParams, RequestBody, RequestConfig, ResponseKind, UploadPayload, encode_path_segment,
};
pub use response::{ApiEnvelope, FieldErrors, PaginatedResponse, PaginationMeta, TransportResponse};
pub use settings::{ClientSettings, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
pub use state::LoadingState;
