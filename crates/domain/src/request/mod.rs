//! Request-side types: verbs, headers, query parameters, bodies and per-call
//! configuration.

mod body;
mod config;
mod header;
mod method;
mod query;
mod spec;

pub use body::{
    FILE_FIELD_NAME, FilePart, FormField, FormValue, MultipartForm, RequestBody, UploadPayload,
};
pub use config::RequestConfig;
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
pub use spec::{OutgoingRequest, ResponseKind, encode_path_segment, join_url};
