//! Response-side types.

mod envelope;
mod pagination;
mod spec;

pub use envelope::{ApiEnvelope, FieldErrors};
pub use pagination::{PaginatedResponse, PaginationMeta};
pub use spec::{TransportResponse, UNAUTHORIZED};
