//! Deterministic JSON serialization for files the client writes.
//!
//! Output uses 2-space indentation and a trailing newline, UTF-8 without BOM.

mod json;

pub use json::{SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes};
