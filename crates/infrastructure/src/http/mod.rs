//! HTTP infrastructure utilities.
//!
//! This module provides:
//! - Multipart body building with upload progress
//! - Loading files from disk into upload parts

mod body_builder;

pub use body_builder::{BodyBuildError, UPLOAD_CHUNK_SIZE, build_multipart, file_part_from_path};
