//! HTTP request body builder.
//!
//! Turns the domain `MultipartForm` into a reqwest multipart form whose file
//! parts are streamed in chunks, so upload progress can be observed as the
//! transport consumes them. Also loads files from disk into `FilePart`s.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use courier_application::TransferObserver;
use courier_domain::{FilePart, FormValue, MultipartForm};
use futures::stream::{self, StreamExt};
use reqwest::Body;
use reqwest::multipart::{Form, Part};

/// Size of the chunks file parts are streamed in.
pub const UPLOAD_CHUNK_SIZE: usize = 16 * 1024;

/// Error type for body building operations.
#[derive(Debug, thiserror::Error)]
pub enum BodyBuildError {
    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: String,
    },

    /// Failed to read file.
    #[error("Failed to read file: {message}")]
    FileReadError {
        /// Underlying failure.
        message: String,
    },

    /// Invalid body configuration.
    #[error("Invalid body configuration: {message}")]
    InvalidConfig {
        /// What was wrong.
        message: String,
    },
}

/// Loads a file from disk, guessing its content type from the extension.
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be read.
pub async fn file_part_from_path(path: &Path) -> Result<FilePart, BodyBuildError> {
    let content = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            BodyBuildError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            BodyBuildError::FileReadError {
                message: format!("{}: {e}", path.display()),
            }
        }
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();
    let content_type = mime_guess::from_path(path).first_or_octet_stream().to_string();

    Ok(FilePart::new(file_name, content).with_content_type(content_type))
}

/// Builds a multipart form, reporting file bytes to `observer` as they are
/// read by the transport.
///
/// The progress total is the combined size of all file parts.
///
/// # Errors
///
/// Returns an error if a part carries an invalid MIME type.
pub fn build_multipart(
    form: &MultipartForm,
    observer: Option<TransferObserver>,
) -> Result<Form, BodyBuildError> {
    let total = form.file_bytes();
    let sent = Arc::new(AtomicU64::new(0));
    let mut multipart = Form::new();

    for field in form.fields() {
        match &field.value {
            FormValue::Text(value) => {
                multipart = multipart.text(field.name.clone(), value.clone());
            }
            FormValue::File(file) => {
                let part = file_part(file, total, Arc::clone(&sent), observer.clone())?;
                multipart = multipart.part(field.name.clone(), part);
            }
        }
    }

    Ok(multipart)
}

fn file_part(
    file: &FilePart,
    total: u64,
    sent: Arc<AtomicU64>,
    observer: Option<TransferObserver>,
) -> Result<Part, BodyBuildError> {
    let mime_type = file.content_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(&file.file_name)
            .first_or_octet_stream()
            .to_string()
    });

    let chunks: Vec<Vec<u8>> = file
        .bytes
        .chunks(UPLOAD_CHUNK_SIZE)
        .map(<[u8]>::to_vec)
        .collect();
    let counted = stream::iter(chunks).map(move |chunk| {
        let loaded = sent.fetch_add(chunk.len() as u64, Ordering::SeqCst) + chunk.len() as u64;
        if let Some(observer) = &observer {
            observer(loaded, Some(total));
        }
        Ok::<_, io::Error>(chunk)
    });

    Part::stream_with_length(Body::wrap_stream(counted), file.len())
        .file_name(file.file_name.clone())
        .mime_str(&mime_type)
        .map_err(|e| BodyBuildError::InvalidConfig {
            message: format!("Invalid MIME type: {e}"),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_part_from_path_guesses_type() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"a":1}"#).unwrap();

        let part = file_part_from_path(file.path()).await.unwrap();

        assert_eq!(part.content_type.as_deref(), Some("application/json"));
        assert_eq!(part.bytes, br#"{"a":1}"#.to_vec());
        assert!(part.file_name.ends_with(".json"));
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = file_part_from_path(&dir.path().join("nope.bin")).await;

        assert!(matches!(result, Err(BodyBuildError::FileNotFound { .. })));
    }

    #[test]
    fn test_invalid_mime_type_is_rejected() {
        let form = MultipartForm::new().file(
            "file",
            FilePart::new("a.txt", b"x".to_vec()).with_content_type("not a mime"),
        );

        assert!(matches!(
            build_multipart(&form, None),
            Err(BodyBuildError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_form_with_text_and_files_builds() {
        let form = MultipartForm::new()
            .text("title", "report")
            .file("a", FilePart::new("a.bin", vec![0u8; 10]))
            .file("b", FilePart::new("b.bin", vec![0u8; 5]));

        assert!(build_multipart(&form, None).is_ok());
    }
}
