//! HTTP Request body types

use serde_json::Value;

/// Field name a bare file is uploaded under.
pub const FILE_FIELD_NAME: &str = "file";

/// HTTP request body.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// JSON document, sent as `application/json`
    Json(Value),
    /// Multipart form, sent as `multipart/form-data`
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Returns true if there is no body.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// An in-memory file to be uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type; the transport falls back to `application/octet-stream`.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Creates a file part without an explicit content type.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size of the contents in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Returns true if the file is empty.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for FilePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePart")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Value of a multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Plain text field.
    Text(String),
    /// File field.
    File(FilePart),
}

/// A named multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: FormValue,
}

/// Multipart form payload, fields kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    fields: Vec<FormField>,
}

impl MultipartForm {
    /// Creates an empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FormField {
            name: name.into(),
            value: FormValue::Text(value.into()),
        });
        self
    }

    /// Appends a file field.
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.fields.push(FormField {
            name: name.into(),
            value: FormValue::File(file),
        });
        self
    }

    /// Returns the fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Total size of all file contents, used as the upload progress total.
    #[must_use]
    pub fn file_bytes(&self) -> u64 {
        self.fields
            .iter()
            .map(|field| match &field.value {
                FormValue::File(file) => file.len(),
                FormValue::Text(_) => 0,
            })
            .sum()
    }
}

/// What `upload_file` accepts: a bare file or a pre-built form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPayload {
    /// A single file, wrapped under [`FILE_FIELD_NAME`].
    File(FilePart),
    /// A caller-assembled form, sent as-is.
    Form(MultipartForm),
}

impl UploadPayload {
    /// Converts the payload into the form that goes on the wire.
    #[must_use]
    pub fn into_form(self) -> MultipartForm {
        match self {
            Self::File(file) => MultipartForm::new().file(FILE_FIELD_NAME, file),
            Self::Form(form) => form,
        }
    }
}

impl From<FilePart> for UploadPayload {
    fn from(file: FilePart) -> Self {
        Self::File(file)
    }
}

impl From<MultipartForm> for UploadPayload {
    fn from(form: MultipartForm) -> Self {
        Self::Form(form)
    }
}
