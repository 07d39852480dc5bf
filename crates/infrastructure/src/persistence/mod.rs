//! File system persistence.

mod credential_file;

pub use credential_file::{CREDENTIALS_FILE, FileCredentialStore};
