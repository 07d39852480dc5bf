//! Command-line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Upload path used when `--to` is not given.
pub const DEFAULT_UPLOAD_PATH: &str = "/uploads";

/// Courier command line.
#[derive(Parser, Debug)]
#[command(name = "courier", version, about = "Typed client for the Courier example API")]
pub struct Cli {
    /// Base URL, overriding `COURIER_API_BASE_URL`.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds, overriding `COURIER_API_TIMEOUT`.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Directory holding the credential file.
    #[arg(long, global = true, env = "COURIER_CREDENTIALS_DIR")]
    pub credentials_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Store a bearer token for later calls.
    Login { token: String },
    /// Forget the stored token.
    Logout,
    /// Show configuration and whether a token is stored.
    Status,
    /// List examples, one page at a time.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one example.
    Show { id: String },
    /// Create an example.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
    },
    /// Partially update an example.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an example.
    Delete { id: String },
    /// Upload a file as multipart form data.
    Upload {
        file: PathBuf,
        #[arg(long, default_value = DEFAULT_UPLOAD_PATH)]
        to: String,
    },
    /// Download a binary resource to a file.
    Download {
        path: String,
        #[arg(long, short)]
        output: PathBuf,
    },
}
