//! Courier - command-line entry point
//!
//! Loads settings from the environment, applies command-line overrides and
//! runs one command against the API. JSON goes to stdout; progress and
//! diagnostics go to stderr.

mod cli;

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use courier_application::{
    ApiClient, ClientEvent, ExampleService, ProgressCallback, UploadTracker,
};
use courier_domain::{ClientSettings, CreateExample, QueryParams, UpdateExample};
use courier_infrastructure::{FileCredentialStore, build_client, file_part_from_path, load_settings};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast::Receiver;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

type CliResult<T = ()> = Result<T, Box<dyn Error>>;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult {
    let settings = resolve_settings(&cli)?;
    let credentials_dir = cli
        .credentials_dir
        .clone()
        .or_else(FileCredentialStore::default_dir)
        .ok_or("no data directory available; pass --credentials-dir")?;
    tracing::debug!(base_url = %settings.base_url, "client configured");

    let client = build_client(&settings, &credentials_dir)?;
    let mut events = client.subscribe();

    let result = execute(cli.command, &client, &settings, credentials_dir).await;
    report_events(&mut events);
    result
}

fn resolve_settings(cli: &Cli) -> CliResult<ClientSettings> {
    let mut settings = load_settings()?;
    if let Some(base_url) = &cli.base_url {
        settings.base_url.clone_from(base_url);
    }
    if let Some(timeout_ms) = cli.timeout_ms.filter(|ms| *ms > 0) {
        settings.timeout_ms = timeout_ms;
    }
    Ok(settings)
}

async fn execute(
    command: Commands,
    client: &ApiClient,
    settings: &ClientSettings,
    credentials_dir: PathBuf,
) -> CliResult {
    let examples = ExampleService::new(client.clone());

    match command {
        Commands::Login { token } => {
            client.set_auth(token).await?;
            eprintln!("token stored");
        }
        Commands::Logout => {
            client.clear_auth().await?;
            eprintln!("token cleared");
        }
        Commands::Status => {
            let store = FileCredentialStore::new(credentials_dir);
            print_json(&serde_json::json!({
                "baseUrl": settings.base_url,
                "timeoutMs": settings.timeout_ms,
                "authenticated": client.is_authenticated().await,
                "credentialsFile": store.path(),
            }))?;
        }
        Commands::List {
            page,
            limit,
            search,
        } => {
            let mut params = QueryParams::new().with("page", page).with("limit", limit);
            if let Some(search) = search {
                params.set("search", search);
            }
            print_json(&examples.find_all(&params).await?)?;
        }
        Commands::Show { id } => print_json(&examples.find_one(&id).await?)?,
        Commands::Create { name, description } => {
            print_json(&examples.create(&CreateExample { name, description }).await?)?;
        }
        Commands::Update {
            id,
            name,
            description,
        } => {
            if name.is_none() && description.is_none() {
                return Err("nothing to update; pass --name and/or --description".into());
            }
            let dto = UpdateExample { name, description };
            print_json(&examples.update(&id, &dto).await?)?;
        }
        Commands::Delete { id } => {
            examples.remove(&id).await?;
            eprintln!("deleted {id}");
        }
        Commands::Upload { file, to } => upload(client, &file, to).await?,
        Commands::Download { path, output } => {
            let bytes = client
                .download_file(&path, Some(progress_printer("downloading")), None)
                .await;
            eprintln!();
            let bytes = bytes?;
            tokio::fs::write(&output, &bytes).await?;
            eprintln!("wrote {} bytes to {}", bytes.len(), output.display());
        }
    }
    Ok(())
}

async fn upload(client: &ApiClient, file: &std::path::Path, to: String) -> CliResult {
    let part = file_part_from_path(file).await?;
    let tracker = UploadTracker::new(client.clone(), to);
    let mut updates = tracker.subscribe();

    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if snapshot.uploading {
                print_progress("uploading", snapshot.progress);
            }
        }
    });

    let result = tracker.upload::<Value>(part).await;
    drop(tracker);
    let _ = watcher.await;
    eprintln!();

    print_json(&result?)
}

fn progress_printer(label: &'static str) -> ProgressCallback {
    Arc::new(move |percent| print_progress(label, percent))
}

fn print_progress(label: &str, percent: u8) {
    eprint!("\r{label} {percent:>3}%");
    let _ = std::io::stderr().flush();
}

fn print_json<T: Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_events(events: &mut Receiver<ClientEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            ClientEvent::Unauthorized { method, path, .. } => {
                eprintln!("{method} {path} was rejected as unauthorized; run `courier login <token>`");
            }
        }
    }
}
