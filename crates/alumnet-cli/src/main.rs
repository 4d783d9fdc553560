//! Alumnet CLI - drive the community store from the terminal
//!
//! By default operations run against the bundled sample community; pass
//! `--server` to talk to a remote API instead. The signed-in session is
//! kept in a local JSON file between runs.

mod cli;
mod commands;
mod error;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use alumnet_core::services::{CredentialStore, FileCredentialStore, HttpBackend, MemoryBackend};
use alumnet_core::Store;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("alumnet=info".parse().expect("valid directive")),
        )
        .init();

    let args = Cli::parse();
    let session_file = args
        .session_file
        .unwrap_or_else(|| PathBuf::from(".alumnet").join("session.json"));
    let credentials = Arc::new(FileCredentialStore::new(session_file));

    let store = match args.server {
        Some(server) => {
            let mut backend = HttpBackend::new(server)?;
            if let Ok(Some(stored)) = credentials.restore() {
                backend = backend.with_token(stored.token);
            }
            Store::with_backend(backend, credentials)
        }
        None => Store::with_backend(MemoryBackend::with_sample_data(), credentials),
    };

    match args.command {
        Commands::Posts { command } => commands::posts::run(&store, command).await,
        Commands::Events { command } => commands::events::run(&store, command).await,
        Commands::Users { command } => commands::users::run(&store, command).await,
        Commands::Auth { command } => commands::auth::run(&store, command).await,
    }
}
