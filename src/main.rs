use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memeboard::{AppState, config::Config, errors::AppError};

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    // Initialize tracing (logging); stdout is reserved for command output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "memeboard=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let mut config = Config::load()?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    if let Some(api_base_url) = cli.api_base_url {
        config.api_base_url = api_base_url;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    tracing::debug!(?config, "Configuration loaded");

    // --- Application State ---
    let state = AppState::from_config(config);

    cli::run(cli.command, state).await.map_err(|e| {
        tracing::error!(error = %e, "Command failed");
        e
    })
}
