//! MedBook - hospital appointment booking client
//!
//! Browse hospitals and their doctors, book appointments and review them
//! from the terminal.

use clap::Parser;
use medbook_app::cli::Cli;
use medbook_app::{commands, state};
use medbook_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    // An explicit --log-level wins over RUST_LOG, which wins over the config file
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!(base_url = %config.api.base_url, "Starting MedBook");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match state::AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app_state.auth.restore() {
        tracing::warn!("Could not restore previous session: {}", e);
    }

    if let Err(e) = runtime.block_on(commands::run(cli.command, &app_state)) {
        tracing::debug!(kind = e.kind(), "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
