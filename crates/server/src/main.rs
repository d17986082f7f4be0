//! Pixlock server - password-protectable image sharing API
//!
//! Serves the account, session, and image-resource routes backed by a
//! SQLite database and a local (or in-memory) blob store.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use service::{Config, ServiceState};

/// Pixlock server - password-protectable image sharing API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on for HTTP requests
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Path to SQLite database file (in-memory if omitted)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Path to the uploads directory (in-memory if omitted)
    #[arg(short, long)]
    uploads: Option<PathBuf>,

    /// Session token signing secret. If omitted a random secret is
    /// generated and sessions do not survive a restart.
    #[arg(long)]
    token_secret: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let log_level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stdout_layer).init();

    tracing::info!("Starting pixlock server");

    // Create configuration
    let config = Config {
        listen_addr: SocketAddr::from_str(&format!("0.0.0.0:{}", args.port))?,
        sqlite_path: args.database,
        uploads_path: args.uploads,
        token_secret: args.token_secret,
        log_level,
    };

    // Create state
    let state = match ServiceState::from_config(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to create service state: {}", e);
            std::process::exit(1);
        }
    };

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let graceful_shutdown = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl+c");
        tracing::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    };
    tokio::spawn(graceful_shutdown);

    service::http::run(state, config.log_level, config.listen_addr, shutdown_rx).await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
