//! # jsv-api binary
//!
//! Reads configuration from `JSV_*` environment variables, applies
//! command-line overrides, and serves the HTTP API until Ctrl-C.

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jsv_api::config::{AppConfig, LogFormat};
use jsv_api::middleware::metrics::install_recorder;
use jsv_api::state::AppState;

/// JSON Schema Vault HTTP service.
#[derive(Parser, Debug)]
#[command(name = "jsv-api", version, about)]
struct Cli {
    /// Address to bind (overrides JSV_HOST).
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to listen on (overrides JSV_PORT).
    #[arg(long, short)]
    port: Option<u16>,

    /// Directory holding schema files (overrides JSV_SCHEMA_DIR).
    #[arg(long)]
    schema_dir: Option<PathBuf>,

    /// Log output format (overrides JSV_LOG_FORMAT).
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = self.schema_dir {
            config.schema_dir = dir;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("invalid environment configuration")?;
    cli.apply(&mut config);

    init_tracing(config.log_format);

    let metrics = if config.metrics_enabled {
        Some(install_recorder().context("failed to install Prometheus recorder")?)
    } else {
        None
    };

    let addr = config.bind_addr();
    tracing::info!(
        %addr,
        schema_dir = %config.schema_dir.display(),
        metrics = config.metrics_enabled,
        "jsv-api v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let app = jsv_api::app(AppState::with_config(config, metrics));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("jsv-api stopped");
    Ok(())
}
