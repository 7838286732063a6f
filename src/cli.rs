//! Command-line interface

use crate::server::{self, config::AppConfig};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// PC Doctor server CLI
#[derive(Debug, Parser)]
#[command(name = "pcdoctor", version, about = "AI-assisted PC troubleshooting service")]
pub struct Cli {
    /// Path to the TOML config file (defaults to pcdoctor.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the bind address, e.g. 0.0.0.0:8080
    #[arg(long)]
    pub bind: Option<String>,
}

/// Load configuration and start the server.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    info!("starting PC Doctor v{}", env!("CARGO_PKG_VERSION"));
    server::run(config).await
}
