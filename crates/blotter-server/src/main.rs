//! Blotter server binary.
//!
//! Reads `blotter.toml` (or the path given with `--config`), overlays
//! `BLOTTER_*` environment variables, opens the SQLite store and media
//! directory, and serves the JSON API under `/api`.

use std::path::PathBuf;

use anyhow::Context as _;
use blotter_server::{ServerConfig, app, open_state};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Blotter record server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "blotter.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)?;

  let state = open_state(&cfg).await?;
  let app = app(state, &cfg);
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
