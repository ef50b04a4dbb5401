//! Process wiring for the Blotter server: configuration, start-up and the
//! top-level router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::{Router, extract::DefaultBodyLimit};
use blotter_api::{ApiState, api_router};
use blotter_media::MediaDir;
use blotter_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("blotter.db") }
fn default_media_dir() -> PathBuf { PathBuf::from("photos") }
fn default_max_upload_bytes() -> usize { 16 * 1024 * 1024 }

/// Runtime server configuration, deserialised from `blotter.toml` and
/// `BLOTTER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  /// SQLite database file.
  #[serde(default = "default_store_path")]
  pub store_path:       PathBuf,
  /// Directory holding subject photos.
  #[serde(default = "default_media_dir")]
  pub media_dir:        PathBuf,
  /// Largest accepted request body; photos arrive base64-encoded inside it.
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             default_host(),
      port:             default_port(),
      store_path:       default_store_path(),
      media_dir:        default_media_dir(),
      max_upload_bytes: default_max_upload_bytes(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `BLOTTER_*` variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("BLOTTER"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.media_dir = expand_tilde(&cfg.media_dir);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Start-up ─────────────────────────────────────────────────────────────────

/// Open the store (ensuring its schema) and the media directory.
pub async fn open_state(cfg: &ServerConfig) -> anyhow::Result<ApiState<SqliteStore>> {
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  let media = MediaDir::new(&cfg.media_dir);
  media
    .ensure()
    .await
    .with_context(|| format!("failed to create media dir {:?}", cfg.media_dir))?;

  tracing::info!(store = ?cfg.store_path, media = ?cfg.media_dir, "records opened");
  Ok(ApiState::new(Arc::new(store), Arc::new(media)))
}

/// The full application router: the API under `/api`, with request tracing.
pub fn app(state: ApiState<SqliteStore>, cfg: &ServerConfig) -> Router {
  Router::new()
    .nest("/api", api_router(state))
    .layer(DefaultBodyLimit::max(cfg.max_upload_bytes))
    .layer(TraceLayer::new_for_http())
}
