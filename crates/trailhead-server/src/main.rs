//! trailhead server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the JSON API over HTTP. Every setting has a
//! sensible default, so an empty or missing config file still boots a
//! local instance.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use trailhead_api::ApiState;
use trailhead_osm::OverpassClient;
use trailhead_store_sqlite::SqliteStore;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TRAILHEAD_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:                String,
  #[serde(default = "default_port")]
  port:                u16,
  #[serde(default = "default_store_path")]
  store_path:          PathBuf,
  #[serde(default = "default_overpass_url")]
  overpass_url:        String,
  #[serde(default = "default_user_agent")]
  overpass_user_agent: String,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8000 }
fn default_store_path() -> PathBuf { PathBuf::from("trailhead.db") }
fn default_overpass_url() -> String {
  trailhead_osm::DEFAULT_ENDPOINT.to_owned()
}
fn default_user_agent() -> String {
  concat!("trailhead/", env!("CARGO_PKG_VERSION")).to_owned()
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Trailhead trip-planning server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TRAILHEAD"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let osm = OverpassClient::new(
    server_cfg.overpass_url.clone(),
    &server_cfg.overpass_user_agent,
  )
  .context("failed to build overpass client")?;

  let state = ApiState { store: Arc::new(store), osm: Arc::new(osm) };
  let app = trailhead_api::api_router(state).layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
