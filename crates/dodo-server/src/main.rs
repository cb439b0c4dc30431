//! dodo server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), restores the
//! pet from an in-process SQLite store, polls Jira on a timer and serves the
//! JSON API plus the web UI over HTTP.
//!
//! # Checking a configuration
//!
//! ```
//! cargo run -p dodo-server --bin dodo -- --config config.toml --check-config
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use dodo_core::{
  clock::SystemClock,
  keeper::Keeper,
  state::PetState,
  store::SnapshotStore,
};
use dodo_jira::JiraClient;
use dodo_server::{ServerConfig, persist, poller};
use dodo_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "dodo, a virtual pet fed by your Jira backlog")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Validate the configuration and exit.
  #[arg(long)]
  check_config: bool,
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

  // Load configuration. Nested keys use `__`, e.g. DODO_PET__INDICATOR.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("DODO")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.validate().context("invalid configuration")?;

  if cli.check_config {
    println!("configuration ok");
    return Ok(());
  }

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store and restore the pet.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let initial = match store
    .load_latest()
    .await
    .context("failed to read saved pet state")?
  {
    Some(state) => {
      info!(hp = state.hp, level = state.level, "restored pet state");
      state
    }
    None => {
      warn!("no saved pet state; starting with a fresh pet");
      PetState::default()
    }
  };

  let keeper = Arc::new(
    Keeper::new(
      initial,
      server_cfg.pet.clone(),
      SystemClock::new(server_cfg.pet.timezone),
    )
    .context("failed to start keeper")?,
  );

  // Persist every committed state on a background task.
  let (observer, rx) = persist::channel();
  keeper.subscribe(observer);
  tokio::spawn(persist::run_writer(store, rx, server_cfg.history_keep));

  // Poll Jira.
  let jira = JiraClient::new(server_cfg.jira.clone())
    .context("failed to build jira client")?;
  tokio::spawn(poller::run(
    jira,
    Arc::clone(&keeper),
    server_cfg.update_interval(),
  ));

  if !server_cfg.webroot.is_dir() {
    warn!(
      webroot = %server_cfg.webroot.display(),
      "webroot not found; only /api will be served"
    );
  }
  let app = dodo_server::router(keeper, &server_cfg.webroot);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  info!("Listening on http://{address}");
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
