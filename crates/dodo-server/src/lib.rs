//! HTTP server wiring for dodo.
//!
//! Combines the JSON API from [`dodo_api`], a static webroot for the pet's
//! web UI, the Jira [`poller`] and the snapshot [`persist`]ence task.

pub mod error;
pub mod persist;
pub mod poller;

pub use error::{Error, Result};

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::Router;
use dodo_core::{clock::Clock, config::EngineConfig, keeper::Keeper};
use dodo_jira::JiraConfig;
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 9090 }
fn default_webroot() -> PathBuf { PathBuf::from("webroot") }
fn default_store_path() -> PathBuf { PathBuf::from("dodo.sqlite") }
fn default_update_interval_minutes() -> u64 { 10 }
fn default_history_keep() -> usize { 1000 }

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                    String,
  #[serde(default = "default_port")]
  pub port:                    u16,
  /// Directory served at `/` (the pet's web UI). It is not shipped with the
  /// server; when it is missing only `/api` answers.
  #[serde(default = "default_webroot")]
  pub webroot:                 PathBuf,
  #[serde(default = "default_store_path")]
  pub store_path:              PathBuf,
  /// Minutes between two Jira polls.
  #[serde(default = "default_update_interval_minutes")]
  pub update_interval_minutes: u64,
  /// Snapshots kept in the store; `0` keeps everything.
  #[serde(default = "default_history_keep")]
  pub history_keep:            usize,
  pub jira:                    JiraConfig,
  #[serde(default)]
  pub pet:                     EngineConfig,
}

impl ServerConfig {
  pub fn validate(&self) -> Result<()> {
    self.pet.validate()?;
    if self.update_interval_minutes == 0 {
      return Err(Error::InvalidConfig(
        "update_interval_minutes must be at least 1".into(),
      ));
    }
    if self.jira.url.trim().is_empty() {
      return Err(Error::InvalidConfig("jira.url must be set".into()));
    }
    Ok(())
  }

  pub fn update_interval(&self) -> Duration {
    Duration::from_secs(self.update_interval_minutes.saturating_mul(60))
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full HTTP router: `/api/*` plus static files from `webroot`.
pub fn router<C>(keeper: Arc<Keeper<C>>, webroot: &Path) -> Router
where
  C: Clock + 'static,
{
  Router::new()
    .nest("/api", dodo_api::api_router(keeper))
    .fallback_service(ServeDir::new(webroot))
    .layer(TraceLayer::new_for_http())
}
