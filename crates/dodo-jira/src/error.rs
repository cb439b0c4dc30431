//! Error types for the Jira adapter.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unexpected search response: {0}")]
  Json(#[from] serde_json::Error),

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("jira answered {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body:   String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
