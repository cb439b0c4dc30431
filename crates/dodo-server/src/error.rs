//! Error type for server startup checks.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid server configuration: {0}")]
  InvalidConfig(String),

  #[error(transparent)]
  Engine(#[from] dodo_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
