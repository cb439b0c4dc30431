//! Error types for `dodo-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("progress out of range: level {level}, level progress {level_progress}")]
  InvalidProgress { level: u8, level_progress: u8 },

  #[error("health out of range: {0}")]
  InvalidHealth(u8),

  #[error("unparseable timestamp {value:?}: {source}")]
  Timestamp {
    value:  String,
    #[source]
    source: chrono::ParseError,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
