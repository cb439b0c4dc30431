//! Error type for `dodo-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored row holds a value no `PetState` can carry.
  #[error("corrupt snapshot {id}: {reason}")]
  Corrupt { id: i64, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
