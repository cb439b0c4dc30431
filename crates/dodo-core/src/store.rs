//! The `SnapshotStore` trait.
//!
//! Implemented by storage backends (e.g. `dodo-store-sqlite`). The server
//! loads the latest snapshot once at startup and saves every committed state
//! afterwards; nothing in the engine reads back from the store mid-run.

use std::future::Future;

use crate::state::PetState;

/// Abstraction over a persistent log of pet states.
///
/// All methods return `Send` futures so the trait can be used from a tokio
/// task.
pub trait SnapshotStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append `state` as the newest snapshot.
  fn save(
    &self,
    state: PetState,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The most recently saved snapshot, or `None` for a fresh store.
  fn load_latest(
    &self,
  ) -> impl Future<Output = Result<Option<PetState>, Self::Error>> + Send + '_;
}
