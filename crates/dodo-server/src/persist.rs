//! Hands committed states to the snapshot store off the keeper's write path.
//!
//! The [`SnapshotObserver`] only enqueues; [`run_writer`] drains the queue on
//! its own task, so a slow or failing disk never holds up a tick.

use dodo_core::{
  keeper::{BoxError, Observer},
  state::PetState,
  store::SnapshotStore,
};
use dodo_store_sqlite::SqliteStore;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, warn};

/// Keeper observer that forwards every new state to the writer task.
pub struct SnapshotObserver {
  tx: UnboundedSender<PetState>,
}

/// Create a connected observer / receiver pair.
pub fn channel() -> (SnapshotObserver, UnboundedReceiver<PetState>) {
  let (tx, rx) = unbounded_channel();
  (SnapshotObserver { tx }, rx)
}

impl Observer for SnapshotObserver {
  fn on_change(&self, _previous: &PetState, next: &PetState) -> Result<(), BoxError> {
    self
      .tx
      .send(next.clone())
      .map_err(|_| BoxError::from("snapshot writer has stopped"))
  }
}

/// Save each received state, then prune to the newest `keep` rows
/// (`0` disables pruning). Returns once every sender is dropped.
pub async fn run_writer(
  store: SqliteStore,
  mut rx: UnboundedReceiver<PetState>,
  keep: usize,
) {
  while let Some(state) = rx.recv().await {
    let hp = state.hp;
    if let Err(e) = store.save(state).await {
      warn!(error = %e, "failed to persist pet state");
      continue;
    }
    debug!(hp, "snapshot saved");
    if keep > 0
      && let Err(e) = store.prune(keep).await
    {
      warn!(error = %e, "failed to prune snapshots");
    }
  }
  debug!("snapshot writer stopped");
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use dodo_core::{
    clock::FixedClock,
    config::EngineConfig,
    keeper::Keeper,
    state::Progress,
  };

  use super::*;

  #[tokio::test]
  async fn committed_states_reach_the_store() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let now = Utc.with_ymd_and_hms(2017, 6, 22, 12, 0, 0).unwrap().fixed_offset();
    let keeper =
      Keeper::new(PetState::default(), EngineConfig::default(), FixedClock::new(now)).unwrap();

    let (observer, rx) = channel();
    keeper.subscribe(observer);
    keeper.set_progress(Progress { level: 1, level_progress: 0 }).unwrap();
    keeper.set_progress(Progress { level: 1, level_progress: 5 }).unwrap();
    keeper.set_progress(Progress { level: 2, level_progress: 0 }).unwrap();

    // Dropping the keeper drops the observer, closing the channel.
    drop(keeper);
    run_writer(store.clone(), rx, 2).await;

    let saved: Vec<(u8, u8)> = store
      .recent(10)
      .await
      .unwrap()
      .iter()
      .map(|(_, s)| (s.level, s.level_progress))
      .collect();
    assert_eq!(saved, vec![(2, 0), (1, 5)]);
  }

  #[test]
  fn closed_channel_is_an_observer_error() {
    let (observer, rx) = channel();
    drop(rx);
    let state = PetState::default();
    assert!(observer.on_change(&state, &state).is_err());
  }
}
