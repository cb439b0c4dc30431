//! The periodic fetch → assess → tick loop.

use std::{sync::Arc, time::Duration};

use dodo_core::{
  aggregate::assess,
  clock::Clock,
  item::WorkItemSource,
  keeper::Keeper,
  state::PetState,
};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

/// Run one poll cycle against `source`.
///
/// A failed fetch still ticks the keeper, with no event, so evolution can
/// proceed while health stays where it was.
pub async fn poll_once<S, C>(source: &S, keeper: &Keeper<C>) -> Arc<PetState>
where
  S: WorkItemSource,
  C: Clock,
{
  match source.fetch().await {
    Ok(items) => {
      let event = assess(&items, keeper.config(), keeper.clock().now());
      debug!(items = items.len(), level = event.level, "assessed backlog");
      keeper.tick(Some(event))
    }
    Err(e) => {
      warn!(error = %e, "fetch failed; health unchanged this cycle");
      keeper.tick(None)
    }
  }
}

/// Poll forever, every `period`. The first cycle runs immediately.
pub async fn run<S, C>(source: S, keeper: Arc<Keeper<C>>, period: Duration)
where
  S: WorkItemSource,
  C: Clock,
{
  let mut ticker = interval(period);
  ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
  info!(?period, "poller started");

  loop {
    ticker.tick().await;
    let state = poll_once(&source, &keeper).await;
    info!(
      hp = state.hp,
      level = state.level,
      level_progress = state.level_progress,
      "pet updated"
    );
  }
}
