//! [`Keeper`]: the single holder of the pet state.
//!
//! Reads are lock-free snapshot loads. Writes (`tick`, `set_progress`) are
//! serialised, commit by swapping in a whole new [`PetState`], and only then
//! notify observers, outside the write lock. An observer that fails or panics is logged and skipped;
//! the committed state and the remaining observers are unaffected.

use std::{
  panic::{AssertUnwindSafe, catch_unwind},
  sync::{Arc, Mutex},
};

use arc_swap::ArcSwap;
use tracing::{debug, warn};

use crate::{
  Error, Result,
  aggregate::Event,
  clock::Clock,
  config::EngineConfig,
  evolution::transition,
  state::{MAX_HP, PetState, Progress},
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Notified with `(previous, next)` after every committed change.
pub trait Observer: Send + Sync {
  fn on_change(&self, previous: &PetState, next: &PetState) -> Result<(), BoxError>;
}

impl<F> Observer for F
where
  F: Fn(&PetState, &PetState) -> Result<(), BoxError> + Send + Sync,
{
  fn on_change(&self, previous: &PetState, next: &PetState) -> Result<(), BoxError> {
    self(previous, next)
  }
}

pub struct Keeper<C> {
  state:     ArcSwap<PetState>,
  observers: ArcSwap<Vec<Arc<dyn Observer>>>,
  writer:    Mutex<()>,
  config:    EngineConfig,
  clock:     C,
}

impl<C: Clock> Keeper<C> {
  /// Validate `config` and `initial`, then take ownership of both.
  pub fn new(initial: PetState, config: EngineConfig, clock: C) -> Result<Self> {
    config.validate()?;
    let progress = initial.progress();
    if !progress.is_valid() {
      return Err(Error::InvalidProgress {
        level:          progress.level,
        level_progress: progress.level_progress,
      });
    }
    if initial.hp > MAX_HP {
      return Err(Error::InvalidHealth(initial.hp));
    }
    Ok(Self {
      state: ArcSwap::from_pointee(initial),
      observers: ArcSwap::from_pointee(Vec::new()),
      writer: Mutex::new(()),
      config,
      clock,
    })
  }

  pub fn config(&self) -> &EngineConfig { &self.config }

  pub fn clock(&self) -> &C { &self.clock }

  /// The latest committed snapshot.
  pub fn state(&self) -> Arc<PetState> { self.state.load_full() }

  pub fn progress(&self) -> Progress { self.state.load().progress() }

  /// Register an observer; it sees every change committed from now on.
  pub fn subscribe(&self, observer: impl Observer + 'static) {
    let observer: Arc<dyn Observer> = Arc::new(observer);
    self.observers.rcu(|current| {
      let mut next = Vec::clone(current);
      next.push(Arc::clone(&observer));
      next
    });
  }

  /// Advance one poll cycle. `None` means this cycle's fetch failed.
  pub fn tick(&self, event: Option<Event>) -> Arc<PetState> {
    let (previous, next) = {
      let _writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
      let previous = self.state.load_full();
      let next = Arc::new(transition(
        &previous,
        event.as_ref(),
        &self.config,
        self.clock.now(),
      ));
      self.state.store(Arc::clone(&next));
      (previous, next)
    };
    debug!(
      hp.from = previous.hp,
      hp.to = next.hp,
      level = next.level,
      level_progress = next.level_progress,
      has_event = event.is_some(),
      "tick"
    );
    self.notify(&previous, &next);
    next
  }

  /// Overwrite the evolution rank only, bypassing the transition function.
  pub fn set_progress(&self, progress: Progress) -> Result<Arc<PetState>> {
    if !progress.is_valid() {
      return Err(Error::InvalidProgress {
        level:          progress.level,
        level_progress: progress.level_progress,
      });
    }
    let (previous, next) = {
      let _writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
      let previous = self.state.load_full();
      let next = Arc::new(PetState {
        level: progress.level,
        level_progress: progress.level_progress,
        ..PetState::clone(&previous)
      });
      self.state.store(Arc::clone(&next));
      (previous, next)
    };
    debug!(?progress, "progress overridden");
    self.notify(&previous, &next);
    Ok(next)
  }

  // Runs after the writer lock is released, so observers may write back.
  fn notify(&self, previous: &PetState, next: &PetState) {
    for observer in self.observers.load().iter() {
      match catch_unwind(AssertUnwindSafe(|| observer.on_change(previous, next))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "state observer failed"),
        Err(_) => warn!("state observer panicked"),
      }
    }
  }
}
