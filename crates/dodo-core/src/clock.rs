//! Where "now" comes from.

use std::sync::Mutex;

use chrono::{DateTime, FixedOffset, Local, TimeDelta, Utc};

use crate::config::EvaluationZone;

/// Supplies the current instant in the evaluation timezone.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<FixedOffset>;
}

/// The wall clock, expressed in UTC or the host's local zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
  zone: EvaluationZone,
}

impl SystemClock {
  pub fn new(zone: EvaluationZone) -> Self { Self { zone } }
}

impl Clock for SystemClock {
  fn now(&self) -> DateTime<FixedOffset> {
    match self.zone {
      EvaluationZone::Utc => Utc::now().fixed_offset(),
      EvaluationZone::Local => Local::now().fixed_offset(),
    }
  }
}

/// A clock that only moves when told to. Intended for tests.
#[derive(Debug)]
pub struct FixedClock {
  now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
  pub fn new(now: DateTime<FixedOffset>) -> Self {
    Self { now: Mutex::new(now) }
  }

  pub fn set(&self, now: DateTime<FixedOffset>) {
    *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
  }

  pub fn advance(&self, by: TimeDelta) {
    let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
    *now += by;
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<FixedOffset> {
    *self.now.lock().unwrap_or_else(|e| e.into_inner())
  }
}
