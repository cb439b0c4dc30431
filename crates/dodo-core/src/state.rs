//! The pet's persisted condition.

use serde::{Deserialize, Serialize};

pub const MAX_HP: u8 = 100;
/// Below this the pet is sick and stops evolving. The web UI uses the same
/// threshold to pick the sick sprite.
pub const SICK_BELOW_HP: u8 = 40;
pub const MAX_LEVEL: u8 = 2;
pub const MAX_LEVEL_PROGRESS: u8 = 9;

/// The single mutable pet state, as served by `GET /api/state` and written to
/// the snapshot store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetState {
  /// Health, 0-100. Zero means dead.
  pub hp:               u8,
  /// Evolution rank, 0-2.
  pub level:            u8,
  /// Sub-step within the rank, 0-9.
  pub level_progress:   u8,
  pub message:          String,
  /// Epoch milliseconds from which the next evolution interval is measured;
  /// `0` while unset.
  #[serde(alias = "evolutionTimestamp")]
  pub evolution_anchor: i64,
}

impl Default for PetState {
  fn default() -> Self {
    Self {
      hp:               MAX_HP,
      level:            0,
      level_progress:   0,
      message:          String::new(),
      evolution_anchor: 0,
    }
  }
}

impl PetState {
  pub fn is_dead(&self) -> bool { self.hp == 0 }

  pub fn is_sick(&self) -> bool { self.hp < SICK_BELOW_HP }

  pub fn progress(&self) -> Progress {
    Progress {
      level:          self.level,
      level_progress: self.level_progress,
    }
  }
}

/// The evolution rank on its own; the administrative override surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
  pub level:          u8,
  pub level_progress: u8,
}

impl Progress {
  pub fn is_valid(&self) -> bool {
    self.level <= MAX_LEVEL && self.level_progress <= MAX_LEVEL_PROGRESS
  }

  /// `(2, 9)`: no further evolution is possible.
  pub fn is_terminal(&self) -> bool {
    self.level == MAX_LEVEL && self.level_progress == MAX_LEVEL_PROGRESS
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn serialises_with_wire_field_names() {
    let state = PetState {
      hp:               40,
      level:            1,
      level_progress:   3,
      message:          "hi".into(),
      evolution_anchor: 1_498_377_600_000,
    };
    assert_eq!(
      serde_json::to_value(&state).unwrap(),
      json!({
        "hp": 40,
        "level": 1,
        "levelProgress": 3,
        "message": "hi",
        "evolutionAnchor": 1_498_377_600_000_i64,
      })
    );
  }

  #[test]
  fn accepts_legacy_anchor_field() {
    let state: PetState = serde_json::from_value(json!({
      "hp": 100,
      "level": 0,
      "levelProgress": 0,
      "message": "",
      "evolutionTimestamp": 42,
    }))
    .unwrap();
    assert_eq!(state.evolution_anchor, 42);
  }

  #[test]
  fn default_is_a_healthy_newborn() {
    let state = PetState::default();
    assert_eq!(state.hp, 100);
    assert_eq!(state.progress(), Progress { level: 0, level_progress: 0 });
    assert!(!state.is_sick());
    assert!(!state.is_dead());
  }

  #[test]
  fn progress_bounds() {
    assert!(Progress { level: 2, level_progress: 9 }.is_valid());
    assert!(Progress { level: 2, level_progress: 9 }.is_terminal());
    assert!(!Progress { level: 3, level_progress: 0 }.is_valid());
    assert!(!Progress { level: 0, level_progress: 10 }.is_valid());
  }
}
