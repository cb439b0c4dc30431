//! Conversions between [`PetState`] and the plain column values stored in
//! SQLite.
//!
//! Timestamps are stored as RFC 3339 strings. Rank and health are stored as
//! integers and range-checked on the way back in.

use chrono::{DateTime, Utc};
use dodo_core::state::{MAX_HP, MAX_LEVEL, MAX_LEVEL_PROGRESS, PetState};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `snapshots` row.
pub struct RawSnapshot {
  pub snapshot_id:      i64,
  pub recorded_at:      String,
  pub hp:               i64,
  pub level:            i64,
  pub level_progress:   i64,
  pub message:          String,
  pub evolution_anchor: i64,
}

impl RawSnapshot {
  pub const COLUMNS: &'static str = "snapshot_id, recorded_at, hp, level, \
                                     level_progress, message, evolution_anchor";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      snapshot_id:      row.get(0)?,
      recorded_at:      row.get(1)?,
      hp:               row.get(2)?,
      level:            row.get(3)?,
      level_progress:   row.get(4)?,
      message:          row.get(5)?,
      evolution_anchor: row.get(6)?,
    })
  }

  /// The pet state alone; `recorded_at` is not looked at.
  pub fn into_pet_state(self) -> Result<PetState> {
    let id = self.snapshot_id;
    let bounded = |name: &str, value: i64, max: u8| -> Result<u8> {
      u8::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| Error::Corrupt {
          id,
          reason: format!("{name} {value} is outside 0..={max}"),
        })
    };

    Ok(PetState {
      hp:               bounded("hp", self.hp, MAX_HP)?,
      level:            bounded("level", self.level, MAX_LEVEL)?,
      level_progress:   bounded(
        "level_progress",
        self.level_progress,
        MAX_LEVEL_PROGRESS,
      )?,
      message:          self.message,
      evolution_anchor: self.evolution_anchor,
    })
  }

  pub fn into_state(self) -> Result<(DateTime<Utc>, PetState)> {
    let recorded_at = decode_dt(&self.recorded_at)?;
    Ok((recorded_at, self.into_pet_state()?))
  }
}
