//! The pet's transition function.
//!
//! Pure and deterministic: the same previous state, event, config and `now`
//! always yield the same next state. Health follows the latest event; rank
//! advances one step per evolution interval while the pet is healthy enough,
//! freezes while it is sick or dead, and resets when it comes back to life.

use chrono::{DateTime, FixedOffset};

use crate::{
  aggregate::Event,
  config::EngineConfig,
  state::{MAX_HP, MAX_LEVEL, MAX_LEVEL_PROGRESS, PetState, SICK_BELOW_HP},
};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Compute the state that follows `previous`.
///
/// `event` is `None` when this cycle's fetch failed; health and message are
/// then carried over unchanged.
pub fn transition(
  previous: &PetState,
  event: Option<&Event>,
  config: &EngineConfig,
  now: DateTime<FixedOffset>,
) -> PetState {
  let hp = match event {
    Some(event) => health(event.level, config.scale()),
    None => previous.hp,
  };

  let mut level = previous.level;
  let mut level_progress = previous.level_progress;
  let mut evolution_anchor = previous.evolution_anchor;

  // Rebirth.
  if hp > 0 && previous.hp == 0 {
    level = 0;
    level_progress = 0;
    evolution_anchor = 0;
  }

  let sick = hp < SICK_BELOW_HP;
  let now_ms = now.timestamp_millis();
  let interval_ms = i64::try_from(config.evolution_interval_minutes)
    .unwrap_or(i64::MAX)
    .saturating_mul(MILLIS_PER_MINUTE);

  if !sick
    && evolution_anchor > 0
    && now_ms.saturating_sub(evolution_anchor) >= interval_ms
  {
    level_progress += 1;
    if level_progress > MAX_LEVEL_PROGRESS {
      level_progress = 0;
      level += 1;
    }
    if level > MAX_LEVEL {
      level = MAX_LEVEL;
      level_progress = MAX_LEVEL_PROGRESS;
    }
    evolution_anchor = aligned_anchor(now, config.evolution_start_hour);
  }

  if evolution_anchor == 0 {
    evolution_anchor = aligned_anchor(now, config.evolution_start_hour);
  }

  PetState {
    hp,
    level,
    level_progress,
    message: event.map_or_else(|| previous.message.clone(), |e| e.message.clone()),
    evolution_anchor,
  }
}

/// `100 * max(0, scale - level) / scale`, within `0..=100`.
pub fn health(level: u32, scale: i64) -> u8 {
  let scale = scale.max(1);
  let remaining = (scale - i64::from(level)).max(0);
  let hp = (i64::from(MAX_HP) * remaining / scale).clamp(0, i64::from(MAX_HP));
  u8::try_from(hp).unwrap_or(MAX_HP)
}

/// `now`'s calendar date at `start_hour:00:00` in `now`'s offset, as epoch
/// milliseconds.
pub fn aligned_anchor(now: DateTime<FixedOffset>, start_hour: u32) -> i64 {
  now
    .date_naive()
    .and_hms_opt(start_hour, 0, 0)
    .and_then(|local| local.and_local_timezone(*now.offset()).single())
    .map_or_else(|| now.timestamp_millis(), |at| at.timestamp_millis())
}

#[cfg(test)]
mod tests {
  use chrono::{TimeDelta, TimeZone, Timelike, Utc};
  use proptest::prelude::*;

  use super::*;

  fn config(interval_minutes: u64, start_hour: u32) -> EngineConfig {
    EngineConfig {
      indicator_threshold_days: 2,
      indicator_threshold_max_days: 11,
      evolution_interval_minutes: interval_minutes,
      evolution_start_hour: start_hour,
      ..Default::default()
    }
  }

  fn noon() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2017, 6, 25, 12, 0, 0).unwrap().fixed_offset()
  }

  fn event(level: u32) -> Event {
    Event {
      level,
      message: format!("level {level}"),
    }
  }

  fn state(hp: u8, level: u8, level_progress: u8, anchor: i64) -> PetState {
    PetState {
      hp,
      level,
      level_progress,
      message: String::new(),
      evolution_anchor: anchor,
    }
  }

  #[test]
  fn health_scales_with_level() {
    // threshold 2, max 11: scale 10.
    let c = config(0, 0);
    assert_eq!(transition(&state(100, 0, 0, 0), Some(&event(0)), &c, noon()).hp, 100);
    assert_eq!(transition(&state(100, 0, 0, 0), Some(&event(6)), &c, noon()).hp, 40);
    assert_eq!(transition(&state(100, 0, 0, 0), Some(&event(7)), &c, noon()).hp, 30);
    assert_eq!(transition(&state(100, 0, 0, 0), Some(&event(10)), &c, noon()).hp, 0);
    assert_eq!(transition(&state(100, 0, 0, 0), Some(&event(500)), &c, noon()).hp, 0);
  }

  #[test]
  fn missing_event_freezes_health_and_message() {
    let mut previous = state(55, 1, 3, 0);
    previous.message = "last known".into();
    let next = transition(&previous, None, &config(0, 0), noon());
    assert_eq!(next.hp, 55);
    assert_eq!(next.message, "last known");
  }

  #[test]
  fn first_tick_sets_anchor_without_progressing() {
    let next = transition(&state(100, 0, 0, 0), Some(&event(0)), &config(0, 0), noon());
    assert_eq!(next.progress().level_progress, 0);
    assert_eq!(
      next.evolution_anchor,
      Utc.with_ymd_and_hms(2017, 6, 25, 0, 0, 0).unwrap().timestamp_millis()
    );
  }

  #[test]
  fn anchor_aligns_to_start_hour_in_evaluation_offset() {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let now = offset.with_ymd_and_hms(2017, 6, 25, 1, 30, 0).unwrap();
    let next = transition(&state(100, 0, 0, 0), None, &config(0, 10), now);
    let anchor = offset.timestamp_millis_opt(next.evolution_anchor).unwrap();
    assert_eq!(anchor.date_naive(), now.date_naive());
    assert_eq!((anchor.hour(), anchor.minute(), anchor.second()), (10, 0, 0));
  }

  #[test]
  fn progresses_once_interval_has_elapsed() {
    let c = config(60, 0);
    let anchor = noon().timestamp_millis();
    let early = transition(&state(100, 0, 4, anchor), None, &c, noon() + TimeDelta::minutes(59));
    assert_eq!(early.level_progress, 4);
    assert_eq!(early.evolution_anchor, anchor);

    let due = transition(&state(100, 0, 4, anchor), None, &c, noon() + TimeDelta::minutes(60));
    assert_eq!(due.level_progress, 5);
    assert_eq!(due.evolution_anchor, aligned_anchor(noon(), 0));
  }

  #[test]
  fn progress_wraps_into_next_level() {
    let next = transition(&state(100, 0, 9, 1), None, &config(0, 0), noon());
    assert_eq!((next.level, next.level_progress), (1, 0));
  }

  #[test]
  fn terminal_rank_is_absorbing() {
    let c = config(0, 0);
    let mut s = state(100, 2, 8, 1);
    for _ in 0..5 {
      s = transition(&s, Some(&event(0)), &c, noon());
    }
    assert_eq!((s.level, s.level_progress), (2, 9));
  }

  #[test]
  fn death_preserves_rank() {
    let next = transition(&state(100, 2, 4, 1), Some(&event(11)), &config(0, 0), noon());
    assert_eq!(next.hp, 0);
    assert_eq!((next.level, next.level_progress), (2, 4));
  }

  #[test]
  fn staying_dead_preserves_rank() {
    let next = transition(&state(0, 1, 7, 1), Some(&event(20)), &config(0, 0), noon());
    assert!(next.is_dead());
    assert_eq!((next.level, next.level_progress), (1, 7));
  }

  #[test]
  fn rebirth_resets_rank_and_anchor() {
    let next = transition(&state(0, 2, 4, 1), Some(&event(0)), &config(0, 0), noon());
    assert_eq!(next.hp, 100);
    assert_eq!((next.level, next.level_progress), (0, 0));
    assert_eq!(next.evolution_anchor, aligned_anchor(noon(), 0));
  }

  #[test]
  fn event_less_tick_while_dead_is_not_a_rebirth() {
    let next = transition(&state(0, 2, 4, 1), None, &config(0, 0), noon());
    assert_eq!(next.hp, 0);
    assert_eq!((next.level, next.level_progress), (2, 4));
  }

  proptest! {
    #[test]
    fn health_formula(level in any::<u32>(), threshold in 0u32..100, span in 1u32..200) {
      let c = EngineConfig {
        indicator_threshold_days: threshold,
        indicator_threshold_max_days: threshold + span,
        ..Default::default()
      };
      let scale = i64::from(span) + 1;
      let expected = (100 * (scale - i64::from(level)).max(0) / scale).clamp(0, 100);
      let next = transition(&PetState::default(), Some(&event(level)), &c, noon());
      prop_assert_eq!(i64::from(next.hp), expected);
    }

    #[test]
    fn rank_stays_in_bounds(
      levels in proptest::collection::vec(prop_oneof![Just(None), (0u32..15).prop_map(Some)], 1..80),
    ) {
      let c = config(0, 0);
      let mut s = PetState::default();
      for level in levels {
        s = transition(&s, level.map(event).as_ref(), &c, noon());
        prop_assert!(s.hp <= 100);
        prop_assert!(s.progress().is_valid());
      }
    }

    #[test]
    fn sick_pet_never_evolves(
      level in 7u32..20,
      elapsed_minutes in 0i64..100_000,
      rank in (0u8..=2, 0u8..=9),
    ) {
      let c = config(1, 0);
      let previous = state(100, rank.0, rank.1, noon().timestamp_millis());
      let now = noon() + TimeDelta::minutes(elapsed_minutes);
      let next = transition(&previous, Some(&event(level)), &c, now);
      prop_assert!(next.is_sick());
      prop_assert_eq!((next.level, next.level_progress), rank);
    }
  }
}
