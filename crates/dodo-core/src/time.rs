//! Timestamp normalisation.
//!
//! Work-item trackers hand us text such as `2017-06-22T08:00:11.000+0500`:
//! a calendar date, a literal `T`, a time of day with optional fraction and a
//! signed four-digit zone offset. The offset is always numeric; a trailing
//! `Z` is rejected. Everything past this module sees only normalised instants
//! and whole-day counts.

use chrono::{DateTime, FixedOffset};

use crate::{Error, Result};

/// `%.f` tolerates a missing fraction; `%z` accepts `+0500` but not `Z`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

const SECONDS_PER_DAY: i64 = 86_400;

/// Parse a tracker timestamp into an offset-aware instant.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
  DateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|source| {
    Error::Timestamp {
      value: value.to_owned(),
      source,
    }
  })
}

/// Whole days elapsed from `earlier` to `later`, rounded towards negative
/// infinity. Offsets do not matter; only the instants are compared.
pub fn days_between(
  earlier: DateTime<FixedOffset>,
  later: DateTime<FixedOffset>,
) -> i64 {
  (later.timestamp() - earlier.timestamp()).div_euclid(SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
    Utc
      .with_ymd_and_hms(y, m, d, h, min, 0)
      .unwrap()
      .fixed_offset()
  }

  #[test]
  fn parses_fraction_and_compact_offset() {
    let ts = parse_timestamp("2017-06-22T08:00:11.000+0500").unwrap();
    assert_eq!(ts.offset().local_minus_utc(), 5 * 3600);
    assert_eq!(ts.with_timezone(&Utc), Utc.with_ymd_and_hms(2017, 6, 22, 3, 0, 11).unwrap());
  }

  #[test]
  fn parses_without_fraction() {
    let ts = parse_timestamp("2017-06-22T08:00:11-0130").unwrap();
    assert_eq!(ts.offset().local_minus_utc(), -(3600 + 30 * 60));
  }

  #[test]
  fn rejects_zulu_suffix() {
    assert!(matches!(
      parse_timestamp("2017-06-22T08:00:11.000Z"),
      Err(Error::Timestamp { .. })
    ));
  }

  #[test]
  fn rejects_garbage() {
    assert!(parse_timestamp("yesterday").is_err());
    assert!(parse_timestamp("").is_err());
    assert!(parse_timestamp("2017-06-22").is_err());
  }

  #[test]
  fn days_between_truncates_partial_days() {
    let created = parse_timestamp("2017-06-22T08:00:11.000+0500").unwrap();
    // 3 days, 8 h 59 m 49 s.
    assert_eq!(days_between(created, utc(2017, 6, 25, 12, 0)), 3);
  }

  #[test]
  fn days_between_exact_boundary() {
    assert_eq!(days_between(utc(2017, 6, 1, 0, 0), utc(2017, 6, 2, 0, 0)), 1);
    assert_eq!(days_between(utc(2017, 6, 1, 0, 0), utc(2017, 6, 1, 23, 59)), 0);
  }

  #[test]
  fn days_between_future_instant_is_negative() {
    assert_eq!(days_between(utc(2017, 6, 2, 12, 0), utc(2017, 6, 2, 0, 0)), -1);
  }
}
