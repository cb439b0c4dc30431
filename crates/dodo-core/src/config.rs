//! Engine configuration: which time dimension to measure, how to combine the
//! per-item values, and the thresholds that map the result onto health.
//!
//! Loaded once at startup by the binary; [`EngineConfig::validate`] must pass
//! before any tick runs.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result};

/// Thresholds must stay below one year.
pub const MAX_THRESHOLD_DAYS: u32 = 365;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Which time dimension is measured per work item.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Indicator {
  /// Age of the most recent status transition.
  #[default]
  Status,
  /// Age of the first status transition.
  Speed,
  /// Age of the item since creation.
  Throughput,
}

/// How per-item anomaly values combine into one level.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AggregationStrategy {
  #[default]
  Sum,
  Max,
  Avg,
  Median,
}

/// The timezone in which the daily evolution start hour is interpreted.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EvaluationZone {
  #[default]
  Utc,
  /// The host's local timezone.
  Local,
}

// Config files written for older deployments spell these in upper case, so
// deserialisation goes through the case-insensitive `FromStr`.
macro_rules! deserialize_via_from_str {
  ($($ty:ty),*) => {$(
    impl<'de> Deserialize<'de> for $ty {
      fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(|_| {
          serde::de::Error::custom(format!(
            concat!("unknown ", stringify!($ty), " {:?}"),
            raw
          ))
        })
      }
    }
  )*};
}

deserialize_via_from_str!(Indicator, AggregationStrategy, EvaluationZone);

// ─── EngineConfig ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  /// Grace window: items younger than this many days are not anomalies.
  pub indicator_threshold_days:     u32,
  /// The level at which health reaches zero sits at
  /// `max - threshold + 1` anomaly-days.
  pub indicator_threshold_max_days: u32,
  /// Minimum time between two evolution steps.
  pub evolution_interval_minutes:   u64,
  /// Hour of day (0-23) the evolution anchor is aligned to.
  pub evolution_start_hour:         u32,
  pub indicator:                    Indicator,
  pub strategy:                     AggregationStrategy,
  pub timezone:                     EvaluationZone,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      indicator_threshold_days:     5,
      indicator_threshold_max_days: 20,
      evolution_interval_minutes:   1440,
      evolution_start_hour:         9,
      indicator:                    Indicator::default(),
      strategy:                     AggregationStrategy::default(),
      timezone:                     EvaluationZone::default(),
    }
  }
}

impl EngineConfig {
  /// Check the threshold ordering and bounds.
  pub fn validate(&self) -> Result<()> {
    if self.indicator_threshold_days >= self.indicator_threshold_max_days {
      return Err(Error::InvalidConfig(format!(
        "indicator_threshold_days ({}) must be less than \
         indicator_threshold_max_days ({})",
        self.indicator_threshold_days, self.indicator_threshold_max_days
      )));
    }
    if self.indicator_threshold_max_days >= MAX_THRESHOLD_DAYS {
      return Err(Error::InvalidConfig(format!(
        "indicator_threshold_max_days ({}) must be less than {MAX_THRESHOLD_DAYS}",
        self.indicator_threshold_max_days
      )));
    }
    if self.evolution_start_hour > 23 {
      return Err(Error::InvalidConfig(format!(
        "evolution_start_hour ({}) must be between 0 and 23",
        self.evolution_start_hour
      )));
    }
    Ok(())
  }

  /// Number of anomaly-days between full health and death. At least 2 once
  /// the config is valid.
  pub fn scale(&self) -> i64 {
    i64::from(self.indicator_threshold_max_days)
      - i64::from(self.indicator_threshold_days)
      + 1
  }
}
