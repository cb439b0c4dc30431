//! Aggregation: reduce per-item elapsed days to one level and a summary.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{
  config::{AggregationStrategy, EngineConfig},
  indicator::extract,
  item::WorkItemRecord,
};

/// One poll cycle's signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  /// Combined anomaly-days; `0` when nothing is overdue.
  pub level:   u32,
  pub message: String,
}

/// Reduce elapsed-day counts to an [`Event`].
///
/// Each value `d` becomes the anomaly `d - threshold_days + 1`; only positive
/// anomalies take part in the reduction. An empty anomaly list reduces to
/// zero under every strategy.
pub fn aggregate(
  elapsed_days: &[i64],
  threshold_days: u32,
  strategy: AggregationStrategy,
) -> Event {
  let threshold = i64::from(threshold_days);
  let anomalies: Vec<i64> = elapsed_days
    .iter()
    .map(|d| d.saturating_sub(threshold).saturating_add(1))
    .filter(|a| *a > 0)
    .collect();

  let level = reduce(&anomalies, strategy);

  Event {
    level:   u32::try_from(level).unwrap_or(u32::MAX),
    message: summary(elapsed_days.len(), anomalies.len()),
  }
}

/// Extract with the configured indicator, then aggregate.
pub fn assess(
  items: &[WorkItemRecord],
  config: &EngineConfig,
  now: DateTime<FixedOffset>,
) -> Event {
  let elapsed = extract(items, config.indicator, now);
  aggregate(&elapsed, config.indicator_threshold_days, config.strategy)
}

fn reduce(anomalies: &[i64], strategy: AggregationStrategy) -> i64 {
  if anomalies.is_empty() {
    return 0;
  }
  let sum = || anomalies.iter().fold(0i64, |acc, a| acc.saturating_add(*a));
  match strategy {
    AggregationStrategy::Sum => sum(),
    AggregationStrategy::Max => anomalies.iter().copied().max().unwrap_or(0),
    AggregationStrategy::Avg => sum() / anomalies.len() as i64,
    AggregationStrategy::Median => {
      let mut sorted = anomalies.to_vec();
      sorted.sort_unstable();
      let mid = sorted.len() / 2;
      if sorted.len() % 2 == 1 {
        sorted[mid]
      } else {
        let pair = i128::from(sorted[mid - 1]) + i128::from(sorted[mid]);
        (pair / 2) as i64
      }
    }
  }
}

fn summary(items: usize, anomalies: usize) -> String {
  match (items, anomalies) {
    (0, _) => "There are no issues. Go grab some coffee.".to_owned(),
    (1, 0) => "You have one issue in progress and you are doing great!".to_owned(),
    (n, 0) => format!("You have {n} issues in progress and you are doing great!"),
    (_, 1) => "You have one issue in progress that doesn't look good.".to_owned(),
    (_, k) => format!("You have {k} issues in progress that don't look good."),
  }
}
