//! Indicator extraction: one elapsed-day count per work item.
//!
//! Items that lack the data for the selected indicator, or whose timestamps
//! do not parse, are left out. A result shorter than the input is normal.

use chrono::{DateTime, FixedOffset};
use tracing::trace;

use crate::{
  config::Indicator,
  item::WorkItemRecord,
  time::{days_between, parse_timestamp},
};

/// Elapsed days since the selected time dimension for every item that has
/// one.
pub fn extract(
  items: &[WorkItemRecord],
  indicator: Indicator,
  now: DateTime<FixedOffset>,
) -> Vec<i64> {
  items
    .iter()
    .filter_map(|item| {
      let instant = match indicator {
        Indicator::Throughput => created_at(item),
        Indicator::Speed => status_changes(item).min(),
        Indicator::Status => status_changes(item).max(),
      };
      if instant.is_none() {
        trace!(key = ?item.key, %indicator, "work item has no usable timestamp");
      }
      instant.map(|at| days_between(at, now))
    })
    .collect()
}

fn created_at(item: &WorkItemRecord) -> Option<DateTime<FixedOffset>> {
  parse_lenient(item.created.as_deref()?)
}

/// Parsed timestamps of the item's status transitions, malformed ones
/// dropped.
fn status_changes(
  item: &WorkItemRecord,
) -> impl Iterator<Item = DateTime<FixedOffset>> + '_ {
  item
    .history
    .iter()
    .filter(|entry| entry.is_status_change())
    .filter_map(|entry| parse_lenient(entry.created.as_deref()?))
}

fn parse_lenient(raw: &str) -> Option<DateTime<FixedOffset>> {
  parse_timestamp(raw)
    .inspect_err(|e| trace!(error = %e, "skipping timestamp"))
    .ok()
}
