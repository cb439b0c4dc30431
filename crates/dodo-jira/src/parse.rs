//! Search-response decoding.
//!
//! Only the handful of fields the indicators need are read; everything else
//! in the (large) Jira payload is ignored. Missing pieces decode to `None` or
//! an empty list, and an issue that still fails to decode is dropped on its
//! own so a single odd issue never spoils the batch.

use dodo_core::item::{HistoryEntry, WorkItemRecord};
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use crate::Result;

// ─── Wire shapes ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
struct SearchResponse {
  // Decoded one by one in `parse_search`.
  issues: Vec<Value>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Issue {
  key:       Option<String>,
  fields:    Option<Fields>,
  changelog: Option<Changelog>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Fields {
  created: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Changelog {
  histories: Vec<History>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct History {
  created: Option<String>,
  items:   Vec<HistoryItem>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct HistoryItem {
  field: Option<String>,
}

// ─── Mapping ─────────────────────────────────────────────────────────────────

impl From<Issue> for WorkItemRecord {
  fn from(issue: Issue) -> Self {
    let history = issue
      .changelog
      .map(|c| c.histories)
      .unwrap_or_default()
      .into_iter()
      .map(|h| HistoryEntry {
        created: h.created,
        fields:  h.items.into_iter().filter_map(|i| i.field).collect(),
      })
      .collect();

    WorkItemRecord {
      key: issue.key,
      created: issue.fields.and_then(|f| f.created),
      history,
    }
  }
}

/// Decode a search response body into work items, one per well-formed issue.
pub fn parse_search(body: &[u8]) -> Result<Vec<WorkItemRecord>> {
  let response: SearchResponse = serde_json::from_slice(body)?;
  Ok(
    response
      .issues
      .into_iter()
      .filter_map(decode_issue)
      .map(WorkItemRecord::from)
      .collect(),
  )
}

fn decode_issue(raw: Value) -> Option<Issue> {
  let key = raw.get("key").and_then(Value::as_str).map(str::to_owned);
  serde_json::from_value(raw)
    .inspect_err(|e| trace!(error = %e, ?key, "skipping malformed issue"))
    .ok()
}
