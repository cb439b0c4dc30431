//! Work items as handed over by a fetch collaborator, and the trait such
//! collaborators implement.

use std::{future::Future, sync::Arc};

use serde::{Deserialize, Serialize};

/// The change-history field name that marks a status transition.
pub const STATUS_FIELD: &str = "status";

/// One change-history entry: when it happened and which fields it touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
  /// Raw tracker timestamp; normalised lazily by [`crate::time`].
  pub created: Option<String>,
  pub fields:  Vec<String>,
}

impl HistoryEntry {
  pub fn is_status_change(&self) -> bool {
    self.fields.iter().any(|f| f == STATUS_FIELD)
  }
}

/// One externally tracked item as received this poll. Read-only to the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemRecord {
  /// Tracker key, e.g. `DODO-42`; only used for logging.
  pub key:     Option<String>,
  /// Raw creation timestamp.
  pub created: Option<String>,
  /// Change history in tracker order.
  pub history: Vec<HistoryEntry>,
}

/// Abstraction over wherever work items come from (e.g. `dodo-jira`).
///
/// A failed fetch is not fatal: the poller turns it into an event-less tick.
pub trait WorkItemSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the current batch of work items.
  fn fetch(
    &self,
  ) -> impl Future<Output = Result<Vec<WorkItemRecord>, Self::Error>> + Send + '_;
}

impl<T: WorkItemSource> WorkItemSource for Arc<T> {
  type Error = T::Error;

  fn fetch(
    &self,
  ) -> impl Future<Output = Result<Vec<WorkItemRecord>, Self::Error>> + Send + '_ {
    T::fetch(self)
  }
}
