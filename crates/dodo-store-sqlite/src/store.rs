//! [`SqliteStore`]: the SQLite implementation of [`SnapshotStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use dodo_core::{state::PetState, store::SnapshotStore};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{
  Result,
  encode::{RawSnapshot, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A snapshot log backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Up to `limit` snapshots, newest first, with the time each was recorded.
  pub async fn recent(
    &self,
    limit: usize,
  ) -> Result<Vec<(DateTime<Utc>, PetState)>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let raws: Vec<RawSnapshot> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM snapshots ORDER BY snapshot_id DESC LIMIT ?1",
          RawSnapshot::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], RawSnapshot::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSnapshot::into_state).collect()
  }

  /// Delete all but the newest `keep` snapshots. Returns the number removed.
  pub async fn prune(&self, keep: usize) -> Result<usize> {
    let keep = i64::try_from(keep).unwrap_or(i64::MAX);
    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM snapshots WHERE snapshot_id NOT IN (
             SELECT snapshot_id FROM snapshots
             ORDER BY snapshot_id DESC LIMIT ?1
           )",
          rusqlite::params![keep],
        )?;
        Ok(n)
      })
      .await?;
    if removed > 0 {
      debug!(removed, keep, "pruned snapshots");
    }
    Ok(removed)
  }
}

// ─── SnapshotStore impl ──────────────────────────────────────────────────────

impl SnapshotStore for SqliteStore {
  type Error = crate::Error;

  async fn save(&self, state: PetState) -> Result<()> {
    let recorded_at = encode_dt(Utc::now());
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO snapshots
             (recorded_at, hp, level, level_progress, message, evolution_anchor)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            recorded_at,
            state.hp,
            state.level,
            state.level_progress,
            state.message,
            state.evolution_anchor,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn load_latest(&self) -> Result<Option<PetState>> {
    let raw: Option<RawSnapshot> = self
      .conn
      .call(|conn| {
        let raw = conn
          .query_row(
            &format!(
              "SELECT {} FROM snapshots ORDER BY snapshot_id DESC LIMIT 1",
              RawSnapshot::COLUMNS
            ),
            [],
            RawSnapshot::from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawSnapshot::into_pet_state).transpose()
  }
}
