//! SQL schema for the dodo SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per committed pet state. Rows are never updated; old rows are
-- only removed by pruning.
CREATE TABLE IF NOT EXISTS snapshots (
    snapshot_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    recorded_at      TEXT    NOT NULL,   -- RFC 3339 UTC; server-assigned
    hp               INTEGER NOT NULL,
    level            INTEGER NOT NULL,
    level_progress   INTEGER NOT NULL,
    message          TEXT    NOT NULL DEFAULT '',
    evolution_anchor INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS snapshots_recorded_idx ON snapshots(recorded_at);

PRAGMA user_version = 1;
";
