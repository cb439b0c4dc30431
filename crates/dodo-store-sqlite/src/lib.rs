//! SQLite backend for dodo pet snapshots.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every committed [`PetState`] is
//! appended as a new row; startup restores the newest one.
//!
//! [`PetState`]: dodo_core::state::PetState

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
