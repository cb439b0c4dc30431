//! Core types and engines for the dodo work-backlog pet.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Fetching work items, persisting snapshots and serving the state are the
//! business of the other crates; they plug in through the traits in
//! [`item`] and [`store`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod clock;
pub mod config;
pub mod error;
pub mod evolution;
pub mod indicator;
pub mod item;
pub mod keeper;
pub mod state;
pub mod store;
pub mod time;

pub use error::{Error, Result};
