//! JSON REST API for dodo.
//!
//! Exposes an axum [`Router`] over a shared [`Keeper`]. Static assets, TLS
//! and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", dodo_api::api_router(keeper.clone()))
//! ```

pub mod error;
pub mod progress;
pub mod state;

use std::sync::Arc;

use axum::{Router, routing::get};
use dodo_core::{clock::Clock, keeper::Keeper};

pub use error::ApiError;

/// Build a fully-materialised API router for `keeper`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<C>(keeper: Arc<Keeper<C>>) -> Router<()>
where
  C: Clock + 'static,
{
  Router::new()
    .route("/state", get(state::get_state::<C>))
    .route(
      "/progress",
      get(progress::get_progress::<C>)
        .post(progress::set_progress::<C>)
        .put(progress::set_progress::<C>),
    )
    .with_state(keeper)
}
