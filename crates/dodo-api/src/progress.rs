//! Handlers for `/progress`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/progress` | Current rank |
//! | `POST` / `PUT` | `/progress` | Body: `{"level":1,"levelProgress":4}`; 400 if out of range |

use std::sync::Arc;

use axum::{Json, extract::State};
use dodo_core::{clock::Clock, keeper::Keeper, state::Progress};
use tracing::info;

use crate::error::ApiError;

/// `GET /progress`
pub async fn get_progress<C: Clock>(
  State(keeper): State<Arc<Keeper<C>>>,
) -> Json<Progress> {
  Json(keeper.progress())
}

/// `POST|PUT /progress`: overwrite the rank, leaving health untouched.
pub async fn set_progress<C: Clock>(
  State(keeper): State<Arc<Keeper<C>>>,
  Json(body): Json<Progress>,
) -> Result<Json<Progress>, ApiError> {
  let state = keeper.set_progress(body)?;
  info!(level = state.level, level_progress = state.level_progress, "rank set via api");
  Ok(Json(state.progress()))
}
