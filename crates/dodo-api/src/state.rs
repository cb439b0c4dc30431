//! Handler for `GET /state`.

use std::sync::Arc;

use axum::{Json, extract::State};
use dodo_core::{clock::Clock, keeper::Keeper, state::PetState};

/// `GET /state`: the full pet state, as last committed.
pub async fn get_state<C: Clock>(
  State(keeper): State<Arc<Keeper<C>>>,
) -> Json<PetState> {
  Json(PetState::clone(&keeper.state()))
}
