use axum::{
  extract::{Path, State},
  http::StatusCode,
  Json,
};

use super::extract::UserContext;
use crate::domain::Deck;
use crate::error::Result;
use crate::services::DeckDetail;
use crate::state::AppState;

pub async fn list_decks(State(state): State<AppState>, user: UserContext) -> Result<Json<Vec<Deck>>> {
  Ok(Json(state.decks.list_decks(user.user_id)?))
}

pub async fn get_deck(
  State(state): State<AppState>,
  user: UserContext,
  Path(deck_id): Path<i64>,
) -> Result<Json<DeckDetail>> {
  Ok(Json(state.decks.get_deck(user.user_id, deck_id)?))
}

pub async fn delete_deck(
  State(state): State<AppState>,
  user: UserContext,
  Path(deck_id): Path<i64>,
) -> Result<StatusCode> {
  state.decks.delete_deck(user.user_id, deck_id)?;
  Ok(StatusCode::NO_CONTENT)
}
