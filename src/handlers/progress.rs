use axum::{
  extract::{Path, State},
  http::StatusCode,
  Json,
};
use chrono::Utc;

use super::extract::{JsonBody, UserContext};
use crate::domain::{ProgressUpdate, StudyProgress};
use crate::error::{Result, StudyError};
use crate::state::AppState;

pub async fn list_progress(State(state): State<AppState>, user: UserContext) -> Result<Json<Vec<StudyProgress>>> {
  Ok(Json(state.progress.list_active_progress(user.user_id)?))
}

pub async fn get_progress(
  State(state): State<AppState>,
  user: UserContext,
  Path(deck_id): Path<i64>,
) -> Result<Json<StudyProgress>> {
  state
    .progress
    .get_active_progress(user.user_id, deck_id)?
    .map(Json)
    .ok_or_else(|| StudyError::NotFound(format!("no active progress for deck {}", deck_id)))
}

pub async fn save_progress(
  State(state): State<AppState>,
  user: UserContext,
  Path(deck_id): Path<i64>,
  JsonBody(update): JsonBody<ProgressUpdate>,
) -> Result<Json<StudyProgress>> {
  let progress = state
    .progress
    .save_progress(user.user_id, deck_id, &update, Utc::now())?;
  Ok(Json(progress))
}

pub async fn clear_progress(
  State(state): State<AppState>,
  user: UserContext,
  Path(deck_id): Path<i64>,
) -> Result<StatusCode> {
  state.progress.clear_progress(user.user_id, deck_id)?;
  Ok(StatusCode::NO_CONTENT)
}
