use axum::{
  extract::{Path, State},
  Json,
};
use chrono::Utc;
use serde::Deserialize;

use super::extract::{JsonBody, UserContext};
use crate::db::{DeckStats, StudyAnalytics};
use crate::domain::StudySession;
use crate::error::Result;
use crate::srs::StudyCard;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
  pub card_id: i64,
  pub answer: String,
}

pub async fn study_deck(
  State(state): State<AppState>,
  user: UserContext,
  Path(deck_id): Path<i64>,
) -> Result<Json<Vec<StudyCard>>> {
  let cards = state.study.select_cards_for_study(user.user_id, deck_id, Utc::now())?;
  Ok(Json(cards))
}

/// Grading is tied to the server's shutdown token, so a submission still
/// grading at shutdown ends with `grading_cancelled`. A client disconnect
/// drops the request future, which abandons the grading call without a response.
pub async fn submit_answer(
  State(state): State<AppState>,
  user: UserContext,
  JsonBody(request): JsonBody<AnswerRequest>,
) -> Result<Json<StudySession>> {
  let session = state
    .evaluator
    .submit_answer_with_cancel(user.user_id, request.card_id, &request.answer, &state.shutdown)
    .await?;
  Ok(Json(session))
}

pub async fn list_sessions(State(state): State<AppState>, user: UserContext) -> Result<Json<Vec<StudySession>>> {
  Ok(Json(state.study.list_sessions(user.user_id)?))
}

pub async fn analytics(State(state): State<AppState>, user: UserContext) -> Result<Json<StudyAnalytics>> {
  Ok(Json(state.study.study_analytics(user.user_id, Utc::now())?))
}

pub async fn deck_stats(State(state): State<AppState>, user: UserContext) -> Result<Json<Vec<DeckStats>>> {
  Ok(Json(state.study.deck_stats(user.user_id)?))
}
