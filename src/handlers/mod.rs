//! JSON API over the study services.

pub mod decks;
pub mod error;
pub mod extract;
pub mod progress;
pub mod study;

use axum::{
  routing::{get, post},
  Json, Router,
};
use serde_json::{json, Value};

use crate::state::AppState;

pub use extract::{UserContext, USER_ID_HEADER};

/// All API routes with state applied
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/api/study/deck/{deck_id}", get(study::study_deck))
    .route("/api/study/answer", post(study::submit_answer))
    .route("/api/study/sessions", get(study::list_sessions))
    .route("/api/study/analytics", get(study::analytics))
    .route("/api/study/progress", get(progress::list_progress))
    .route(
      "/api/study/progress/{deck_id}",
      get(progress::get_progress)
        .post(progress::save_progress)
        .delete(progress::clear_progress),
    )
    .route("/api/decks", get(decks::list_decks))
    .route("/api/decks/stats", get(study::deck_stats))
    .route("/api/decks/{deck_id}", get(decks::get_deck).delete(decks::delete_deck))
    .with_state(state)
}

async fn health() -> Json<Value> {
  Json(json!({ "status": "ok" }))
}
