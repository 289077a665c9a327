use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score, confidence and feedback returned by the grader for one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
  pub score: f64,
  pub confidence: f64,
  pub feedback: String,
}

/// One graded answer. Append-only: never updated after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
  pub id: i64,
  pub user_id: i64,
  pub card_id: i64,
  pub response: String,
  pub score: f64,
  pub confidence: f64,
  pub feedback: String,
  pub studied_at: DateTime<Utc>,
}

impl StudySession {
  pub fn new(user_id: i64, card_id: i64, response: String, grading: GradingResult) -> Self {
    Self {
      id: 0,
      user_id,
      card_id,
      response,
      score: grading.score,
      confidence: grading.confidence,
      feedback: grading.feedback,
      studied_at: Utc::now(),
    }
  }
}
