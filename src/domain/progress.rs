use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resumable study cursor for a (user, deck) pair.
///
/// At most one row per pair has `is_completed == false`; that row is the
/// "active" progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyProgress {
  pub id: i64,
  pub user_id: i64,
  pub deck_id: i64,
  pub current_card_index: i64,
  pub total_cards: i64,
  pub cards_completed: i64,
  pub is_completed: bool,
  pub last_studied_at: DateTime<Utc>,
}

/// Fields written by a progress save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
  pub current_card_index: i64,
  pub total_cards: i64,
  pub cards_completed: i64,
  pub is_completed: bool,
}

impl ProgressUpdate {
  /// Check the cursor fields are internally consistent.
  /// Returns a description of the first problem found.
  pub fn validate(&self) -> Result<(), String> {
    if self.current_card_index < 0 || self.total_cards < 0 || self.cards_completed < 0 {
      return Err("progress fields must not be negative".to_string());
    }
    if self.current_card_index > self.total_cards {
      return Err(format!(
        "currentCardIndex {} exceeds totalCards {}",
        self.current_card_index, self.total_cards
      ));
    }
    if self.cards_completed > self.total_cards {
      return Err(format!(
        "cardsCompleted {} exceeds totalCards {}",
        self.cards_completed, self.total_cards
      ));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn update(index: i64, total: i64, completed: i64) -> ProgressUpdate {
    ProgressUpdate {
      current_card_index: index,
      total_cards: total,
      cards_completed: completed,
      is_completed: false,
    }
  }

  #[test]
  fn test_validate_ok() {
    assert!(update(0, 0, 0).validate().is_ok());
    assert!(update(3, 10, 3).validate().is_ok());
    // Index may sit one past the last card when the run is finished
    assert!(update(10, 10, 10).validate().is_ok());
  }

  #[test]
  fn test_validate_negative() {
    assert!(update(-1, 10, 0).validate().is_err());
    assert!(update(0, -1, 0).validate().is_err());
    assert!(update(0, 10, -2).validate().is_err());
  }

  #[test]
  fn test_validate_exceeds_total() {
    let err = update(11, 10, 0).validate().unwrap_err();
    assert!(err.contains("currentCardIndex"));
    let err = update(1, 10, 11).validate().unwrap_err();
    assert!(err.contains("cardsCompleted"));
  }

  #[test]
  fn test_update_deserializes_camel_case() {
    let json = r#"{"currentCardIndex":2,"totalCards":5,"cardsCompleted":2,"isCompleted":false}"#;
    let parsed: ProgressUpdate = serde_json::from_str(json).unwrap();
    assert_eq!(parsed, update(2, 5, 2));
  }
}
