use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty tier of a card, reclassified from graded answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "EASY" => Some(Self::Easy),
      "MEDIUM" => Some(Self::Medium),
      "HARD" => Some(Self::Hard),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Easy => "EASY",
      Self::Medium => "MEDIUM",
      Self::Hard => "HARD",
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: i64,
  pub username: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
  pub id: i64,
  pub user_id: i64,
  pub name: String,
  pub description: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Deck {
  pub fn is_owned_by(&self, user_id: i64) -> bool {
    self.user_id == user_id
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
  pub id: i64,
  pub deck_id: i64,
  pub question: String,
  pub answer: String,
  /// Only ever changed by the difficulty classifier after a graded answer
  pub difficulty: Difficulty,
}

impl Card {
  pub fn new(deck_id: i64, question: String, answer: String) -> Self {
    Self {
      id: 0,
      deck_id,
      question,
      answer,
      difficulty: Difficulty::default(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_difficulty_from_str() {
    assert_eq!(Difficulty::from_str("EASY"), Some(Difficulty::Easy));
    assert_eq!(Difficulty::from_str("MEDIUM"), Some(Difficulty::Medium));
    assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
  }

  #[test]
  fn test_difficulty_from_str_invalid() {
    assert_eq!(Difficulty::from_str("easy"), None); // case sensitive
    assert_eq!(Difficulty::from_str(""), None);
    assert_eq!(Difficulty::from_str("EXTREME"), None);
  }

  #[test]
  fn test_difficulty_default_is_medium() {
    assert_eq!(Difficulty::default(), Difficulty::Medium);
    let card = Card::new(1, "Q".into(), "A".into());
    assert_eq!(card.difficulty, Difficulty::Medium);
    assert_eq!(card.id, 0);
  }

  #[test]
  fn test_difficulty_serde_matches_storage() {
    // JSON and the database use the same upper-case names
    for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
      let json = serde_json::to_string(&d).unwrap();
      assert_eq!(json, format!("\"{}\"", d.as_str()));
    }
  }

  #[test]
  fn test_deck_ownership() {
    let deck = Deck {
      id: 3,
      user_id: 7,
      name: "Biology".into(),
      description: None,
      created_at: Utc::now(),
    };
    assert!(deck.is_owned_by(7));
    assert!(!deck.is_owned_by(8));
  }

  #[test]
  fn test_card_serializes_camel_case() {
    let card = Card::new(4, "Capital of France?".into(), "Paris".into());
    let value = serde_json::to_value(&card).unwrap();
    assert_eq!(value["deckId"], 4);
    assert_eq!(value["difficulty"], "MEDIUM");
  }
}
