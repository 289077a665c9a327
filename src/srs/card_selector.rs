//! Annotate a deck's cards with due state and priority for study.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use super::interval::{self, ReviewSummary};
use crate::domain::Card;

/// A card decorated with its scheduling state for one user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyCard {
  #[serde(flatten)]
  pub card: Card,
  pub is_due: bool,
  pub priority: i64,
  /// None when the user has never studied this card
  pub next_due: Option<DateTime<Utc>>,
  pub review_count: u32,
}

impl StudyCard {
  pub fn annotate(card: Card, summary: Option<&ReviewSummary>, now: DateTime<Utc>) -> Self {
    Self {
      is_due: interval::is_due(summary, now),
      priority: interval::priority(summary, now),
      next_due: summary.map(ReviewSummary::next_due),
      review_count: summary.map(|s| s.review_count).unwrap_or(0),
      card,
    }
  }
}

/// Decorate every card and order them highest priority first.
/// Ties keep ascending card id so the order is stable between calls.
pub fn rank_cards(
  cards: Vec<Card>,
  summaries: &HashMap<i64, ReviewSummary>,
  now: DateTime<Utc>,
) -> Vec<StudyCard> {
  let mut ranked: Vec<StudyCard> = cards
    .into_iter()
    .map(|card| {
      let summary = summaries.get(&card.id);
      StudyCard::annotate(card, summary, now)
    })
    .collect();

  ranked.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.card.id.cmp(&b.card.id)));
  ranked
}

/// Number of cards currently due
pub fn due_count(cards: &[StudyCard]) -> usize {
  cards.iter().filter(|c| c.is_due).count()
}
