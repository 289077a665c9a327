use crate::config;
use crate::domain::Difficulty;

/// Reclassify a card's difficulty after a graded answer.
///
/// Nothing changes until the card has `DIFFICULTY_REVIEW_GATE` sessions.
/// After that every qualifying score may move the card; there is no cooldown,
/// so alternating scores can flip the tier on each session.
pub fn new_difficulty(current: Difficulty, score: f64, review_count: usize) -> Difficulty {
  if review_count < config::DIFFICULTY_REVIEW_GATE {
    return current;
  }

  match current {
    Difficulty::Medium if score >= 0.9 => Difficulty::Easy,
    Difficulty::Hard if score >= 0.8 => Difficulty::Medium,
    Difficulty::Easy if score < 0.5 => Difficulty::Medium,
    Difficulty::Medium if score < 0.5 => Difficulty::Hard,
    _ => current,
  }
}
