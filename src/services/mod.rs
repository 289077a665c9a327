//! Study services.
//!
//! Each service wraps the shared connection and applies ownership checks,
//! validation and transactions on top of the `db` functions.

pub mod decks;
pub mod evaluator;
pub mod progress;
pub mod study;

pub use decks::{DeckDetail, DeckService};
pub use evaluator::AnswerEvaluator;
pub use progress::ProgressTracker;
pub use study::StudyOrchestrator;

use rusqlite::Connection;

use crate::db;
use crate::domain::Deck;
use crate::error::{Result, StudyError};

/// Load a deck and check that `user_id` owns it
pub(crate) fn owned_deck(conn: &Connection, user_id: i64, deck_id: i64) -> Result<Deck> {
    let deck = db::get_deck(conn, deck_id)?
        .ok_or_else(|| StudyError::NotFound(format!("deck {}", deck_id)))?;

    if !deck.is_owned_by(user_id) {
        tracing::warn!(user_id, deck_id, "Rejected access to another user's deck");
        return Err(StudyError::AccessDenied(format!("deck {}", deck_id)));
    }
    Ok(deck)
}
