//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so tests never carry a
//! copy of the schema.

use rusqlite::Connection;
use tempfile::TempDir;

use crate::db;
use crate::domain::{Card, Deck, User};

/// Test environment with a file-backed database using the real schema.
///
/// The temporary directory is removed when the environment is dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join("study.db"))?;
        db::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }

    /// Create a user owning one empty deck
    pub fn user_with_deck(&self, username: &str) -> (User, Deck) {
        let user = db::insert_user(&self.conn, username).expect("insert user");
        let deck = db::insert_deck(&self.conn, user.id, &format!("{}'s deck", username), None)
            .expect("insert deck");
        (user, deck)
    }

    /// Add a card to a deck; the answer is derived from the question
    pub fn card(&self, deck_id: i64, question: &str) -> Card {
        let mut card = Card::new(deck_id, question.to_string(), format!("answer to {}", question));
        card.id = db::insert_card(&self.conn, &card).expect("insert card");
        card
    }
}
