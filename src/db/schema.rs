use rusqlite::{Connection, Result};

/// Create tables and indexes. Safe to run on every start.
pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      username TEXT NOT NULL UNIQUE,
      created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS decks (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id INTEGER NOT NULL,
      name TEXT NOT NULL,
      description TEXT,
      created_at TEXT NOT NULL,
      FOREIGN KEY (user_id) REFERENCES users(id)
    );

    CREATE TABLE IF NOT EXISTS cards (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      deck_id INTEGER NOT NULL,
      question TEXT NOT NULL,
      answer TEXT NOT NULL,
      difficulty TEXT NOT NULL DEFAULT 'MEDIUM'
        CHECK (difficulty IN ('EASY', 'MEDIUM', 'HARD')),
      FOREIGN KEY (deck_id) REFERENCES decks(id)
    );

    -- Append-only: rows are only removed together with their card
    CREATE TABLE IF NOT EXISTS study_sessions (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id INTEGER NOT NULL,
      card_id INTEGER NOT NULL,
      response TEXT NOT NULL,
      score REAL NOT NULL,
      confidence REAL NOT NULL,
      feedback TEXT NOT NULL,
      studied_at TEXT NOT NULL,
      FOREIGN KEY (user_id) REFERENCES users(id),
      FOREIGN KEY (card_id) REFERENCES cards(id)
    );

    CREATE TABLE IF NOT EXISTS study_progress (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id INTEGER NOT NULL,
      deck_id INTEGER NOT NULL,
      current_card_index INTEGER NOT NULL DEFAULT 0,
      total_cards INTEGER NOT NULL,
      cards_completed INTEGER NOT NULL DEFAULT 0,
      last_studied_at TEXT NOT NULL,
      is_completed INTEGER NOT NULL DEFAULT 0,
      FOREIGN KEY (user_id) REFERENCES users(id),
      FOREIGN KEY (deck_id) REFERENCES decks(id)
    );

    -- At most one active (not completed) progress row per user and deck
    CREATE UNIQUE INDEX IF NOT EXISTS idx_study_progress_active
      ON study_progress(user_id, deck_id) WHERE is_completed = 0;

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_decks_user_id ON decks(user_id);
    CREATE INDEX IF NOT EXISTS idx_cards_deck_id ON cards(deck_id);
    CREATE INDEX IF NOT EXISTS idx_sessions_card_user ON study_sessions(card_id, user_id, studied_at);
    CREATE INDEX IF NOT EXISTS idx_sessions_user_studied ON study_sessions(user_id, studied_at);
    CREATE INDEX IF NOT EXISTS idx_progress_user ON study_progress(user_id, is_completed);
    "#,
  )?;

  Ok(())
}
