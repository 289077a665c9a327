//! Users and the decks they own

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};

use super::{parse_db_time, to_db_time};
use crate::domain::{Deck, User};

pub fn insert_user(conn: &Connection, username: &str) -> Result<User> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO users (username, created_at) VALUES (?1, ?2)",
        params![username, to_db_time(&now)],
    )?;
    let id = conn.last_insert_rowid();
    get_user(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn get_user(conn: &Connection, id: i64) -> Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, created_at FROM users WHERE id = ?1",
        params![id],
        |row| {
            let created_at: String = row.get(2)?;
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                created_at: parse_db_time(2, &created_at)?,
            })
        },
    )
    .optional()
}

pub fn insert_deck(
    conn: &Connection,
    user_id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<Deck> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO decks (user_id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![user_id, name, description, to_db_time(&now)],
    )?;
    let id = conn.last_insert_rowid();
    get_deck(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn get_deck(conn: &Connection, id: i64) -> Result<Option<Deck>> {
    conn.query_row(
        "SELECT id, user_id, name, description, created_at FROM decks WHERE id = ?1",
        params![id],
        row_to_deck,
    )
    .optional()
}

/// Decks owned by a user, newest first
pub fn list_decks_for_user(conn: &Connection, user_id: i64) -> Result<Vec<Deck>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, user_id, name, description, created_at
    FROM decks
    WHERE user_id = ?1
    ORDER BY created_at DESC, id DESC
    "#,
    )?;

    let decks = stmt
        .query_map(params![user_id], row_to_deck)?
        .collect::<Result<Vec<_>>>()?;
    Ok(decks)
}

/// Delete a deck with its cards, their sessions and any progress rows
pub fn delete_deck(conn: &Connection, deck_id: i64) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM study_sessions WHERE card_id IN (SELECT id FROM cards WHERE deck_id = ?1)",
        params![deck_id],
    )?;
    tx.execute("DELETE FROM study_progress WHERE deck_id = ?1", params![deck_id])?;
    tx.execute("DELETE FROM cards WHERE deck_id = ?1", params![deck_id])?;
    tx.execute("DELETE FROM decks WHERE id = ?1", params![deck_id])?;
    tx.commit()
}

fn row_to_deck(row: &rusqlite::Row) -> Result<Deck> {
    let created_at: String = row.get(4)?;
    Ok(Deck {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: parse_db_time(4, &created_at)?,
    })
}
