//! Study session log (append-only)

use rusqlite::{params, Connection, OptionalExtension, Result};
use std::collections::HashMap;

use super::{parse_db_time, to_db_time};
use crate::domain::StudySession;
use crate::srs::ReviewSummary;

const SESSION_COLUMNS: &str =
    "id, user_id, card_id, response, score, confidence, feedback, studied_at";

/// Insert a session and return it as stored
pub fn insert_session(conn: &Connection, session: &StudySession) -> Result<StudySession> {
    conn.execute(
        r#"
    INSERT INTO study_sessions (user_id, card_id, response, score, confidence, feedback, studied_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#,
        params![
            session.user_id,
            session.card_id,
            session.response,
            session.score,
            session.confidence,
            session.feedback,
            to_db_time(&session.studied_at),
        ],
    )?;
    let id = conn.last_insert_rowid();
    get_session_by_id(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn get_session_by_id(conn: &Connection, id: i64) -> Result<Option<StudySession>> {
    conn.query_row(
        &format!("SELECT {} FROM study_sessions WHERE id = ?1", SESSION_COLUMNS),
        params![id],
        row_to_session,
    )
    .optional()
}

/// Number of sessions a user has recorded for a card
pub fn count_sessions_for_card(conn: &Connection, card_id: i64, user_id: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM study_sessions WHERE card_id = ?1 AND user_id = ?2",
        params![card_id, user_id],
        |row| row.get(0),
    )
}

/// All of a user's sessions, most recent first
pub fn list_sessions_for_user(conn: &Connection, user_id: i64) -> Result<Vec<StudySession>> {
    let mut stmt = conn.prepare(&format!(
        r#"
    SELECT {}
    FROM study_sessions
    WHERE user_id = ?1
    ORDER BY studied_at DESC, id DESC
    "#,
        SESSION_COLUMNS
    ))?;

    let sessions = stmt
        .query_map(params![user_id], row_to_session)?
        .collect::<Result<Vec<_>>>()?;
    Ok(sessions)
}

/// Scheduling summary (count + latest session) per card of a deck, for one user.
/// Cards the user never studied are absent from the map.
pub fn review_summaries_for_deck(
    conn: &Connection,
    user_id: i64,
    deck_id: i64,
) -> Result<HashMap<i64, ReviewSummary>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT card_id, review_count, score, studied_at
    FROM (
      SELECT s.card_id, s.score, s.studied_at,
             COUNT(*) OVER (PARTITION BY s.card_id) AS review_count,
             ROW_NUMBER() OVER (PARTITION BY s.card_id ORDER BY s.studied_at DESC, s.id DESC) AS rn
      FROM study_sessions s
      JOIN cards c ON c.id = s.card_id
      WHERE s.user_id = ?1 AND c.deck_id = ?2
    )
    WHERE rn = 1
    "#,
    )?;

    let rows = stmt.query_map(params![user_id, deck_id], |row| {
        let card_id: i64 = row.get(0)?;
        let review_count: i64 = row.get(1)?;
        let studied_at: String = row.get(3)?;
        Ok((
            card_id,
            ReviewSummary {
                review_count: u32::try_from(review_count).unwrap_or(u32::MAX),
                last_score: row.get(2)?,
                last_studied_at: parse_db_time(3, &studied_at)?,
            },
        ))
    })?;

    rows.collect()
}

fn row_to_session(row: &rusqlite::Row) -> Result<StudySession> {
    let studied_at: String = row.get(7)?;
    Ok(StudySession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        card_id: row.get(2)?,
        response: row.get(3)?,
        score: row.get(4)?,
        confidence: row.get(5)?,
        feedback: row.get(6)?,
        studied_at: parse_db_time(7, &studied_at)?,
    })
}
