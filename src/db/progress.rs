//! Study progress cursors.
//!
//! One active (not completed) row per user and deck, enforced by the partial
//! unique index `idx_study_progress_active` and by doing the lookup and the
//! write inside one transaction.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use super::{parse_db_time, to_db_time};
use crate::domain::{ProgressUpdate, StudyProgress};

const PROGRESS_COLUMNS: &str = "id, user_id, deck_id, current_card_index, total_cards, \
     cards_completed, is_completed, last_studied_at";

pub fn get_active_progress(
    conn: &Connection,
    user_id: i64,
    deck_id: i64,
) -> Result<Option<StudyProgress>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM study_progress WHERE user_id = ?1 AND deck_id = ?2 AND is_completed = 0",
            PROGRESS_COLUMNS
        ),
        params![user_id, deck_id],
        row_to_progress,
    )
    .optional()
}

/// Active progress across all of a user's decks, most recently studied first
pub fn list_active_progress(conn: &Connection, user_id: i64) -> Result<Vec<StudyProgress>> {
    let mut stmt = conn.prepare(&format!(
        r#"
    SELECT {}
    FROM study_progress
    WHERE user_id = ?1 AND is_completed = 0
    ORDER BY last_studied_at DESC, id DESC
    "#,
        PROGRESS_COLUMNS
    ))?;

    let rows = stmt
        .query_map(params![user_id], row_to_progress)?
        .collect::<Result<Vec<_>>>()?;
    Ok(rows)
}

/// Overwrite the active row for (user, deck), creating it if absent.
///
/// Saving with `is_completed = true` closes the row; the next save then
/// starts a new active one.
pub fn upsert_active_progress(
    conn: &Connection,
    user_id: i64,
    deck_id: i64,
    update: &ProgressUpdate,
    now: DateTime<Utc>,
) -> Result<StudyProgress> {
    let tx = conn.unchecked_transaction()?;

    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM study_progress WHERE user_id = ?1 AND deck_id = ?2 AND is_completed = 0",
            params![user_id, deck_id],
            |row| row.get(0),
        )
        .optional()?;

    let id = match existing {
        Some(id) => {
            tx.execute(
                r#"
        UPDATE study_progress
        SET current_card_index = ?1, total_cards = ?2, cards_completed = ?3,
            is_completed = ?4, last_studied_at = ?5
        WHERE id = ?6
        "#,
                params![
                    update.current_card_index,
                    update.total_cards,
                    update.cards_completed,
                    update.is_completed,
                    to_db_time(&now),
                    id,
                ],
            )?;
            id
        }
        None => {
            tx.execute(
                r#"
        INSERT INTO study_progress
          (user_id, deck_id, current_card_index, total_cards, cards_completed, is_completed, last_studied_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
                params![
                    user_id,
                    deck_id,
                    update.current_card_index,
                    update.total_cards,
                    update.cards_completed,
                    update.is_completed,
                    to_db_time(&now),
                ],
            )?;
            tx.last_insert_rowid()
        }
    };

    let stored = tx.query_row(
        &format!("SELECT {} FROM study_progress WHERE id = ?1", PROGRESS_COLUMNS),
        params![id],
        row_to_progress,
    )?;
    tx.commit()?;
    Ok(stored)
}

/// Delete the active row if there is one. Returns whether a row was removed.
pub fn delete_active_progress(conn: &Connection, user_id: i64, deck_id: i64) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM study_progress WHERE user_id = ?1 AND deck_id = ?2 AND is_completed = 0",
        params![user_id, deck_id],
    )?;
    Ok(deleted > 0)
}

fn row_to_progress(row: &rusqlite::Row) -> Result<StudyProgress> {
    let last_studied_at: String = row.get(7)?;
    Ok(StudyProgress {
        id: row.get(0)?,
        user_id: row.get(1)?,
        deck_id: row.get(2)?,
        current_card_index: row.get(3)?,
        total_cards: row.get(4)?,
        cards_completed: row.get(5)?,
        is_completed: row.get(6)?,
        last_studied_at: parse_db_time(7, &last_studied_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestEnv;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 7, 15, 0).unwrap()
    }

    fn update(index: i64, completed: i64, is_completed: bool) -> ProgressUpdate {
        ProgressUpdate {
            current_card_index: index,
            total_cards: 10,
            cards_completed: completed,
            is_completed,
        }
    }

    fn row_count(env: &TestEnv) -> i64 {
        env.conn
            .query_row("SELECT COUNT(*) FROM study_progress", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_second_save_updates_same_row() {
        let env = TestEnv::new().unwrap();
        let (user, deck) = env.user_with_deck("ana");

        let first = upsert_active_progress(&env.conn, user.id, deck.id, &update(1, 1, false), t0()).unwrap();
        let later = t0() + Duration::minutes(5);
        let second = upsert_active_progress(&env.conn, user.id, deck.id, &update(4, 3, false), later).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.current_card_index, 4);
        assert_eq!(second.cards_completed, 3);
        assert_eq!(second.last_studied_at, later);
        assert_eq!(row_count(&env), 1);
    }

    #[test]
    fn test_completed_save_closes_active_row() {
        let env = TestEnv::new().unwrap();
        let (user, deck) = env.user_with_deck("ana");

        let active = upsert_active_progress(&env.conn, user.id, deck.id, &update(9, 9, false), t0()).unwrap();
        let done = upsert_active_progress(&env.conn, user.id, deck.id, &update(10, 10, true), t0()).unwrap();
        assert_eq!(active.id, done.id);
        assert!(done.is_completed);
        assert!(get_active_progress(&env.conn, user.id, deck.id).unwrap().is_none());

        let fresh = upsert_active_progress(&env.conn, user.id, deck.id, &update(0, 0, false), t0()).unwrap();
        assert_ne!(fresh.id, done.id);
        assert_eq!(row_count(&env), 2);
    }

    #[test]
    fn test_list_active_progress_most_recent_first() {
        let env = TestEnv::new().unwrap();
        let (user, deck) = env.user_with_deck("ana");
        let other = crate::db::insert_deck(&env.conn, user.id, "Other", None).unwrap();

        upsert_active_progress(&env.conn, user.id, deck.id, &update(1, 1, false), t0()).unwrap();
        upsert_active_progress(&env.conn, user.id, other.id, &update(2, 2, false), t0() + Duration::hours(1))
            .unwrap();

        let decks: Vec<i64> = list_active_progress(&env.conn, user.id)
            .unwrap()
            .iter()
            .map(|p| p.deck_id)
            .collect();
        assert_eq!(decks, vec![other.id, deck.id]);
    }

    #[test]
    fn test_delete_active_progress_is_idempotent() {
        let env = TestEnv::new().unwrap();
        let (user, deck) = env.user_with_deck("ana");

        assert!(!delete_active_progress(&env.conn, user.id, deck.id).unwrap());
        upsert_active_progress(&env.conn, user.id, deck.id, &update(1, 1, false), t0()).unwrap();
        assert!(delete_active_progress(&env.conn, user.id, deck.id).unwrap());
        assert!(!delete_active_progress(&env.conn, user.id, deck.id).unwrap());
    }
}
