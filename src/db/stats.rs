//! Read-only study statistics

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, Result};
use serde::Serialize;

use super::{list_decks_for_user, parse_db_time, to_db_time};
use crate::config;

/// Recent study activity for a user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyAnalytics {
    pub total_sessions: i64,
    pub sessions_last_30_days: i64,
    /// Mean score over the analytics window, 0.0 when there were no sessions
    pub average_score: f64,
}

/// Per-deck summary shown on a user's dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub deck_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub card_count: i64,
    /// Average session score on the deck as a whole percentage
    pub mastery_score: i64,
    pub last_studied: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub fn get_study_analytics(conn: &Connection, user_id: i64, now: DateTime<Utc>) -> Result<StudyAnalytics> {
    let since = to_db_time(&(now - Duration::days(config::ANALYTICS_WINDOW_DAYS)));

    let total_sessions: i64 = conn.query_row(
        "SELECT COUNT(*) FROM study_sessions WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;

    let (sessions_last_30_days, average_score): (i64, Option<f64>) = conn.query_row(
        "SELECT COUNT(*), AVG(score) FROM study_sessions WHERE user_id = ?1 AND studied_at > ?2",
        params![user_id, since],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(StudyAnalytics {
        total_sessions,
        sessions_last_30_days,
        average_score: average_score.unwrap_or(0.0),
    })
}

/// Mastery as a whole percentage of the mean score
pub fn mastery_score(average_score: Option<f64>) -> i64 {
    average_score.map(|avg| (avg * 100.0).round() as i64).unwrap_or(0)
}

pub fn get_deck_stats(conn: &Connection, user_id: i64) -> Result<Vec<DeckStats>> {
    let decks = list_decks_for_user(conn, user_id)?;
    let mut stats = Vec::with_capacity(decks.len());

    let mut stmt = conn.prepare(
        r#"
    SELECT
      (SELECT COUNT(*) FROM cards WHERE deck_id = ?1),
      AVG(s.score),
      MAX(s.studied_at)
    FROM study_sessions s
    JOIN cards c ON c.id = s.card_id
    WHERE c.deck_id = ?1 AND s.user_id = ?2
    "#,
    )?;

    for deck in decks {
        let (card_count, average_score, last_studied): (i64, Option<f64>, Option<String>) = stmt
            .query_row(params![deck.id, user_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?;

        let last_studied = match last_studied {
            Some(s) => Some(parse_db_time(2, &s)?),
            None => None,
        };

        stats.push(DeckStats {
            deck_id: deck.id,
            name: deck.name,
            description: deck.description,
            card_count,
            mastery_score: mastery_score(average_score),
            last_studied,
            created_at: deck.created_at,
        });
    }

    Ok(stats)
}
