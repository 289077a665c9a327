//! Grade a submitted answer, record it and reclassify the card.

use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;
use tokio_util::sync::CancellationToken;

use crate::config;
use crate::db::{self, DbPool};
use crate::domain::{Card, GradingResult, StudySession};
use crate::error::{Result, StudyError};
use crate::grading::GradingClient;
use crate::srs::new_difficulty;

pub struct AnswerEvaluator {
    db: DbPool,
    grader: Arc<GradingClient>,
    /// Caller-side limit around the whole grading call, retries included
    timeout: Duration,
}

impl AnswerEvaluator {
    pub fn new(db: DbPool, grader: Arc<GradingClient>, timeout: Duration) -> Self {
        Self { db, grader, timeout }
    }

    pub async fn submit_answer(&self, user_id: i64, card_id: i64, answer: &str) -> Result<StudySession> {
        self.submit_answer_with_cancel(user_id, card_id, answer, &CancellationToken::new())
            .await
    }

    /// Grade `answer` against the card and persist the resulting session.
    ///
    /// The connection lock is released while the grader runs and taken again
    /// for the write, which happens in a single transaction.
    pub async fn submit_answer_with_cancel(
        &self,
        user_id: i64,
        card_id: i64,
        answer: &str,
        cancel: &CancellationToken,
    ) -> Result<StudySession> {
        validate_answer(answer)?;

        let card = {
            let conn = db::try_lock(&self.db)?;
            load_card_for_user(&conn, user_id, card_id)?
        };

        let grading = self.grade(&card, answer, cancel).await?;
        tracing::debug!(
            user_id,
            card_id,
            score = grading.score,
            confidence = grading.confidence,
            "Answer graded"
        );

        let conn = db::try_lock(&self.db)?;
        record_graded_answer(&conn, user_id, card_id, answer, grading)
    }

    async fn grade(&self, card: &Card, answer: &str, cancel: &CancellationToken) -> Result<GradingResult> {
        let grading = self
            .grader
            .grade_with_cancel(&card.question, &card.answer, answer, cancel);

        match tokio::time::timeout(self.timeout, grading).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                tracing::warn!(
                    card_id = card.id,
                    timeout_secs = self.timeout.as_secs(),
                    "Grading timed out"
                );
                Err(StudyError::GradingTransient(format!(
                    "grading timed out after {}s",
                    self.timeout.as_secs()
                )))
            }
        }
    }
}

fn validate_answer(answer: &str) -> Result<()> {
    let len = answer.chars().count();
    if len > config::MAX_ANSWER_CHARS {
        return Err(StudyError::Validation(format!(
            "answer is {} characters, at most {} allowed",
            len,
            config::MAX_ANSWER_CHARS
        )));
    }
    Ok(())
}

fn load_card_for_user(conn: &Connection, user_id: i64, card_id: i64) -> Result<Card> {
    db::get_user(conn, user_id)?.ok_or_else(|| StudyError::NotFound(format!("user {}", user_id)))?;
    let card = db::get_card_by_id(conn, card_id)?
        .ok_or_else(|| StudyError::NotFound(format!("card {}", card_id)))?;
    super::owned_deck(conn, user_id, card.deck_id)?;
    Ok(card)
}

/// Insert the session and apply the difficulty change in one transaction.
/// The card is re-read inside the transaction, before the insert, so a card
/// deleted while grading ran is reported as missing and a concurrent
/// submission for the same card cannot be lost.
fn record_graded_answer(
    conn: &Connection,
    user_id: i64,
    card_id: i64,
    answer: &str,
    grading: GradingResult,
) -> Result<StudySession> {
    let tx = conn.unchecked_transaction()?;

    let card = db::get_card_by_id(&tx, card_id)?
        .ok_or_else(|| StudyError::NotFound(format!("card {}", card_id)))?;

    let session = db::insert_session(&tx, &StudySession::new(user_id, card_id, answer.to_string(), grading))?;
    let review_count = db::count_sessions_for_card(&tx, card_id, user_id)?;

    let updated = new_difficulty(card.difficulty, session.score, review_count.max(0) as usize);
    if updated != card.difficulty {
        db::update_card_difficulty(&tx, card_id, updated)?;
        tracing::info!(
            card_id,
            from = card.difficulty.as_str(),
            to = updated.as_str(),
            review_count,
            "Card difficulty changed"
        );
    }

    tx.commit()?;
    Ok(session)
}
