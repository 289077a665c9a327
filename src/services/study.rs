//! Card selection and read-only study views

use chrono::{DateTime, Utc};

use super::owned_deck;
use crate::db::{self, DbPool, DeckStats, StudyAnalytics};
use crate::domain::StudySession;
use crate::error::Result;
use crate::srs::{self, StudyCard};

#[derive(Clone)]
pub struct StudyOrchestrator {
    db: DbPool,
}

impl StudyOrchestrator {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Every card of the deck with its due state for `user_id`, highest
    /// priority first.
    pub fn select_cards_for_study(
        &self,
        user_id: i64,
        deck_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<StudyCard>> {
        let conn = db::try_lock(&self.db)?;
        owned_deck(&conn, user_id, deck_id)?;

        let cards = db::list_cards_for_deck(&conn, deck_id)?;
        let summaries = db::review_summaries_for_deck(&conn, user_id, deck_id)?;
        let ranked = srs::rank_cards(cards, &summaries, now);

        tracing::debug!(
            user_id,
            deck_id,
            cards = ranked.len(),
            due = srs::card_selector::due_count(&ranked),
            "Selected cards for study"
        );
        Ok(ranked)
    }

    pub fn list_sessions(&self, user_id: i64) -> Result<Vec<StudySession>> {
        let conn = db::try_lock(&self.db)?;
        Ok(db::list_sessions_for_user(&conn, user_id)?)
    }

    pub fn study_analytics(&self, user_id: i64, now: DateTime<Utc>) -> Result<StudyAnalytics> {
        let conn = db::try_lock(&self.db)?;
        Ok(db::get_study_analytics(&conn, user_id, now)?)
    }

    pub fn deck_stats(&self, user_id: i64) -> Result<Vec<DeckStats>> {
        let conn = db::try_lock(&self.db)?;
        Ok(db::get_deck_stats(&conn, user_id)?)
    }
}
