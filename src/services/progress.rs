//! Resumable study progress per (user, deck)

use chrono::{DateTime, Utc};

use super::owned_deck;
use crate::db::{self, DbPool};
use crate::domain::{ProgressUpdate, StudyProgress};
use crate::error::{Result, StudyError};

#[derive(Clone)]
pub struct ProgressTracker {
    db: DbPool,
}

impl ProgressTracker {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Overwrite (or start) the active progress row and stamp it with `now`
    pub fn save_progress(
        &self,
        user_id: i64,
        deck_id: i64,
        update: &ProgressUpdate,
        now: DateTime<Utc>,
    ) -> Result<StudyProgress> {
        update.validate().map_err(StudyError::Validation)?;

        let conn = db::try_lock(&self.db)?;
        db::get_user(&conn, user_id)?.ok_or_else(|| StudyError::NotFound(format!("user {}", user_id)))?;
        owned_deck(&conn, user_id, deck_id)?;

        let progress = db::upsert_active_progress(&conn, user_id, deck_id, update, now)?;
        tracing::info!(
            user_id,
            deck_id,
            current = progress.current_card_index,
            total = progress.total_cards,
            completed = progress.is_completed,
            "Saved study progress"
        );
        Ok(progress)
    }

    pub fn get_active_progress(&self, user_id: i64, deck_id: i64) -> Result<Option<StudyProgress>> {
        let conn = db::try_lock(&self.db)?;
        Ok(db::get_active_progress(&conn, user_id, deck_id)?)
    }

    /// Remove the active row; clearing when there is none is not an error
    pub fn clear_progress(&self, user_id: i64, deck_id: i64) -> Result<()> {
        let conn = db::try_lock(&self.db)?;
        if db::delete_active_progress(&conn, user_id, deck_id)? {
            tracing::info!(user_id, deck_id, "Cleared study progress");
        }
        Ok(())
    }

    pub fn list_active_progress(&self, user_id: i64) -> Result<Vec<StudyProgress>> {
        let conn = db::try_lock(&self.db)?;
        Ok(db::list_active_progress(&conn, user_id)?)
    }
}
