//! Deck listing, lookup and deletion for the owning user

use serde::Serialize;

use super::owned_deck;
use crate::db::{self, DbPool};
use crate::domain::{Card, Deck};
use crate::error::Result;

/// A deck together with its cards in creation order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckDetail {
    #[serde(flatten)]
    pub deck: Deck,
    pub cards: Vec<Card>,
}

#[derive(Clone)]
pub struct DeckService {
    db: DbPool,
}

impl DeckService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn list_decks(&self, user_id: i64) -> Result<Vec<Deck>> {
        let conn = db::try_lock(&self.db)?;
        Ok(db::list_decks_for_user(&conn, user_id)?)
    }

    pub fn get_deck(&self, user_id: i64, deck_id: i64) -> Result<DeckDetail> {
        let conn = db::try_lock(&self.db)?;
        let deck = owned_deck(&conn, user_id, deck_id)?;
        let cards = db::list_cards_for_deck(&conn, deck_id)?;
        Ok(DeckDetail { deck, cards })
    }

    /// Delete the deck with its cards, their sessions and any progress rows
    pub fn delete_deck(&self, user_id: i64, deck_id: i64) -> Result<()> {
        let conn = db::try_lock(&self.db)?;
        owned_deck(&conn, user_id, deck_id)?;

        let card_count = db::count_cards_for_deck(&conn, deck_id)?;
        db::delete_deck(&conn, deck_id)?;
        tracing::info!(user_id, deck_id, card_count, "Deleted deck");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GradingResult, ProgressUpdate, StudySession};
    use crate::error::StudyError;
    use chrono::Utc;

    fn setup() -> (DeckService, DbPool, i64, i64) {
        let pool = db::init_memory_db().unwrap();
        let (user_id, deck_id) = {
            let conn = pool.lock().unwrap();
            let user = db::insert_user(&conn, "ana").unwrap();
            let deck = db::insert_deck(&conn, user.id, "Rivers", Some("Longest rivers")).unwrap();
            db::insert_card(&conn, &Card::new(deck.id, "Longest river?".into(), "Nile".into())).unwrap();
            db::insert_card(&conn, &Card::new(deck.id, "Second longest?".into(), "Amazon".into())).unwrap();
            (user.id, deck.id)
        };
        (DeckService::new(pool.clone()), pool, user_id, deck_id)
    }

    fn count(pool: &DbPool, table: &str) -> i64 {
        pool.lock()
            .unwrap()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_get_deck_with_cards() {
        let (service, _, user_id, deck_id) = setup();
        let detail = service.get_deck(user_id, deck_id).unwrap();
        assert_eq!(detail.deck.name, "Rivers");
        let answers: Vec<&str> = detail.cards.iter().map(|c| c.answer.as_str()).collect();
        assert_eq!(answers, vec!["Nile", "Amazon"]);
    }

    #[test]
    fn test_get_deck_checks_owner() {
        let (service, pool, user_id, deck_id) = setup();
        let intruder = db::insert_user(&pool.lock().unwrap(), "mallory").unwrap().id;

        assert!(matches!(service.get_deck(intruder, deck_id), Err(StudyError::AccessDenied(_))));
        assert!(matches!(service.get_deck(user_id, deck_id + 1), Err(StudyError::NotFound(_))));
        assert!(service.list_decks(intruder).unwrap().is_empty());
        assert_eq!(service.list_decks(user_id).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_deck_removes_history() {
        let (service, pool, user_id, deck_id) = setup();
        {
            let conn = pool.lock().unwrap();
            let card_id = db::list_cards_for_deck(&conn, deck_id).unwrap()[0].id;
            let grading = GradingResult {
                score: 0.7,
                confidence: 0.9,
                feedback: "close".into(),
            };
            db::insert_session(&conn, &StudySession::new(user_id, card_id, "Nile".into(), grading)).unwrap();
            let update = ProgressUpdate {
                current_card_index: 1,
                total_cards: 2,
                cards_completed: 1,
                is_completed: false,
            };
            db::upsert_active_progress(&conn, user_id, deck_id, &update, Utc::now()).unwrap();
        }

        service.delete_deck(user_id, deck_id).unwrap();

        assert_eq!(count(&pool, "decks"), 0);
        assert_eq!(count(&pool, "cards"), 0);
        assert_eq!(count(&pool, "study_sessions"), 0);
        assert_eq!(count(&pool, "study_progress"), 0);
        assert!(matches!(service.delete_deck(user_id, deck_id), Err(StudyError::NotFound(_))));
    }

    #[test]
    fn test_delete_foreign_deck_keeps_it() {
        let (service, pool, _, deck_id) = setup();
        let intruder = db::insert_user(&pool.lock().unwrap(), "mallory").unwrap().id;

        assert!(matches!(service.delete_deck(intruder, deck_id), Err(StudyError::AccessDenied(_))));
        assert_eq!(count(&pool, "cards"), 2);
    }
}
