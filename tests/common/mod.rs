//! Shared fixtures for the HTTP tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use tokio_util::sync::CancellationToken;

use flashcard_study::db::{self, DbPool};
use flashcard_study::domain::Card;
use flashcard_study::grading::{CompletionTransport, GradingClient, RetryPolicy, TransportError};
use flashcard_study::handlers::{self, USER_ID_HEADER};
use flashcard_study::state::AppState;

/// Replays replies in order, then keeps returning the last one
pub struct ScriptedReplies {
    replies: Mutex<VecDeque<Result<String, TransportError>>>,
    last: Mutex<Option<Result<String, TransportError>>>,
}

impl ScriptedReplies {
    pub fn new(replies: Vec<Result<String, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
        }
    }
}

#[async_trait]
impl CompletionTransport for ScriptedReplies {
    async fn complete(&self, _prompt: &str) -> Result<String, TransportError> {
        let next = self.replies.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(reply) = next {
            *last = Some(reply);
        }
        last.clone()
            .unwrap_or_else(|| Err(TransportError::Failed("no scripted reply".into())))
    }
}

pub fn verdict(score: f64) -> Result<String, TransportError> {
    Ok(format!(
        r#"```json
{{"score": {}, "confidence": 0.8, "feedback": "graded"}}
```"#,
        score
    ))
}

pub struct TestApp {
    pub server: TestServer,
    pub pool: DbPool,
    pub user_id: i64,
    pub deck_id: i64,
    pub card_id: i64,
    pub shutdown: CancellationToken,
}

impl TestApp {
    /// One user owning a deck with a single card
    pub fn new(replies: Vec<Result<String, TransportError>>) -> Self {
        let pool = db::init_memory_db().unwrap();
        let (user_id, deck_id, card_id) = {
            let conn = pool.lock().unwrap();
            let user = db::insert_user(&conn, "ana").unwrap();
            let deck = db::insert_deck(&conn, user.id, "Capitals", Some("European capitals")).unwrap();
            let card = Card::new(deck.id, "Capital of France?".into(), "Paris".into());
            let card_id = db::insert_card(&conn, &card).unwrap();
            (user.id, deck.id, card_id)
        };

        let transport = Arc::new(ScriptedReplies::new(replies));
        let grader = GradingClient::new(transport).with_policy(RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
            multiplier: 2,
        });
        let state = AppState::new(pool.clone(), Arc::new(grader), Duration::from_secs(5));
        let shutdown = state.shutdown.clone();
        let server = TestServer::new(handlers::router(state)).unwrap();

        Self {
            server,
            pool,
            user_id,
            deck_id,
            card_id,
            shutdown,
        }
    }

    pub fn add_user(&self, username: &str) -> i64 {
        let conn = self.pool.lock().unwrap();
        db::insert_user(&conn, username).unwrap().id
    }
}

pub fn user_header(user_id: i64) -> (HeaderName, HeaderValue) {
    (HeaderName::from_static(USER_ID_HEADER), HeaderValue::from(user_id))
}
