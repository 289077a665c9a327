//! Application state shared by all handlers.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::db::DbPool;
use crate::grading::GradingClient;
use crate::services::{AnswerEvaluator, DeckService, ProgressTracker, StudyOrchestrator};

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub evaluator: Arc<AnswerEvaluator>,
    pub study: StudyOrchestrator,
    pub progress: ProgressTracker,
    pub decks: DeckService,
    /// Cancelled on server shutdown; aborts grading calls still in flight
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(db: DbPool, grader: Arc<GradingClient>, grading_timeout: Duration) -> Self {
        Self {
            evaluator: Arc::new(AnswerEvaluator::new(db.clone(), grader, grading_timeout)),
            study: StudyOrchestrator::new(db.clone()),
            progress: ProgressTracker::new(db.clone()),
            decks: DeckService::new(db),
            shutdown: CancellationToken::new(),
        }
    }
}
