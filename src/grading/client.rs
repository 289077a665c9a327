//! Grading client: prompt, retry on overload, extract the verdict.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::response::{grading_prompt, parse_grading_response};
use super::transport::{CompletionTransport, TransportError};
use crate::config;
use crate::domain::GradingResult;

/// Errors surfaced by [`GradingClient`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradingError {
  /// Still overloaded after every attempt; worth retrying later
  #[error("grading service unavailable: {0}")]
  Transient(String),

  /// The service answered but the verdict could not be extracted
  #[error("malformed grading response: {0}")]
  Malformed(String),

  /// Non-retryable transport failure
  #[error("grading failed: {0}")]
  Fatal(String),

  /// The caller cancelled while a call or backoff wait was in flight
  #[error("grading cancelled")]
  Cancelled,
}

/// Exponential backoff applied between overloaded attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub base_delay: Duration,
  pub multiplier: u32,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: config::GRADING_MAX_ATTEMPTS,
      base_delay: config::GRADING_BASE_DELAY,
      multiplier: config::GRADING_BACKOFF_MULTIPLIER,
    }
  }
}

impl RetryPolicy {
  /// Wait before `attempt` (2-indexed: the first retry is attempt 2)
  pub fn delay_before(&self, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(2);
    let factor = self.multiplier.checked_pow(exponent).unwrap_or(u32::MAX);
    self.base_delay.saturating_mul(factor)
  }
}

/// Grades one answer through an external completion service
pub struct GradingClient {
  transport: Arc<dyn CompletionTransport>,
  policy: RetryPolicy,
}

impl GradingClient {
  pub fn new(transport: Arc<dyn CompletionTransport>) -> Self {
    Self {
      transport,
      policy: RetryPolicy::default(),
    }
  }

  pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn policy(&self) -> RetryPolicy {
    self.policy
  }

  /// Grade a candidate answer. Runs until it succeeds or exhausts retries.
  pub async fn grade(
    &self,
    question: &str,
    correct_answer: &str,
    candidate_answer: &str,
  ) -> Result<GradingResult, GradingError> {
    self
      .grade_with_cancel(question, correct_answer, candidate_answer, &CancellationToken::new())
      .await
  }

  /// Grade a candidate answer, aborting early when `cancel` fires
  pub async fn grade_with_cancel(
    &self,
    question: &str,
    correct_answer: &str,
    candidate_answer: &str,
    cancel: &CancellationToken,
  ) -> Result<GradingResult, GradingError> {
    let prompt = grading_prompt(question, correct_answer, candidate_answer);
    let raw = self.complete_with_retry(&prompt, cancel).await?;

    parse_grading_response(&raw).map_err(|reason| {
      tracing::warn!(%reason, "Unusable grading response");
      GradingError::Malformed(reason)
    })
  }

  async fn complete_with_retry(
    &self,
    prompt: &str,
    cancel: &CancellationToken,
  ) -> Result<String, GradingError> {
    let max_attempts = self.policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
      tracing::debug!(attempt, max_attempts, "Calling grading service");

      let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(GradingError::Cancelled),
        result = self.transport.complete(prompt) => result,
      };

      match result {
        Ok(text) => return Ok(text),
        Err(TransportError::Overloaded(reason)) if attempt < max_attempts => {
          let delay = self.policy.delay_before(attempt + 1);
          tracing::warn!(
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            %reason,
            "Grading service overloaded, backing off"
          );

          tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GradingError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
          }
          attempt += 1;
        }
        Err(TransportError::Overloaded(reason)) => {
          tracing::warn!(attempt, %reason, "Grading retries exhausted");
          return Err(GradingError::Transient(format!(
            "overloaded after {} attempts: {}",
            attempt, reason
          )));
        }
        Err(TransportError::Failed(reason)) => {
          tracing::warn!(attempt, %reason, "Grading call failed");
          return Err(GradingError::Fatal(reason));
        }
      }
    }
  }
}
