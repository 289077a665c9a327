//! Error kinds returned by the study engine.
//!
//! Each variant is a distinct kind that callers can react to; the HTTP
//! boundary maps them to responses in `handlers::error`.

use thiserror::Error;

use crate::db::DbLockError;
use crate::grading::GradingError;

#[derive(Debug, Error)]
pub enum StudyError {
  /// Grader still overloaded after retries, or the call timed out
  #[error("Grading temporarily unavailable: {0}")]
  GradingTransient(String),

  /// Grader answered with something that is not a usable verdict
  #[error("Grading response unusable: {0}")]
  GradingMalformed(String),

  /// Grader rejected the call for a non-transient reason
  #[error("Grading failed: {0}")]
  GradingFatal(String),

  #[error("Grading cancelled")]
  GradingCancelled,

  #[error("Access denied: {0}")]
  AccessDenied(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Invalid input: {0}")]
  Validation(String),

  #[error("Database error: {0}")]
  Database(String),
}

impl StudyError {
  /// Stable kind identifier, preserved across the boundary
  pub fn kind(&self) -> &'static str {
    match self {
      Self::GradingTransient(_) => "grading_transient",
      Self::GradingMalformed(_) => "grading_malformed",
      Self::GradingFatal(_) => "grading_fatal",
      Self::GradingCancelled => "grading_cancelled",
      Self::AccessDenied(_) => "access_denied",
      Self::NotFound(_) => "not_found",
      Self::Validation(_) => "validation",
      Self::Database(_) => "database",
    }
  }

  /// True when the same request may succeed if sent again later
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::GradingTransient(_) | Self::GradingCancelled)
  }
}

impl From<GradingError> for StudyError {
  fn from(err: GradingError) -> Self {
    match err {
      GradingError::Transient(msg) => Self::GradingTransient(msg),
      GradingError::Malformed(msg) => Self::GradingMalformed(msg),
      GradingError::Fatal(msg) => Self::GradingFatal(msg),
      GradingError::Cancelled => Self::GradingCancelled,
    }
  }
}

impl From<rusqlite::Error> for StudyError {
  fn from(err: rusqlite::Error) -> Self {
    Self::Database(err.to_string())
  }
}

impl From<DbLockError> for StudyError {
  fn from(err: DbLockError) -> Self {
    Self::Database(err.to_string())
  }
}

/// Result type alias for study operations
pub type Result<T> = std::result::Result<T, StudyError>;

/// For failures that degrade behaviour but must not abort the caller
pub trait LogOnError<T> {
  /// Log the error at warn level and return None
  fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_grading_errors_keep_their_kind() {
    let cases = [
      (GradingError::Transient("x".into()), "grading_transient"),
      (GradingError::Malformed("x".into()), "grading_malformed"),
      (GradingError::Fatal("x".into()), "grading_fatal"),
      (GradingError::Cancelled, "grading_cancelled"),
    ];
    for (grading, kind) in cases {
      assert_eq!(StudyError::from(grading).kind(), kind);
    }
  }

  #[test]
  fn test_only_transient_kinds_are_retryable() {
    assert!(StudyError::GradingTransient("busy".into()).is_retryable());
    assert!(!StudyError::GradingMalformed("junk".into()).is_retryable());
    assert!(!StudyError::GradingFatal("401".into()).is_retryable());
    assert!(!StudyError::AccessDenied("deck 1".into()).is_retryable());
    assert!(!StudyError::Validation("bad".into()).is_retryable());
  }

  #[test]
  fn test_not_found_message() {
    let err = StudyError::NotFound("card 42".to_string());
    assert_eq!(err.to_string(), "Not found: card 42");
  }

  #[test]
  fn test_sqlite_error_maps_to_database() {
    let err: StudyError = rusqlite::Error::QueryReturnedNoRows.into();
    assert_eq!(err.kind(), "database");
  }

  #[test]
  fn test_log_warn_passes_values_through() {
    let failed: std::result::Result<i64, String> = Err("boom".into());
    assert_eq!(failed.log_warn("counting"), None);
    let ok: std::result::Result<i64, String> = Ok(4);
    assert_eq!(ok.log_warn("counting"), Some(4));
  }

  #[test]
  fn test_lock_error_maps_to_database() {
    let err: StudyError = DbLockError.into();
    assert_eq!(err.to_string(), "Database error: Database unavailable");
  }
}
