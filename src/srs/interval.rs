//! Review interval scheduling.
//!
//! The interval grows with the number of recorded sessions and is scaled by
//! the most recent score. Multipliers are held in tenths so that
//! `ceil(base * multiplier)` is computed in integers and never drifts
//! (30 days at 1.1 is exactly 33, not 34).

use chrono::{DateTime, TimeDelta, Utc};

use crate::config;
use crate::domain::StudySession;

/// What the scheduler needs to know about a card's history for one user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewSummary {
  /// Sessions recorded so far, including the latest
  pub review_count: u32,
  pub last_score: f64,
  pub last_studied_at: DateTime<Utc>,
}

impl ReviewSummary {
  /// Summarize a session history. Order does not matter; the latest
  /// `studied_at` wins. Returns None for an empty history.
  pub fn from_sessions(sessions: &[StudySession]) -> Option<Self> {
    let last = sessions.iter().max_by_key(|s| s.studied_at)?;
    Some(Self {
      review_count: u32::try_from(sessions.len()).unwrap_or(u32::MAX),
      last_score: last.score,
      last_studied_at: last.studied_at,
    })
  }

  pub fn next_due(&self) -> DateTime<Utc> {
    next_due_date(self.last_studied_at, self.review_count, self.last_score)
  }
}

/// Base interval in days for the n-th review (1-indexed).
///
/// Follows `BASE_INTERVAL_DAYS` up to the 7th review, then doubles per
/// review (`120 * 2^(n-7)`). Saturates at `i64::MAX` only where the doubling
/// would overflow. A count of 0 is treated as 1.
pub fn base_interval_days(review_count: u32) -> i64 {
  let table = &config::BASE_INTERVAL_DAYS;
  let n = review_count.max(1) as usize;
  if n <= table.len() {
    return table[n - 1];
  }

  let doublings = (n - table.len()) as u32;
  let last = table[table.len() - 1];
  2i64
    .checked_pow(doublings)
    .and_then(|factor| last.checked_mul(factor))
    .unwrap_or(i64::MAX)
}

/// Score multiplier in tenths. Thresholds are inclusive.
fn multiplier_tenths(score: f64) -> i64 {
  if score >= 0.9 {
    13
  } else if score >= 0.8 {
    11
  } else if score >= 0.6 {
    10
  } else if score >= 0.4 {
    7
  } else {
    5
  }
}

/// Interval multiplier for the most recent score
pub fn score_multiplier(score: f64) -> f64 {
  multiplier_tenths(score) as f64 / 10.0
}

/// Days until the next review: `ceil(base * multiplier)`, at least one day
pub fn interval_days(review_count: u32, score: f64) -> i64 {
  let scaled = base_interval_days(review_count).saturating_mul(multiplier_tenths(score));
  // ceil(scaled / 10) for non-negative integers
  let days = scaled.saturating_add(9) / 10;
  days.max(config::MIN_INTERVAL_DAYS)
}

/// When a card last studied at `last_studied_at` becomes due again.
/// Intervals past chrono's range land on `DateTime::MAX_UTC`.
pub fn next_due_date(last_studied_at: DateTime<Utc>, review_count: u32, score: f64) -> DateTime<Utc> {
  let days = interval_days(review_count, score);
  TimeDelta::try_days(days)
    .and_then(|delta| last_studied_at.checked_add_signed(delta))
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// A card with no history is always due; otherwise it is due strictly after
/// its next-due timestamp.
pub fn is_due(summary: Option<&ReviewSummary>, now: DateTime<Utc>) -> bool {
  match summary {
    None => true,
    Some(s) => now > s.next_due(),
  }
}

/// Study priority in `[1, 100]`.
///
/// Never studied → 100. Overdue by H whole hours → `min(100, 50 + H)`.
/// Due in H whole hours → `max(1, 50 - H / 24)`.
pub fn priority(summary: Option<&ReviewSummary>, now: DateTime<Utc>) -> i64 {
  let Some(summary) = summary else {
    return config::PRIORITY_NEW;
  };

  let next_due = summary.next_due();
  if now > next_due {
    let hours_overdue = (now - next_due).num_hours();
    (config::PRIORITY_BASELINE + hours_overdue).min(100)
  } else {
    let hours_until_due = (next_due - now).num_hours();
    (config::PRIORITY_BASELINE - hours_until_due / 24).max(1)
  }
}

/// `is_due` over a raw session history
pub fn is_due_from_history(sessions: &[StudySession], now: DateTime<Utc>) -> bool {
  is_due(ReviewSummary::from_sessions(sessions).as_ref(), now)
}

/// `priority` over a raw session history
pub fn priority_from_history(sessions: &[StudySession], now: DateTime<Utc>) -> i64 {
  priority(ReviewSummary::from_sessions(sessions).as_ref(), now)
}
