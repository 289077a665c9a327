//! Application configuration.
//!
//! Scheduling constants live here as compile-time values; deployment
//! settings are loaded once at startup by [`Settings::load`].

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::LogOnError;

// ==================== Scheduling Configuration ====================

/// Base review interval in days, indexed by review count (1 → 1 day, 7 → 120 days)
pub const BASE_INTERVAL_DAYS: [i64; 7] = [1, 3, 7, 14, 30, 60, 120];

/// Shortest interval ever scheduled
pub const MIN_INTERVAL_DAYS: i64 = 1;


/// Sessions required before a card's difficulty may be reclassified
pub const DIFFICULTY_REVIEW_GATE: usize = 3;

/// Priority for a card that has never been studied
pub const PRIORITY_NEW: i64 = 100;

/// Priority for a card that is exactly due
pub const PRIORITY_BASELINE: i64 = 50;

// ==================== Grading Configuration ====================

/// Attempts made when the grading service reports overload
pub const GRADING_MAX_ATTEMPTS: u32 = 3;

/// Delay before the second attempt; doubled for each further attempt
pub const GRADING_BASE_DELAY: Duration = Duration::from_secs(2);

/// Backoff multiplier between attempts
pub const GRADING_BACKOFF_MULTIPLIER: u32 = 2;

/// Default caller-side timeout around the whole grading call (retries included)
pub const DEFAULT_GRADING_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_GRADING_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_GRADING_MODEL: &str = "gemini-1.5-flash";

// ==================== Input Limits ====================

/// Longest answer accepted for grading, in characters
pub const MAX_ANSWER_CHARS: usize = 5_000;

/// Window used by the study analytics
pub const ANALYTICS_WINDOW_DAYS: i64 = 30;

// ==================== Server Configuration ====================

pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0";

pub const DEFAULT_SERVER_PORT: u16 = 3000;

pub const DEFAULT_DATABASE_PATH: &str = "data/flashcards.db";

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
  database: Option<DatabaseSection>,
  server: Option<ServerSection>,
  grading: Option<GradingSection>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
  path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
  addr: Option<String>,
  port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct GradingSection {
  base_url: Option<String>,
  model: Option<String>,
  timeout_secs: Option<u64>,
}

/// Grading endpoint settings
#[derive(Debug, Clone)]
pub struct GradingSettings {
  pub base_url: String,
  pub model: String,
  /// Read from the environment only, never from config.toml
  pub api_key: Option<String>,
  pub timeout: Duration,
}

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
  pub database_path: PathBuf,
  pub server_addr: String,
  pub server_port: u16,
  pub grading: GradingSettings,
}

impl Settings {
  /// Load settings with priority: config.toml > .env / environment > default
  pub fn load() -> Self {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let file = match std::fs::read_to_string("config.toml") {
      Ok(contents) => toml::from_str::<ConfigFile>(&contents)
        .log_warn("Ignoring malformed config.toml")
        .unwrap_or_default(),
      Err(_) => ConfigFile::default(),
    };

    Self::resolve(file, |key| std::env::var(key).ok())
  }

  fn resolve(file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
    let database = file.database.unwrap_or_default();
    let server = file.server.unwrap_or_default();
    let grading = file.grading.unwrap_or_default();

    let database_path = database
      .path
      .or_else(|| env("DATABASE_PATH"))
      .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
    tracing::info!("Using database path: {}", database_path);

    let server_port = server
      .port
      .or_else(|| env("SERVER_PORT").and_then(|p| p.parse().ok()))
      .unwrap_or(DEFAULT_SERVER_PORT);

    let timeout_secs = grading
      .timeout_secs
      .or_else(|| env("GRADING_TIMEOUT_SECS").and_then(|t| t.parse().ok()))
      .unwrap_or(DEFAULT_GRADING_TIMEOUT_SECS);

    let api_key = env("GEMINI_API_KEY").filter(|k| !k.is_empty());
    if api_key.is_none() {
      tracing::warn!("GEMINI_API_KEY is not set; grading requests will be rejected upstream");
    }

    Self {
      database_path: PathBuf::from(database_path),
      server_addr: server
        .addr
        .or_else(|| env("SERVER_ADDR"))
        .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string()),
      server_port,
      grading: GradingSettings {
        base_url: grading
          .base_url
          .or_else(|| env("GRADING_BASE_URL"))
          .unwrap_or_else(|| DEFAULT_GRADING_BASE_URL.to_string()),
        model: grading
          .model
          .or_else(|| env("GRADING_MODEL"))
          .unwrap_or_else(|| DEFAULT_GRADING_MODEL.to_string()),
        api_key,
        timeout: Duration::from_secs(timeout_secs),
      },
    }
  }

  /// Get the full server bind address
  pub fn bind_addr(&self) -> String {
    format!("{}:{}", self.server_addr, self.server_port)
  }
}
