//! Text-completion transport used by the grading client.
//!
//! The grading client only needs `prompt -> raw text`; this module defines
//! that seam and the HTTP implementation for the Gemini `generateContent`
//! endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::config::GradingSettings;

/// Failure reported by a completion transport
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
  /// The service is temporarily overloaded; the call may succeed later
  #[error("service overloaded: {0}")]
  Overloaded(String),

  /// Anything else: bad credentials, network failure, unexpected payload
  #[error("{0}")]
  Failed(String),
}

/// One prompt in, one block of generated text out
#[async_trait]
pub trait CompletionTransport: Send + Sync {
  async fn complete(&self, prompt: &str) -> Result<String, TransportError>;
}

/// Statuses the grading service uses to signal overload
pub fn is_overload_status(status: StatusCode) -> bool {
  status == StatusCode::SERVICE_UNAVAILABLE || status.as_u16() == 529
}

/// HTTP transport for the Gemini `generateContent` API
pub struct GeminiTransport {
  client: Client,
  base_url: String,
  model: String,
  api_key: Option<String>,
}

impl GeminiTransport {
  pub fn new(settings: &GradingSettings) -> Result<Self, TransportError> {
    let client = Client::builder()
      .timeout(settings.timeout)
      .build()
      .map_err(|e| TransportError::Failed(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      base_url: settings.base_url.trim_end_matches('/').to_string(),
      model: settings.model.clone(),
      api_key: settings.api_key.clone(),
    })
  }

  fn endpoint(&self) -> String {
    format!("{}/models/{}:generateContent", self.base_url, self.model)
  }

  fn build_request(prompt: &str) -> Value {
    json!({
      "contents": [
        { "parts": [ { "text": prompt } ] }
      ],
      "generationConfig": {
        "temperature": 0.7,
        "topK": 40,
        "topP": 0.8,
        "maxOutputTokens": 4000
      }
    })
  }

  /// Pull the generated text out of the response envelope
  fn extract_text(body: &Value) -> Option<String> {
    body["candidates"][0]["content"]["parts"][0]["text"]
      .as_str()
      .map(str::to_string)
  }
}

#[async_trait]
impl CompletionTransport for GeminiTransport {
  async fn complete(&self, prompt: &str) -> Result<String, TransportError> {
    let api_key = self
      .api_key
      .as_deref()
      .ok_or_else(|| TransportError::Failed("GEMINI_API_KEY not set".to_string()))?;

    tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Sending grading request");

    let response = self
      .client
      .post(self.endpoint())
      .header("x-goog-api-key", api_key)
      .json(&Self::build_request(prompt))
      .send()
      .await
      .map_err(|e| TransportError::Failed(format!("Request failed: {}", e)))?;

    let status = response.status();
    if is_overload_status(status) {
      return Err(TransportError::Overloaded(format!("HTTP {}", status.as_u16())));
    }

    if !status.is_success() {
      let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
      return Err(TransportError::Failed(format!("API error {}: {}", status, error_body)));
    }

    let body: Value = response
      .json()
      .await
      .map_err(|e| TransportError::Failed(format!("Failed to parse response: {}", e)))?;

    Self::extract_text(&body)
      .ok_or_else(|| TransportError::Failed("Response has no candidate text".to_string()))
  }
}
