//! Answer grading through an external text-completion service.

pub mod client;
pub mod response;
pub mod transport;

pub use client::{GradingClient, GradingError, RetryPolicy};
pub use response::{grading_prompt, parse_grading_response};
pub use transport::{CompletionTransport, GeminiTransport, TransportError};
