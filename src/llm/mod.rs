//! The external generative-text collaborator.
//!
//! Only [`ChatCompletion`] is visible to the triage engine. Every failure is
//! an [`LlmError`] so the engine can fall back to the local rules.

pub mod client;
pub mod persona;

pub use client::{ChatCompletion, MockChatClient, OpenAiClient};
pub use persona::CARE_PERSONA;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("No API key configured")]
    NotConfigured,

    #[error("Cannot reach completion endpoint: {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Completion endpoint rejected credentials (status {0})")]
    Auth(u16),

    #[error("Completion endpoint returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Completion response contained no text")]
    EmptyResponse,

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl LlmError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Connection(_) => "connection",
            Self::Timeout(_) => "timeout",
            Self::Auth(_) => "auth",
            Self::Http { .. } => "http",
            Self::MalformedResponse(_) => "malformed",
            Self::EmptyResponse => "empty",
            Self::Client(_) => "client",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let errors = [
            LlmError::NotConfigured,
            LlmError::Connection("x".into()),
            LlmError::Timeout(10),
            LlmError::Auth(401),
            LlmError::Http { status: 500, body: String::new() },
            LlmError::MalformedResponse("x".into()),
            LlmError::EmptyResponse,
            LlmError::Client("x".into()),
        ];
        let kinds: std::collections::HashSet<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn timeout_message_names_duration() {
        assert_eq!(LlmError::Timeout(10).to_string(), "Request timed out after 10s");
    }
}
