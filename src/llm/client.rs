use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::LlmError;
use crate::config::{AppConfig, DEFAULT_LLM_TIMEOUT_SECS};
use crate::models::ChatMessage;

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;

/// A chat-style text generator.
///
/// Implementations block until a reply arrives or their timeout expires.
pub trait ChatCompletion: Send + Sync {
    fn complete(
        &self,
        system: &str,
        history: &[ChatMessage],
        new_message: &str,
    ) -> Result<String, LlmError>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    /// Build a client. `timeout_secs` is clamped to `1..=10`.
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        let timeout_secs = timeout_secs.clamp(1, DEFAULT_LLM_TIMEOUT_SECS);
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    /// Client for the configured endpoint, or `None` when no key is set.
    pub fn from_config(config: &AppConfig) -> Option<Result<Self, LlmError>> {
        if !config.use_external_model() {
            return None;
        }
        Some(Self::new(
            &config.llm_base_url,
            &config.openai_api_key,
            &config.model,
            config.llm_timeout_secs,
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Request body for `/chat/completions`
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

/// Response body from `/chat/completions`
#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn build_messages<'a>(
    system: &'a str,
    history: &'a [ChatMessage],
    new_message: &'a str,
) -> Vec<WireMessage<'a>> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(WireMessage { role: "system", content: system });
    messages.extend(history.iter().map(|m| WireMessage {
        role: m.role.as_str(),
        content: &m.content,
    }));
    messages.push(WireMessage { role: "user", content: new_message });
    messages
}

fn extract_reply(parsed: CompletionResponse) -> Result<String, LlmError> {
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(LlmError::EmptyResponse)?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(trimmed.to_string())
}

impl ChatCompletion for OpenAiClient {
    fn complete(
        &self,
        system: &str,
        history: &[ChatMessage],
        new_message: &str,
    ) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::NotConfigured);
        }

        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &self.model,
            messages: build_messages(system, history, new_message),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    LlmError::Connection(self.base_url.clone())
                } else {
                    LlmError::Client(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(LlmError::Auth(status.as_u16()));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.timeout_secs)
            } else {
                LlmError::MalformedResponse(e.to_string())
            }
        })?;

        extract_reply(parsed)
    }
}

/// Scripted stand-in for tests and offline runs.
pub struct MockChatClient {
    outcome: Result<String, LlmError>,
    calls: Mutex<Vec<usize>>,
}

impl MockChatClient {
    /// Always answers with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            outcome: Ok(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with `error`.
    pub fn failing(error: LlmError) -> Self {
        Self {
            outcome: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// History length seen by each call so far.
    pub fn history_lengths(&self) -> Vec<usize> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ChatCompletion for MockChatClient {
    fn complete(
        &self,
        _system: &str,
        history: &[ChatMessage],
        _new_message: &str,
    ) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(history.len());
        }
        self.outcome.clone()
    }
}
