//! Text generation: provider trait + OpenAI-compatible chat completions client.
//! Errors are typed here and turned into user-facing strings by the resolver.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Single-turn request. No history is carried between calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API credential configured")]
    MissingCredential,

    #[error("generation timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Status(u16),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl GenerationError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::MissingCredential => "missing-credential",
            GenerationError::Timeout => "timeout",
            GenerationError::Transport(_) => "transport",
            GenerationError::Status(_) => "status",
            GenerationError::Malformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GenerationError::Timeout
        } else if e.is_decode() {
            GenerationError::Malformed(e.to_string())
        } else {
            GenerationError::Transport(e)
        }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the generated text (possibly empty) or a typed failure.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI Chat Completions client. The key is read once at startup; a missing
/// key only fails when a request is attempted.
pub struct OpenAiGenerator {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl OpenAiGenerator {
    pub fn new(
        api_key: Option<String>,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .user_agent("archana-assistant/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .map_err(GenerationError::Transport)?;
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        Ok(Self {
            http,
            api_key,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}
#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}
#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(GenerationError::Status(resp.status().as_u16()));
        }

        let bytes = resp.bytes().await?;
        parse_completion(&bytes)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Extract `choices[0].message.content`; a null content counts as empty output.
fn parse_completion(bytes: &[u8]) -> Result<String, GenerationError> {
    let body: Resp =
        serde_json::from_slice(bytes).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    let first = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::Malformed("no choices".to_string()))?;
    Ok(first.message.content.unwrap_or_default())
}

/// Deterministic generator for tests and local runs (`AI_TEST_MODE=mock`).
#[derive(Debug, Clone)]
pub struct MockGenerator {
    pub fixed: String,
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Ok(self.fixed.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
