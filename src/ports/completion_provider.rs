//! Completion Provider Port - Interface for streaming LLM completions.
//!
//! This port abstracts the third-party completion service so the chat turn
//! can be driven without coupling to a specific vendor API.
//!
//! # Design
//!
//! - Streaming only: replies arrive as ordered text fragments
//! - Provider-agnostic message format with a `system` role for prompts
//! - Optional Mixture-of-Agents references folded into a system message

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::time::Duration;

use crate::domain::conversation::{Message, Role};
use crate::domain::generation::{aggregator_system_prompt, GenerationParams, MaxTokens, ModelId, Temperature};

/// Ordered stream of reply fragments.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, CompletionError>> + Send>>;

/// Port for streaming completion services.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Starts a streaming completion.
    ///
    /// Errors returned here happen before any fragment is produced; errors
    /// inside the stream abort the reply mid-way.
    async fn stream_complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, CompletionError>;

    /// Get provider information.
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for a streamed completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: ModelId,
    pub temperature: Temperature,
    pub max_tokens: MaxTokens,
    /// Conversation history ending with the new user message.
    pub messages: Vec<CompletionMessage>,
    /// Earlier model answers for the aggregator to synthesize.
    pub references: Vec<String>,
}

impl CompletionRequest {
    /// Creates a request from normalized parameters and a stored history.
    pub fn new(params: GenerationParams, history: &[Message]) -> Self {
        Self {
            model: params.model,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            messages: history.iter().map(CompletionMessage::from).collect(),
            references: Vec::new(),
        }
    }

    /// Sets the reference answers to aggregate.
    pub fn with_references(mut self, references: Vec<String>) -> Self {
        self.references = references;
        self
    }

    /// Messages as they go on the wire, with the aggregator prompt first
    /// when references are present.
    pub fn wire_messages(&self) -> Vec<CompletionMessage> {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        if let Some(prompt) = aggregator_system_prompt(&self.references) {
            messages.push(CompletionMessage::system(prompt));
        }
        messages.extend(self.messages.iter().cloned());
        messages
    }
}

/// A message sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: MessageRole,
    pub content: String,
}

impl CompletionMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }
}

impl From<&Message> for CompletionMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        };
        Self::new(role, message.content.clone())
    }
}

/// Role of the message sender on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions (guides model behavior).
    System,
    /// User input.
    User,
    /// Assistant (model) response.
    Assistant,
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
}

/// Streaming chunk from a completion.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamChunk {
    /// New content in this chunk. May be empty.
    pub delta: String,
    /// If present, generation is complete.
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    /// Creates a content chunk.
    pub fn content(delta: impl Into<String>) -> Self {
        Self {
            delta: delta.into(),
            finish_reason: None,
        }
    }

    /// Creates a final chunk.
    pub fn final_chunk(finish_reason: FinishReason) -> Self {
        Self {
            delta: String::new(),
            finish_reason: Some(finish_reason),
        }
    }

    /// Returns true if this is the final chunk.
    pub fn is_final(&self) -> bool {
        self.finish_reason.is_some()
    }
}

/// Provider information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "together", "mock").
    pub name: String,
    /// Endpoint the provider talks to.
    pub base_url: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }
}

/// Completion provider errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompletionError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Provider rejected the request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network error during request or while streaming.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The completion did not finish in time.
    #[error("request timed out after {after:?}")]
    Timeout { after: Duration },
}

impl CompletionError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }
}
