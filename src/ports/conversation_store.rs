//! Conversation store port.
//!
//! The store owns the canonical serialized history of every conversation.
//!
//! # Guarantees
//!
//! - `append_turn` writes both messages of a turn or neither
//! - concurrent appends to the same conversation are serialized
//! - unreadable stored history reads back as an empty list

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::{Conversation, ConversationSummary, Topic, Turn};
use crate::domain::foundation::ConversationId;

/// Persistence port for conversations.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// All conversations, most recently updated first.
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, StoreError>;

    /// Persists a new empty conversation.
    async fn create_conversation(&self, topic: Topic) -> Result<Conversation, StoreError>;

    /// Loads a conversation with its full history.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no conversation has this id
    async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, StoreError>;

    /// Appends a user/assistant pair and bumps `updated_at`.
    ///
    /// Returns the conversation as stored after the append.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no conversation has this id
    async fn append_turn(&self, id: ConversationId, turn: Turn) -> Result<Conversation, StoreError>;

    /// Deletes every conversation and recreates empty storage.
    async fn reset_all(&self) -> Result<(), StoreError>;
}

/// Conversation store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }
}
