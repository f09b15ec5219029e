//! In-Memory Conversation Store Adapter
//!
//! Keeps conversations in a map, with the history held in its encoded JSON
//! form exactly as the database adapter stores it. Useful for testing and
//! development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::locks::ConversationLocks;
use crate::domain::conversation::{
    decode_history_lenient, encode_history, Conversation, ConversationSummary, Topic, Turn,
};
use crate::domain::foundation::{ConversationId, Timestamp};
use crate::ports::{ConversationStore, StoreError};

#[derive(Debug, Clone)]
struct StoredConversation {
    topic: String,
    messages: String,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl StoredConversation {
    fn to_conversation(&self, id: ConversationId) -> Conversation {
        Conversation::reconstitute(
            id,
            Topic::from_stored(self.topic.clone()),
            decode_history_lenient(Some(&self.messages)),
            self.created_at,
            self.updated_at,
        )
    }
}

/// In-memory conversation store
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    rows: Arc<RwLock<HashMap<ConversationId, StoredConversation>>>,
    locks: Arc<ConversationLocks>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored conversations
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Replaces the stored history text of a conversation (corruption tests)
    pub async fn overwrite_raw_messages(&self, id: ConversationId, raw: impl Into<String>) {
        if let Some(row) = self.rows.write().await.get_mut(&id) {
            row.messages = raw.into();
        }
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, StoreError> {
        let rows = self.rows.read().await;
        let mut summaries: Vec<ConversationSummary> = rows
            .iter()
            .map(|(id, row)| ConversationSummary {
                id: *id,
                topic: row.topic.clone(),
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn create_conversation(&self, topic: Topic) -> Result<Conversation, StoreError> {
        let conversation = Conversation::new(topic);
        let messages = encode_history(conversation.messages())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.rows.write().await.insert(
            conversation.id(),
            StoredConversation {
                topic: conversation.topic().as_str().to_string(),
                messages,
                created_at: conversation.created_at(),
                updated_at: conversation.updated_at(),
            },
        );
        Ok(conversation)
    }

    async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, StoreError> {
        self.rows
            .read()
            .await
            .get(&id)
            .map(|row| row.to_conversation(id))
            .ok_or(StoreError::NotFound(id))
    }

    async fn append_turn(&self, id: ConversationId, turn: Turn) -> Result<Conversation, StoreError> {
        let _guard = self.locks.acquire(id).await;

        let mut conversation = self.get_conversation(id).await?;
        conversation.record_turn(turn, Timestamp::now());
        let messages = encode_history(conversation.messages())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        row.messages = messages;
        row.updated_at = conversation.updated_at();
        Ok(conversation)
    }

    async fn reset_all(&self) -> Result<(), StoreError> {
        self.rows.write().await.clear();
        Ok(())
    }
}
