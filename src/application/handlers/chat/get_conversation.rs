//! GetConversationHandler - Query handler for one conversation with history.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, StoreError};

/// Query to get a conversation.
#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub conversation_id: ConversationId,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GetConversationError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Error loading conversation: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for GetConversationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => GetConversationError::NotFound(id),
            other => GetConversationError::Storage(other),
        }
    }
}

/// Handler for getting conversations.
pub struct GetConversationHandler {
    store: Arc<dyn ConversationStore>,
}

impl GetConversationHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetConversationQuery) -> Result<Conversation, GetConversationError> {
        Ok(self.store.get_conversation(query.conversation_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::domain::conversation::{Topic, Turn};

    #[tokio::test]
    async fn returns_conversation_with_history() {
        let store = Arc::new(InMemoryConversationStore::new());
        let id = store.create_conversation(Topic::new("t").unwrap()).await.unwrap().id();
        store.append_turn(id, Turn::new("q", "a")).await.unwrap();
        let handler = GetConversationHandler::new(store);

        let conversation = handler.handle(GetConversationQuery { conversation_id: id }).await.unwrap();

        assert_eq!(conversation.messages().len(), 2);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let handler = GetConversationHandler::new(Arc::new(InMemoryConversationStore::new()));
        let id = ConversationId::new();

        let result = handler.handle(GetConversationQuery { conversation_id: id }).await;

        assert_eq!(result, Err(GetConversationError::NotFound(id)));
    }
}
