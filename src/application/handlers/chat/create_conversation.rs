//! CreateConversationHandler - starts a new, empty conversation.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::conversation::{Conversation, Topic};
use crate::domain::foundation::ValidationError;
use crate::ports::{ConversationStore, StoreError};

/// Command to create a conversation.
#[derive(Debug, Clone)]
pub struct CreateConversationCommand {
    /// Raw topic text as entered by the user.
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CreateConversationError {
    #[error("Please provide a conversation topic.")]
    Validation(#[from] ValidationError),

    #[error("Error creating conversation: {0}")]
    Storage(#[from] StoreError),
}

/// Handler for creating conversations.
pub struct CreateConversationHandler {
    store: Arc<dyn ConversationStore>,
}

impl CreateConversationHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: CreateConversationCommand) -> Result<Conversation, CreateConversationError> {
        let topic = Topic::new(&cmd.topic)?;
        let conversation = self.store.create_conversation(topic).await?;

        tracing::info!(conversation_id = %conversation.id(), "Conversation started");
        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::domain::conversation::MAX_TOPIC_CHARS;

    fn handler() -> (CreateConversationHandler, Arc<InMemoryConversationStore>) {
        let store = Arc::new(InMemoryConversationStore::new());
        (CreateConversationHandler::new(store.clone()), store)
    }

    fn cmd(topic: &str) -> CreateConversationCommand {
        CreateConversationCommand { topic: topic.to_string() }
    }

    #[tokio::test]
    async fn creates_empty_conversation() {
        let (handler, store) = handler();

        let conversation = handler.handle(cmd("  Weekend plans ")).await.unwrap();

        assert_eq!(conversation.topic().as_str(), "Weekend plans");
        assert!(conversation.messages().is_empty());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn rejects_blank_topic_without_storing() {
        let (handler, store) = handler();

        let result = handler.handle(cmd("   ")).await;

        assert!(matches!(result, Err(CreateConversationError::Validation(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn truncates_long_topic() {
        let (handler, _) = handler();

        let conversation = handler.handle(cmd(&"x".repeat(500))).await.unwrap();

        assert_eq!(conversation.topic().as_str().chars().count(), MAX_TOPIC_CHARS);
    }
}
