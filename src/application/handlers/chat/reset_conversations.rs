//! ResetConversationsHandler - deletes every conversation.

use std::sync::Arc;
use thiserror::Error;

use crate::ports::{ConversationStore, StoreError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResetConversationsError {
    #[error("Error resetting conversations: {0}")]
    Storage(#[from] StoreError),
}

/// Handler for the irreversible reset.
pub struct ResetConversationsHandler {
    store: Arc<dyn ConversationStore>,
}

impl ResetConversationsHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<(), ResetConversationsError> {
        self.store.reset_all().await?;
        tracing::warn!("All conversations have been reset");
        Ok(())
    }
}
