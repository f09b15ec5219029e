//! ListConversationsHandler - Query handler for the conversation sidebar.
//!
//! Listing never fails. A storage error yields an empty list with a notice
//! for the caller to display.

use std::sync::Arc;

use crate::domain::conversation::ConversationSummary;
use crate::ports::ConversationStore;

/// Notice shown when conversations could not be loaded.
pub const LIST_FAILURE_NOTICE: &str = "An error occurred while loading conversations.";

/// Result of listing conversations.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationListing {
    /// Most recently updated first.
    pub conversations: Vec<ConversationSummary>,
    pub notice: Option<String>,
}

/// Handler for listing conversations.
pub struct ListConversationsHandler {
    store: Arc<dyn ConversationStore>,
}

impl ListConversationsHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> ConversationListing {
        match self.store.list_conversations().await {
            Ok(conversations) => ConversationListing {
                conversations,
                notice: None,
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to list conversations");
                ConversationListing {
                    conversations: Vec::new(),
                    notice: Some(LIST_FAILURE_NOTICE.to_string()),
                }
            }
        }
    }
}
