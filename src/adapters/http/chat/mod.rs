//! HTTP adapter for the chat API.
//!
//! Exposes conversation management and chat turns as JSON endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    BrandingView, ConversationListView, ConversationSummaryView, ConversationView,
    CreateConversationRequest, ErrorResponse, MessageView, SendInstructionRequest, TurnView,
};
pub use handlers::{ChatApiError, ChatAppState};
pub use routes::{chat_router, chat_routes};
