//! Chat command and query handlers.
//!
//! Conversation lifecycle (create, get, list, reset) and the chat turn that
//! generates a reply and appends it.

mod create_conversation;
mod get_conversation;
mod list_conversations;
mod reset_conversations;
mod response_generator;
mod send_instruction;

pub use create_conversation::{CreateConversationCommand, CreateConversationError, CreateConversationHandler};
pub use get_conversation::{GetConversationError, GetConversationHandler, GetConversationQuery};
pub use list_conversations::{ConversationListing, ListConversationsHandler, LIST_FAILURE_NOTICE};
pub use reset_conversations::{ResetConversationsError, ResetConversationsHandler};
pub use response_generator::{ResponseError, ResponseGenerator, DEFAULT_GENERATION_TIMEOUT};
pub use send_instruction::{
    SendInstructionCommand, SendInstructionError, SendInstructionHandler, SendInstructionResult,
};
