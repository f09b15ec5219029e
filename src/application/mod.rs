//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (create, send instruction, reset) are kept apart from
//! query handlers (get, list).

pub mod handlers;

pub use handlers::chat::{
    ConversationListing, CreateConversationCommand, CreateConversationError, CreateConversationHandler,
    GetConversationError, GetConversationHandler, GetConversationQuery, ListConversationsHandler,
    ResetConversationsError, ResetConversationsHandler, ResponseError, ResponseGenerator,
    SendInstructionCommand, SendInstructionError, SendInstructionHandler, SendInstructionResult,
};
