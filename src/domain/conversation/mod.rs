//! Conversation domain module.
//!
//! A conversation is a topic plus an ordered list of user/assistant
//! messages, persisted as a single JSON blob.

mod conversation;
mod history;
mod message;
mod topic;

pub use conversation::{Conversation, ConversationSummary};
pub use history::{decode_history, decode_history_lenient, encode_history};
pub use message::{Message, Role, Turn};
pub use topic::{Topic, MAX_TOPIC_CHARS};
