//! Conversation Store Adapters
//!
//! Implementations of the ConversationStore port.
//!
//! ## Available Adapters
//!
//! - **SqliteConversationStore** - SQLite table with a JSON history column
//! - **InMemoryConversationStore** - Stores conversations in memory (testing/development)
//!
//! Both serialize appends per conversation id through [`ConversationLocks`].
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryConversationStore, SqliteConversationStore};
//!
//! // Production: file-backed SQLite
//! let store = SqliteConversationStore::connect("sqlite://instance/conversations.db?mode=rwc", 5).await?;
//!
//! // Testing: in-memory storage
//! let store = InMemoryConversationStore::new();
//! ```

mod in_memory_conversation_store;
mod locks;
mod sqlite_conversation_store;

pub use in_memory_conversation_store::InMemoryConversationStore;
pub use locks::ConversationLocks;
pub use sqlite_conversation_store::SqliteConversationStore;
