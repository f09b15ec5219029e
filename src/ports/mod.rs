//! Ports (interfaces) for external dependencies.
//!
//! - `ConversationStore` - Conversation persistence
//! - `CompletionProvider` - Streaming language-model completions
//! - `DocumentExtractor` - Text extraction from uploaded files

mod completion_provider;
mod conversation_store;
mod document_extractor;

pub use completion_provider::{
    CompletionError, CompletionMessage, CompletionProvider, CompletionRequest, CompletionStream,
    FinishReason, MessageRole, ProviderInfo, StreamChunk,
};
pub use conversation_store::{ConversationStore, StoreError};
pub use document_extractor::{DocumentExtractor, ExtractionError};
