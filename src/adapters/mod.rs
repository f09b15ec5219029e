//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Completion providers (OpenAI-compatible streaming, mock)
//! - `document` - Upload handling and text extraction
//! - `http` - JSON API over axum
//! - `storage` - Conversation stores (SQLite, in-memory)

pub mod ai;
pub mod document;
pub mod http;
pub mod storage;
