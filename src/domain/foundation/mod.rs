//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, and the error vocabulary shared by every layer.

mod errors;
mod ids;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::ConversationId;
pub use timestamp::Timestamp;
