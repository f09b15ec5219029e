//! Serialized form of a conversation's message history.
//!
//! The history is stored as one JSON array of `{role, content}` objects.
//! Reads are lenient: anything that does not parse as such an array is an
//! empty history. Stored text is only ever handed to the JSON parser.

use super::Message;

/// Encodes messages into the stored JSON form.
pub fn encode_history(messages: &[Message]) -> Result<String, serde_json::Error> {
    serde_json::to_string(messages)
}

/// Strictly decodes a stored history.
pub fn decode_history(raw: &str) -> Result<Vec<Message>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Decodes a stored history, treating missing or corrupt text as empty.
pub fn decode_history_lenient(raw: Option<&str>) -> Vec<Message> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Vec::new(),
    };

    match decode_history(raw) {
        Ok(messages) => messages,
        Err(e) => {
            tracing::warn!(error = %e, "Stored message history is unreadable, treating as empty");
            Vec::new()
        }
    }
}
