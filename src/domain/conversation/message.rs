//! Message value objects for conversations.
//!
//! Messages are immutable `{role, content}` records. A chat turn always
//! appends one user message followed by one assistant message.

use serde::{Deserialize, Serialize};

/// Role of a message sender in a stored conversation.
///
/// Only user and assistant messages are ever persisted; any other role in a
/// stored history makes that history unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input.
    User,
    /// AI assistant response.
    Assistant,
}

impl Role {
    /// Returns the wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// An immutable message within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent the message.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// One user instruction together with the assistant reply it produced.
///
/// The pair is appended as a unit; there is no way to build a turn that
/// carries only one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    user: Message,
    assistant: Message,
}

impl Turn {
    /// Creates a turn from the instruction text and the generated reply.
    pub fn new(instruction: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            user: Message::user(instruction),
            assistant: Message::assistant(reply),
        }
    }

    /// The user side of the turn.
    pub fn user(&self) -> &Message {
        &self.user
    }

    /// The assistant side of the turn.
    pub fn assistant(&self) -> &Message {
        &self.assistant
    }

    /// Consumes the turn, yielding both messages in conversation order.
    pub fn into_messages(self) -> [Message; 2] {
        [self.user, self.assistant]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(Message::user("hi").role, Role::User);
        assert_eq!(Message::assistant("hello").role, Role::Assistant);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn system_role_is_not_a_stored_role() {
        let parsed: Result<Role, _> = serde_json::from_str("\"system\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn turn_yields_user_then_assistant() {
        let turn = Turn::new("What is MoA?", "Mixture of Agents.");
        assert_eq!(turn.user().content, "What is MoA?");
        assert_eq!(turn.assistant().content, "Mixture of Agents.");

        let [first, second] = turn.into_messages();
        assert_eq!(first.role, Role::User);
        assert_eq!(second.role, Role::Assistant);
    }
}
