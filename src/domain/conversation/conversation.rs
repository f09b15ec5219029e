//! Conversation aggregate.
//!
//! A conversation is a topic plus an ordered message history. History only
//! grows, one complete turn at a time.

use serde::Serialize;

use super::{Message, Topic, Turn};
use crate::domain::foundation::{ConversationId, Timestamp};

/// A persisted chat thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    id: ConversationId,
    topic: Topic,
    messages: Vec<Message>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Conversation {
    /// Starts a new, empty conversation.
    pub fn new(topic: Topic) -> Self {
        let now = Timestamp::now();
        Self {
            id: ConversationId::new(),
            topic,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a conversation from stored fields.
    pub fn reconstitute(
        id: ConversationId,
        topic: Topic,
        messages: Vec<Message>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            topic,
            messages,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Appends both sides of a turn and marks the conversation active at `at`.
    ///
    /// `updated_at` never moves backwards.
    pub fn record_turn(&mut self, turn: Turn, at: Timestamp) {
        self.messages.extend(turn.into_messages());
        if self.updated_at.is_before(&at) {
            self.updated_at = at;
        }
    }

    /// The history a completion call should see for a new instruction.
    pub fn history_with(&self, next: &Message) -> Vec<Message> {
        let mut history = Vec::with_capacity(self.messages.len() + 1);
        history.extend_from_slice(&self.messages);
        history.push(next.clone());
        history
    }

    /// Listing view of this conversation.
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id,
            topic: self.topic.as_str().to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Conversation metadata without its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub topic: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Role;
    use std::thread::sleep;
    use std::time::Duration;

    fn topic() -> Topic {
        Topic::new("Ownership in Rust").unwrap()
    }

    #[test]
    fn new_conversation_is_empty() {
        let conversation = Conversation::new(topic());
        assert!(conversation.messages().is_empty());
        assert_eq!(conversation.created_at(), conversation.updated_at());
    }

    #[test]
    fn record_turn_appends_pair_in_order() {
        let mut conversation = Conversation::new(topic());
        conversation.record_turn(Turn::new("first", "reply one"), Timestamp::now());
        conversation.record_turn(Turn::new("second", "reply two"), Timestamp::now());

        let roles: Vec<Role> = conversation.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(conversation.messages()[2].content, "second");
    }

    #[test]
    fn record_turn_bumps_updated_at() {
        let mut conversation = Conversation::new(topic());
        let created = conversation.created_at();
        sleep(Duration::from_millis(10));

        conversation.record_turn(Turn::new("q", "a"), Timestamp::now());

        assert!(created.is_before(&conversation.updated_at()));
        assert_eq!(conversation.created_at(), created);
    }

    #[test]
    fn record_turn_never_moves_updated_at_backwards() {
        let earlier = Timestamp::now();
        sleep(Duration::from_millis(10));
        let mut conversation = Conversation::new(topic());
        let updated = conversation.updated_at();

        conversation.record_turn(Turn::new("q", "a"), earlier);

        assert_eq!(conversation.updated_at(), updated);
    }

    #[test]
    fn history_with_appends_without_mutating() {
        let mut conversation = Conversation::new(topic());
        conversation.record_turn(Turn::new("q", "a"), Timestamp::now());

        let history = conversation.history_with(&Message::user("next"));

        assert_eq!(history.len(), 3);
        assert_eq!(history[2], Message::user("next"));
        assert_eq!(conversation.messages().len(), 2);
    }

    #[test]
    fn summary_carries_metadata() {
        let conversation = Conversation::new(topic());
        let summary = conversation.summary();
        assert_eq!(summary.id, conversation.id());
        assert_eq!(summary.topic, "Ownership in Rust");
        assert_eq!(summary.updated_at, conversation.updated_at());
    }
}
