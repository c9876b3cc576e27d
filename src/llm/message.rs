// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Message types for model interactions
//!
//! Defines the conversation structures exchanged with model backends and
//! persisted in sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single message in a conversation
///
/// Immutable once created; the id and timestamp are assigned at
/// construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier (`msg-<uuid4>`)
    pub id: String,

    /// Role of the message sender
    pub role: Role,

    /// Text content of the message
    pub content: String,

    /// When the message was created (ISO-8601 on the wire)
    pub timestamp: DateTime<Utc>,
}

/// Role of the message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant response
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl ChatMessage {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create an assistant message with a pre-allocated id
    ///
    /// Streaming responses allocate the message id before generation starts
    /// so that clients can persist the linkage from the opening `meta`
    /// event.
    pub fn assistant_with_id(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Allocate a fresh message id
pub fn new_message_id() -> String {
    format!("msg-{}", Uuid::new_v4())
}

/// A conversation: optional system prompt plus an ordered message history
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    /// System prompt sent with every request
    pub system_prompt: Option<String>,

    /// Messages in append order
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the system prompt
    pub fn set_system(&mut self, prompt: impl Into<String>) {
        self.system_prompt = Some(prompt.into());
    }

    /// Append a message
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Number of messages in the history
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_user() {
        let msg = ChatMessage::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
        assert!(msg.id.starts_with("msg-"));
    }

    #[test]
    fn test_message_assistant() {
        let msg = ChatMessage::assistant("Hi there");
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "Hi there");
    }

    #[test]
    fn test_message_assistant_with_id() {
        let msg = ChatMessage::assistant_with_id("msg-fixed", "text");
        assert_eq!(msg.id, "msg-fixed");
        assert_eq!(msg.role, Role::Assistant);
    }

    #[test]
    fn test_message_ids_unique() {
        let a = ChatMessage::user("one");
        let b = ChatMessage::user("two");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_role_serialization() {
        let msg = ChatMessage::user("Test");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"Test\""));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_message_roundtrip() {
        let msg = ChatMessage::assistant("structured text");
        let json = serde_json::to_string(&msg).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_conversation_push() {
        let mut conversation = Conversation::new();
        conversation.push(ChatMessage::user("First message"));
        conversation.push(ChatMessage::assistant("Response"));

        assert_eq!(conversation.len(), 2);
        assert!(!conversation.is_empty());
    }

    #[test]
    fn test_conversation_set_system() {
        let mut conversation = Conversation::new();
        conversation.set_system("You are a financial tutor.");

        assert_eq!(
            conversation.system_prompt,
            Some("You are a financial tutor.".to_string())
        );
    }
}
