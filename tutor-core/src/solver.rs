//! Problem-solver conversation.

use crate::subject::Subject;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shown when a solve request fails.
pub const SOLVE_ERROR_TEXT: &str =
    "Sorry, something went wrong while contacting the tutor. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Tutor,
}

/// One entry in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub is_error: bool,
}

impl ChatMessage {
    fn new(role: ChatRole, text: impl Into<String>, is_error: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            is_error,
        }
    }
}

/// The solver transcript for one subject.
#[derive(Debug, Clone)]
pub struct Conversation {
    subject: Subject,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Start a conversation with the tutor's greeting.
    pub fn new(subject: Subject) -> Self {
        let welcome = format!(
            "Hi! I'm your {} tutor. Type a problem and I'll solve it step by step.",
            subject.name()
        );
        Self {
            subject,
            messages: vec![ChatMessage::new(ChatRole::Tutor, welcome, false)],
        }
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::new(ChatRole::User, text, false))
    }

    pub fn push_reply(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::new(ChatRole::Tutor, text, false))
    }

    /// Append the fixed apology for a failed request.
    pub fn push_error(&mut self) -> &ChatMessage {
        self.push(ChatMessage::new(ChatRole::Tutor, SOLVE_ERROR_TEXT, true))
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}
