//! Transcript — the ordered human/assistant messages of one session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Ai,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Ai => write!(f, "ai"),
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn human(content: impl Into<String>) -> Self {
        Self::new(Role::Human, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(Role::Ai, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Append-only message list, never empty.
///
/// Starts with a single assistant greeting and can only grow, except for
/// [`Transcript::reset`], which goes back to that greeting.
#[derive(Debug, Clone)]
pub struct Transcript {
    greeting: String,
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new(greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        Self {
            messages: vec![Message::ai(greeting.clone())],
            greeting,
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Drop everything and re-seed the greeting.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(Message::ai(self.greeting.clone()));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when no messages are held. A transcript always holds the greeting.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
