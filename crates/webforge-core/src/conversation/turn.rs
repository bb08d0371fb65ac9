//! Conversation turn types.

use serde::{Deserialize, Serialize};

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnAuthor {
    /// Message from the user.
    User,
    /// Reply from the generation collaborator.
    Assistant,
}

impl std::fmt::Display for TurnAuthor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnAuthor::User => write!(f, "USER"),
            TurnAuthor::Assistant => write!(f, "ASSISTANT"),
        }
    }
}

/// A single entry in a conversation.
///
/// Turns are append-only: once stored they are never edited or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The author of the turn.
    pub author: TurnAuthor,
    /// The turn text.
    pub text: String,
    /// Timestamp when the turn was created (RFC 3339).
    pub created_at: String,
}

impl Turn {
    pub fn new(author: TurnAuthor, text: impl Into<String>) -> Self {
        Self {
            author,
            text: text.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnAuthor::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(TurnAuthor::Assistant, text)
    }
}
