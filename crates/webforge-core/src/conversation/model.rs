//! Conversation domain model.

use super::artifact::Artifact;
use super::turn::Turn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name a conversation carries until its first message renames it.
pub const DEFAULT_DISPLAY_NAME: &str = "New Chat";

/// A stored conversation: ordered turns plus the latest generated artifact.
///
/// This is the "pure" domain model that business logic operates on,
/// independent of any specific storage format.
///
/// Field order matters for TOML storage: plain values come before the
/// `artifact` table and the `turns` array of tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationDocument {
    /// Unique conversation identifier (UUID format)
    pub id: String,
    /// Owning user identifier
    pub owner_id: String,
    /// Human-readable name shown in conversation lists
    pub display_name: String,
    /// Timestamp when the conversation was created (RFC 3339)
    pub created_at: String,
    /// Timestamp when the conversation was last updated (RFC 3339)
    pub updated_at: String,
    /// Latest generated output
    #[serde(default)]
    pub artifact: Artifact,
    /// Chronological, append-only turn log
    #[serde(default)]
    pub turns: Vec<Turn>,
}

impl ConversationDocument {
    /// Creates an empty conversation for `owner_id`.
    ///
    /// A missing or blank name falls back to [`DEFAULT_DISPLAY_NAME`].
    pub fn new(owner_id: impl Into<String>, display_name: Option<&str>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_DISPLAY_NAME)
            .to_string();

        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            display_name,
            created_at: now.clone(),
            updated_at: now,
            artifact: Artifact::default(),
            turns: Vec::new(),
        }
    }

    /// Whether the display name is still the unrenamed sentinel.
    pub fn has_default_name(&self) -> bool {
        self.display_name == DEFAULT_DISPLAY_NAME
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// List projection of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub display_name: String,
}
