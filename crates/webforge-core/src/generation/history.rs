//! Session-history log trait.

use crate::conversation::Turn;
use async_trait::async_trait;

/// Append-only, session-keyed log of prior exchanges.
///
/// Only the generation collaborator reads and writes it; the conversation
/// service never does.
#[async_trait]
pub trait SessionHistory: Send + Sync {
    /// Returns every entry for `session_id` in append order. An unknown
    /// session yields an empty log.
    async fn load(&self, session_id: &str) -> anyhow::Result<Vec<Turn>>;

    /// Appends `entries` in order after the existing ones.
    async fn append(&self, session_id: &str, entries: &[Turn]) -> anyhow::Result<()>;
}
