//! In-memory session-history log.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use webforge_core::conversation::Turn;
use webforge_core::generation::SessionHistory;

#[derive(Default)]
pub struct InMemorySessionHistory {
    sessions: RwLock<HashMap<String, Vec<Turn>>>,
}

impl InMemorySessionHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionHistory for InMemorySessionHistory {
    async fn load(&self, session_id: &str) -> anyhow::Result<Vec<Turn>> {
        Ok(self
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(&self, session_id: &str, entries: &[Turn]) -> anyhow::Result<()> {
        self.sessions
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .extend(entries.iter().cloned());
        Ok(())
    }
}
