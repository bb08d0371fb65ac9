//! In-memory document store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use webforge_core::conversation::{ConversationDocument, ConversationRepository, MergePlan};
use webforge_core::credential::{CredentialRecord, CredentialRepository};
use webforge_core::{Result, WebforgeError};

/// Keeps conversations and credentials in process memory.
///
/// Updates run under the map's write lock, which gives the same
/// single-document atomicity as the file store. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    conversations: Arc<RwLock<HashMap<String, ConversationDocument>>>,
    credentials: Arc<RwLock<HashMap<String, CredentialRecord>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn conversation_count(&self) -> usize {
        self.conversations.read().await.len()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryDocumentStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<ConversationDocument>> {
        Ok(self.conversations.read().await.get(id).cloned())
    }

    async fn find_all_by_owner(&self, owner_id: &str) -> Result<Vec<ConversationDocument>> {
        let conversations = self.conversations.read().await;
        Ok(conversations
            .values()
            .filter(|doc| doc.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, document: &ConversationDocument) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        if conversations.contains_key(&document.id) {
            return Err(WebforgeError::persistence(format!(
                "Conversation {} already exists",
                document.id
            )));
        }
        conversations.insert(document.id.clone(), document.clone());
        Ok(())
    }

    async fn rename(&self, id: &str, display_name: &str) -> Result<ConversationDocument> {
        let mut conversations = self.conversations.write().await;
        let doc = conversations
            .get_mut(id)
            .ok_or_else(|| WebforgeError::not_found("Conversation", id))?;
        doc.display_name = display_name.to_string();
        doc.touch();
        Ok(doc.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.conversations
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| WebforgeError::not_found("Conversation", id))
    }

    async fn atomic_append_turns_and_set_fields(
        &self,
        id: &str,
        plan: &MergePlan,
    ) -> Result<ConversationDocument> {
        let mut conversations = self.conversations.write().await;
        let doc = conversations
            .get_mut(id)
            .ok_or_else(|| WebforgeError::not_found("Conversation", id))?;
        plan.apply(doc);
        Ok(doc.clone())
    }
}

#[async_trait]
impl CredentialRepository for InMemoryDocumentStore {
    async fn find_credential(&self, owner_id: &str) -> Result<Option<CredentialRecord>> {
        Ok(self.credentials.read().await.get(owner_id).cloned())
    }

    async fn upsert_credential(&self, owner_id: &str, ciphertext: &[u8]) -> Result<()> {
        self.credentials.write().await.insert(
            owner_id.to_string(),
            CredentialRecord::new(owner_id, ciphertext.to_vec()),
        );
        Ok(())
    }
}
