//! Conversation repository trait.
//!
//! Defines the interface for conversation persistence operations.

use super::merge::MergePlan;
use super::model::ConversationDocument;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract document store for conversations.
///
/// This trait decouples the conversation service from the specific storage
/// mechanism (TOML files, in-memory maps, a remote document database).
///
/// # Implementation Notes
///
/// `atomic_append_turns_and_set_fields` must be atomic at single-document
/// granularity: the plan is applied to the store's current copy of the
/// document, never to a copy the caller read earlier, so concurrent appends
/// to the same conversation are all kept.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Finds a conversation by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(doc))`: Conversation found
    /// - `Ok(None)`: Conversation not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, id: &str) -> Result<Option<ConversationDocument>>;

    /// Lists every conversation owned by `owner_id`.
    async fn find_all_by_owner(&self, owner_id: &str) -> Result<Vec<ConversationDocument>>;

    /// Stores a newly created conversation.
    async fn insert(&self, document: &ConversationDocument) -> Result<()>;

    /// Sets the display name explicitly.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the conversation does not exist.
    async fn rename(&self, id: &str, display_name: &str) -> Result<ConversationDocument>;

    /// Deletes a conversation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the conversation does not exist.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Appends the plan's turns and replaces its artifact fields in one
    /// atomic single-document update.
    ///
    /// # Returns
    ///
    /// - `Ok(doc)`: The document as stored after the update
    /// - `Err(NotFound)`: The conversation no longer exists; nothing was written
    /// - `Err(_)`: Error occurred during the update; nothing was written
    async fn atomic_append_turns_and_set_fields(
        &self,
        id: &str,
        plan: &MergePlan,
    ) -> Result<ConversationDocument>;
}
