//! Conversation service: the per-message flow and conversation lifecycle.

use std::sync::Arc;
use std::time::Duration;
use webforge_core::conversation::{
    Artifact, ArtifactMerger, ConversationDocument, ConversationRepository, ConversationSummary,
    Turn,
};
use webforge_core::credential::SecretToken;
use webforge_core::generation::{DEFAULT_SESSION_ID, GenerationOutput, Generator};
use webforge_core::{Result, WebforgeError};

use crate::context::AppContext;
use crate::token_service::TokenService;

/// Result of a successful `post_message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMessageResponse {
    /// Display name after the merge
    pub effective_name: String,
    /// The assistant turn that was appended
    pub assistant_turn: Turn,
    /// The full artifact after the merge
    pub artifact: Artifact,
}

pub struct ConversationService {
    tokens: TokenService,
    conversations: Arc<dyn ConversationRepository>,
    generator: Arc<dyn Generator>,
    generation_timeout: Duration,
    fallback_credential: Option<SecretToken>,
}

impl ConversationService {
    pub fn new(context: &AppContext) -> Self {
        Self {
            tokens: TokenService::new(context),
            conversations: Arc::clone(&context.conversations),
            generator: Arc::clone(&context.generator),
            generation_timeout: context.generation_timeout,
            fallback_credential: context.fallback_credential.clone(),
        }
    }

    /// Handles one user message.
    ///
    /// Steps run in a fixed order: credential read, generation, document
    /// read, document write. Anything that fails before the write leaves the
    /// stored conversation untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the id is not a UUID or the message is blank
    /// - `Unauthorized` if the owner has no usable credential
    /// - `GenerationFailure` if generation fails or times out
    /// - `NotFound` if the conversation does not exist
    /// - `Persistence` if the store read or write fails
    pub async fn post_message(
        &self,
        owner_id: &str,
        conversation_id: &str,
        user_input: &str,
    ) -> Result<PostMessageResponse> {
        validate_id(conversation_id)?;
        if user_input.trim().is_empty() {
            return Err(WebforgeError::invalid_input("message must not be blank"));
        }

        tracing::info!(
            "[ConversationService] post_message owner={} conversation={}",
            owner_id,
            conversation_id
        );

        let credential = self.tokens.credential_for(owner_id).await?;

        let output = self
            .run_generation(user_input, conversation_id, &credential)
            .await?;
        drop(credential);

        let previous = self
            .conversations
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| WebforgeError::not_found("Conversation", conversation_id))?;

        let plan = ArtifactMerger::plan(&previous, user_input, &output);
        let assistant_turn = plan
            .assistant_turn()
            .cloned()
            .unwrap_or_else(|| Turn::assistant(output.explanation.clone()));

        let stored = self
            .conversations
            .atomic_append_turns_and_set_fields(conversation_id, &plan)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    "[ConversationService] Failed to persist merge for {}: {}",
                    conversation_id,
                    e
                )
            })?;

        if stored.display_name != previous.display_name {
            tracing::info!(
                "[ConversationService] Conversation {} renamed to '{}'",
                conversation_id,
                stored.display_name
            );
        }

        Ok(PostMessageResponse {
            effective_name: stored.display_name,
            assistant_turn,
            artifact: stored.artifact,
        })
    }

    /// Stateless generation with the shared fallback credential.
    ///
    /// No conversation is read or written.
    pub async fn generate_once(&self, user_input: &str) -> Result<GenerationOutput> {
        if user_input.trim().is_empty() {
            return Err(WebforgeError::invalid_input("message must not be blank"));
        }

        let credential = self
            .fallback_credential
            .as_ref()
            .ok_or_else(|| WebforgeError::unauthorized("no shared credential configured"))?;

        self.run_generation(user_input, DEFAULT_SESSION_ID, credential)
            .await
    }

    async fn run_generation(
        &self,
        user_input: &str,
        session_id: &str,
        credential: &SecretToken,
    ) -> Result<GenerationOutput> {
        let call = self.generator.generate(user_input, session_id, credential);

        match tokio::time::timeout(self.generation_timeout, call).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => {
                tracing::error!(
                    "[ConversationService] Generation failed for session {}: {:#}",
                    session_id,
                    e
                );
                Err(WebforgeError::generation(e.to_string()))
            }
            Err(_) => {
                tracing::error!(
                    "[ConversationService] Generation timed out after {:?} for session {}",
                    self.generation_timeout,
                    session_id
                );
                Err(WebforgeError::generation(format!(
                    "timed out after {}s",
                    self.generation_timeout.as_secs()
                )))
            }
        }
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Creates an empty conversation. A missing or blank name becomes
    /// "New Chat".
    pub async fn create_conversation(
        &self,
        owner_id: &str,
        display_name: Option<&str>,
    ) -> Result<ConversationDocument> {
        let document = ConversationDocument::new(owner_id, display_name);
        self.conversations.insert(&document).await?;

        tracing::info!(
            "[ConversationService] Created conversation {} ('{}') for {}",
            document.id,
            document.display_name,
            owner_id
        );
        Ok(document)
    }

    pub async fn get_conversation(&self, id: &str) -> Result<ConversationDocument> {
        validate_id(id)?;
        self.conversations
            .find_by_id(id)
            .await?
            .ok_or_else(|| WebforgeError::not_found("Conversation", id))
    }

    /// Summaries of the owner's conversations, newest first.
    pub async fn list_conversations(&self, owner_id: &str) -> Result<Vec<ConversationSummary>> {
        let mut documents = self.conversations.find_all_by_owner(owner_id).await?;
        documents.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(documents.iter().map(ConversationDocument::summary).collect())
    }

    pub async fn rename_conversation(
        &self,
        id: &str,
        display_name: &str,
    ) -> Result<ConversationDocument> {
        validate_id(id)?;
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(WebforgeError::invalid_input("display name must not be blank"));
        }

        let document = self.conversations.rename(id, display_name).await?;
        tracing::info!("[ConversationService] Renamed conversation {} to '{}'", id, display_name);
        Ok(document)
    }

    pub async fn delete_conversation(&self, id: &str) -> Result<()> {
        validate_id(id)?;
        self.conversations.delete(id).await?;
        tracing::info!("[ConversationService] Deleted conversation {}", id);
        Ok(())
    }
}

fn validate_id(id: &str) -> Result<()> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| WebforgeError::invalid_input(format!("Invalid conversation ID: {}", id)))
}
