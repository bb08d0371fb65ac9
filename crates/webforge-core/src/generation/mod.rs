//! Generation collaborator contracts.
//!
//! The generation call and the session-history transport live outside the
//! domain. This module only fixes what the conversation service hands over
//! and what it gets back.

mod history;

pub use history::SessionHistory;

use crate::credential::SecretToken;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Session id used for stateless generation outside any conversation.
pub const DEFAULT_SESSION_ID: &str = "default";

/// A partial artifact plus the explanation to show as the assistant turn.
///
/// Missing or blank fields mean "leave unchanged"; see
/// [`crate::conversation::ArtifactUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub markup: Option<String>,
    pub styling: Option<String>,
    pub logic: Option<String>,
    pub explanation: String,
}

/// The external generation call.
///
/// Failures are opaque to the domain; the conversation service wraps them
/// into `GenerationFailure`.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generates a reply to `input`.
    ///
    /// # Arguments
    ///
    /// * `input` - The user's message
    /// * `session_id` - Key of the session-history log (the conversation id)
    /// * `credential` - Decrypted upstream API token, valid for this call only
    async fn generate(
        &self,
        input: &str,
        session_id: &str,
        credential: &SecretToken,
    ) -> anyhow::Result<GenerationOutput>;
}
