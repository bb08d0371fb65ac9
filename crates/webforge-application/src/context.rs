//! Process-wide handles shared by the services.

use std::sync::Arc;
use std::time::Duration;
use webforge_core::conversation::ConversationRepository;
use webforge_core::credential::{CredentialRepository, CredentialVault, SecretToken};
use webforge_core::generation::Generator;

/// Default upper bound for a single generation call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything the services need, built once by the composition root and
/// handed to each service at construction.
#[derive(Clone)]
pub struct AppContext {
    pub credentials: Arc<dyn CredentialRepository>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub vault: Arc<dyn CredentialVault>,
    pub generator: Arc<dyn Generator>,
    pub generation_timeout: Duration,
    /// Shared credential for stateless generation. Never used for
    /// conversation posts.
    pub fallback_credential: Option<SecretToken>,
}

impl AppContext {
    pub fn new(
        credentials: Arc<dyn CredentialRepository>,
        conversations: Arc<dyn ConversationRepository>,
        vault: Arc<dyn CredentialVault>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            credentials,
            conversations,
            vault,
            generator,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            fallback_credential: None,
        }
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_fallback_credential(mut self, credential: Option<SecretToken>) -> Self {
        self.fallback_credential = credential.filter(|token| !token.is_empty());
        self
    }
}
