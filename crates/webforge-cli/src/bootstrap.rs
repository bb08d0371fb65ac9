//! Composition root: turns a loaded configuration into an `AppContext`.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use webforge_application::AppContext;
use webforge_core::conversation::ConversationRepository;
use webforge_core::credential::{CredentialRepository, SecretToken};
use webforge_core::generation::SessionHistory;
use webforge_infrastructure::{
    FileDocumentStore, GeminiGenerator, JsonlSessionHistory, KeyStore, LoadedConfig,
    RsaCredentialVault,
};

/// Builds every process-wide handle.
///
/// The key pair is loaded first; if it cannot be loaded no command that
/// touches credentials may run.
pub async fn build_context(loaded: &LoadedConfig) -> Result<AppContext> {
    let keys = KeyStore::load(loaded.public_key_path(), loaded.private_key_path())
        .context("Vault key pair could not be loaded (run `webforge keygen` to create one)")?;
    let vault = Arc::new(RsaCredentialVault::new(Arc::new(keys)));

    let store = Arc::new(
        FileDocumentStore::new(&loaded.data_dir)
            .await
            .context("Failed to open document store")?,
    );
    let credentials: Arc<dyn CredentialRepository> = store.clone();
    let conversations: Arc<dyn ConversationRepository> = store;

    let history: Arc<dyn SessionHistory> = Arc::new(JsonlSessionHistory::new(loaded.history_dir()));
    let generation = &loaded.config.generation;
    let generator = Arc::new(GeminiGenerator::new(generation.clone(), history)?);

    tracing::debug!(
        "[Bootstrap] data_dir={} model={}",
        loaded.data_dir.display(),
        generation.model
    );

    Ok(AppContext::new(credentials, conversations, vault, generator)
        .with_generation_timeout(Duration::from_secs(generation.timeout_secs))
        .with_fallback_credential(generation.fallback_api_key.clone().map(SecretToken::new)))
}
