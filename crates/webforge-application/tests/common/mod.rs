#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use webforge_application::AppContext;
use webforge_core::Result;
use webforge_core::conversation::{ConversationDocument, ConversationRepository, MergePlan};
use webforge_core::credential::{CredentialRepository, SecretToken};
use webforge_core::generation::{GenerationOutput, Generator};
use webforge_infrastructure::{InMemoryDocumentStore, KeyStore, RsaCredentialVault};

pub const PUBLIC_PEM: &str =
    include_str!("../../../webforge-infrastructure/tests/fixtures/test_public.pem");
pub const PRIVATE_PEM: &str =
    include_str!("../../../webforge-infrastructure/tests/fixtures/test_private_pkcs8.pem");

pub fn vault() -> Arc<RsaCredentialVault> {
    let keys = KeyStore::from_pem(PUBLIC_PEM, PRIVATE_PEM).unwrap();
    Arc::new(RsaCredentialVault::new(Arc::new(keys)))
}

/// What the mock generator does when called.
#[derive(Clone)]
pub enum Behavior {
    Reply(GenerationOutput),
    Fail(String),
    Hang(Duration),
}

/// Generator double that records every call.
pub struct MockGenerator {
    behavior: Behavior,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String, String)>>,
}

impl MockGenerator {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(
        markup: Option<&str>,
        styling: Option<&str>,
        logic: Option<&str>,
        explanation: &str,
    ) -> Self {
        Self::new(Behavior::Reply(GenerationOutput {
            markup: markup.map(str::to_string),
            styling: styling.map(str::to_string),
            logic: logic.map(str::to_string),
            explanation: explanation.to_string(),
        }))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (input, session id, credential) for each call.
    pub async fn seen(&self) -> Vec<(String, String, String)> {
        self.seen.lock().await.clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(
        &self,
        input: &str,
        session_id: &str,
        credential: &SecretToken,
    ) -> anyhow::Result<GenerationOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().await.push((
            input.to_string(),
            session_id.to_string(),
            credential.expose().to_string(),
        ));

        match &self.behavior {
            Behavior::Reply(output) => Ok(output.clone()),
            Behavior::Fail(message) => Err(anyhow::anyhow!(message.clone())),
            Behavior::Hang(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(GenerationOutput::default())
            }
        }
    }
}

/// Conversation repository wrapper that counts writes.
pub struct CountingStore {
    inner: InMemoryDocumentStore,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: InMemoryDocumentStore) -> Self {
        Self {
            inner,
            writes: AtomicUsize::new(0),
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversationRepository for CountingStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<ConversationDocument>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all_by_owner(&self, owner_id: &str) -> Result<Vec<ConversationDocument>> {
        self.inner.find_all_by_owner(owner_id).await
    }

    async fn insert(&self, document: &ConversationDocument) -> Result<()> {
        self.inner.insert(document).await
    }

    async fn rename(&self, id: &str, display_name: &str) -> Result<ConversationDocument> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.rename(id, display_name).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }

    async fn atomic_append_turns_and_set_fields(
        &self,
        id: &str,
        plan: &MergePlan,
    ) -> Result<ConversationDocument> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.atomic_append_turns_and_set_fields(id, plan).await
    }
}

/// A wired-up context over in-memory storage.
pub struct Harness {
    pub store: InMemoryDocumentStore,
    pub conversations: Arc<CountingStore>,
    pub generator: Arc<MockGenerator>,
    pub context: AppContext,
}

impl Harness {
    pub fn new(generator: MockGenerator) -> Self {
        let store = InMemoryDocumentStore::new();
        let conversations = Arc::new(CountingStore::new(store.clone()));
        let generator = Arc::new(generator);
        let credentials: Arc<dyn CredentialRepository> = Arc::new(store.clone());

        let context = AppContext::new(
            credentials,
            conversations.clone(),
            vault(),
            generator.clone(),
        );

        Self {
            store,
            conversations,
            generator,
            context,
        }
    }
}
