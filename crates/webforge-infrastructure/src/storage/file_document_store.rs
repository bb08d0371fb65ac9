//! File-backed document store for conversations and credentials.
//!
//! Directory structure:
//! ```text
//! data_dir/
//! ├── conversations/
//! │   ├── <uuid>.toml
//! │   └── <uuid>.lock
//! └── credentials/
//!     ├── <base64url(owner_id)>.toml
//!     └── <base64url(owner_id)>.lock
//! ```

use super::atomic_toml::{AtomicTomlError, AtomicTomlFile};
use crate::dto::CredentialFileV1;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::path::{Path, PathBuf};
use webforge_core::conversation::{ConversationDocument, ConversationRepository, MergePlan};
use webforge_core::credential::{CredentialRecord, CredentialRepository};
use webforge_core::{Result, WebforgeError};

const CONVERSATIONS_DIR: &str = "conversations";
const CREDENTIALS_DIR: &str = "credentials";

/// Stores each conversation and each credential record as its own TOML
/// document. Single-document updates are atomic through [`AtomicTomlFile`].
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    base_dir: PathBuf,
}

impl FileDocumentStore {
    /// Creates the store, creating its directories if needed.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        for dir in [CONVERSATIONS_DIR, CREDENTIALS_DIR] {
            tokio::fs::create_dir_all(base_dir.join(dir))
                .await
                .map_err(|e| {
                    WebforgeError::persistence(format!(
                        "Failed to create {}: {}",
                        base_dir.join(dir).display(),
                        e
                    ))
                })?;
        }

        tracing::debug!("[FileDocumentStore] Using {}", base_dir.display());
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn conversations_dir(&self) -> PathBuf {
        self.base_dir.join(CONVERSATIONS_DIR)
    }

    fn conversation_file(&self, id: &str) -> Result<AtomicTomlFile<ConversationDocument>> {
        // Ids become file names, so only canonical UUIDs are accepted.
        let parsed = uuid::Uuid::parse_str(id).map_err(|_| {
            WebforgeError::invalid_input(format!("Invalid conversation ID: {}", id))
        })?;
        Ok(AtomicTomlFile::new(
            self.conversations_dir().join(format!("{}.toml", parsed)),
        ))
    }

    fn credential_file(&self, owner_id: &str) -> AtomicTomlFile<CredentialFileV1> {
        let encoded = URL_SAFE_NO_PAD.encode(owner_id.as_bytes());
        AtomicTomlFile::new(
            self.base_dir
                .join(CREDENTIALS_DIR)
                .join(format!("{}.toml", encoded)),
        )
    }
}

/// Runs blocking file work off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| WebforgeError::persistence(format!("Storage task failed: {}", e)))?
}

fn storage_error(id: &str, err: AtomicTomlError) -> WebforgeError {
    match err {
        AtomicTomlError::Missing(_) => WebforgeError::not_found("Conversation", id),
        other => WebforgeError::persistence(other.to_string()),
    }
}

#[async_trait]
impl ConversationRepository for FileDocumentStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<ConversationDocument>> {
        let file = match self.conversation_file(id) {
            Ok(file) => file,
            Err(WebforgeError::InvalidInput(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let id = id.to_string();

        blocking(move || file.load().map_err(|e| storage_error(&id, e))).await
    }

    async fn find_all_by_owner(&self, owner_id: &str) -> Result<Vec<ConversationDocument>> {
        let dir = self.conversations_dir();
        let owner_id = owner_id.to_string();

        blocking(move || {
            let mut documents = Vec::new();
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
                    continue;
                }

                match AtomicTomlFile::<ConversationDocument>::new(path.clone()).load() {
                    Ok(Some(doc)) if doc.owner_id == owner_id => documents.push(doc),
                    Ok(_) => {}
                    Err(e) => {
                        // One unreadable file must not hide the rest of the list
                        tracing::warn!(
                            "[FileDocumentStore] Skipping unreadable conversation {}: {}",
                            path.display(),
                            e
                        );
                    }
                }
            }
            Ok(documents)
        })
        .await
    }

    async fn insert(&self, document: &ConversationDocument) -> Result<()> {
        let file = self.conversation_file(&document.id)?;
        let document = document.clone();

        blocking(move || {
            file.create(&document)
                .map_err(|e| WebforgeError::persistence(e.to_string()))
        })
        .await
    }

    async fn rename(&self, id: &str, display_name: &str) -> Result<ConversationDocument> {
        let file = self.conversation_file(id)?;
        let id = id.to_string();
        let display_name = display_name.to_string();

        blocking(move || {
            file.update(|doc| {
                doc.display_name = display_name;
                doc.touch();
                Ok(doc.clone())
            })
            .map_err(|e| storage_error(&id, e))
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let file = self.conversation_file(id)?;
        let id = id.to_string();

        blocking(move || match file.remove() {
            Ok(true) => Ok(()),
            Ok(false) => Err(WebforgeError::not_found("Conversation", id)),
            Err(e) => Err(storage_error(&id, e)),
        })
        .await
    }

    async fn atomic_append_turns_and_set_fields(
        &self,
        id: &str,
        plan: &MergePlan,
    ) -> Result<ConversationDocument> {
        let file = self.conversation_file(id)?;
        let id = id.to_string();
        let plan = plan.clone();

        blocking(move || {
            file.update(|doc| {
                plan.apply(doc);
                Ok(doc.clone())
            })
            .map_err(|e| storage_error(&id, e))
        })
        .await
    }
}

#[async_trait]
impl CredentialRepository for FileDocumentStore {
    async fn find_credential(&self, owner_id: &str) -> Result<Option<CredentialRecord>> {
        let file = self.credential_file(owner_id);

        blocking(move || {
            let stored = file
                .load()
                .map_err(|e| WebforgeError::persistence(e.to_string()))?;
            Ok(stored.map(CredentialFileV1::into_domain))
        })
        .await
    }

    async fn upsert_credential(&self, owner_id: &str, ciphertext: &[u8]) -> Result<()> {
        let file = self.credential_file(owner_id);
        let record =
            CredentialFileV1::from_domain(&CredentialRecord::new(owner_id, ciphertext.to_vec()));

        blocking(move || {
            let default_value = record.clone();
            file.upsert(default_value, move |stored| {
                *stored = record;
                Ok(())
            })
            .map_err(|e| WebforgeError::persistence(e.to_string()))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use webforge_core::conversation::{ArtifactMerger, Turn};
    use webforge_core::generation::GenerationOutput;

    fn reply(markup: Option<&str>, explanation: &str) -> GenerationOutput {
        GenerationOutput {
            markup: markup.map(str::to_string),
            explanation: explanation.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_find_and_list() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).await.unwrap();

        let mine = ConversationDocument::new("alice", None);
        let other = ConversationDocument::new("bob", Some("Bob's shop"));
        store.insert(&mine).await.unwrap();
        store.insert(&other).await.unwrap();

        let loaded = store.find_by_id(&mine.id).await.unwrap().unwrap();
        assert_eq!(loaded, mine);

        let listed = store.find_all_by_owner("alice").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).await.unwrap();

        let unknown = uuid::Uuid::new_v4().to_string();
        assert!(store.find_by_id(&unknown).await.unwrap().is_none());
        assert!(store.find_by_id("../../etc/passwd").await.unwrap().is_none());

        assert!(store.delete(&unknown).await.unwrap_err().is_not_found());
        assert!(store.rename(&unknown, "x").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_append_on_missing_document_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).await.unwrap();

        let ghost = ConversationDocument::new("alice", None);
        let plan = ArtifactMerger::plan(&ghost, "hi", &reply(None, "hello"));

        let err = store
            .atomic_append_turns_and_set_fields(&ghost.id, &plan)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store.find_by_id(&ghost.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_applies_plan() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).await.unwrap();

        let doc = ConversationDocument::new("alice", None);
        store.insert(&doc).await.unwrap();

        let plan = ArtifactMerger::plan(
            &doc,
            "Build me a landing page",
            &reply(Some("<main/>"), "Done"),
        );
        let updated = store
            .atomic_append_turns_and_set_fields(&doc.id, &plan)
            .await
            .unwrap();

        assert_eq!(updated.display_name, "Build me a landing page");
        assert_eq!(updated.artifact.markup, "<main/>");
        assert_eq!(updated.turns.len(), 2);
        assert_eq!(store.find_by_id(&doc.id).await.unwrap().unwrap(), updated);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_keep_all_turns() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).await.unwrap();

        let mut doc = ConversationDocument::new("alice", Some("Racing"));
        doc.turns.push(Turn::user("seed"));
        store.insert(&doc).await.unwrap();

        let tasks = (0..10).map(|n| {
            let store = store.clone();
            let doc = doc.clone();
            async move {
                // Every writer plans from the same stale read
                let plan = ArtifactMerger::plan(
                    &doc,
                    &format!("q{}", n),
                    &reply(None, &format!("a{}", n)),
                );
                store
                    .atomic_append_turns_and_set_fields(&doc.id, &plan)
                    .await
                    .unwrap();
            }
        });
        futures::future::join_all(tasks).await;

        let stored = store.find_by_id(&doc.id).await.unwrap().unwrap();
        assert_eq!(stored.turns.len(), 21);
        assert_eq!(stored.turns[0].text, "seed");
        // Each user turn is immediately followed by its own reply
        for pair in stored.turns[1..].chunks(2) {
            assert_eq!(pair[0].text.replacen('q', "a", 1), pair[1].text);
        }
    }

    #[tokio::test]
    async fn test_delete_removes_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).await.unwrap();

        let doc = ConversationDocument::new("alice", None);
        store.insert(&doc).await.unwrap();
        store.delete(&doc.id).await.unwrap();

        assert!(store.find_by_id(&doc.id).await.unwrap().is_none());
        assert!(store.find_all_by_owner("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_credential_upsert_replaces_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).await.unwrap();

        assert!(
            store
                .find_credential("alice@example.com")
                .await
                .unwrap()
                .is_none()
        );

        store
            .upsert_credential("alice@example.com", &[1, 2, 3])
            .await
            .unwrap();
        store
            .upsert_credential("alice@example.com", &[9, 8])
            .await
            .unwrap();

        let record = store
            .find_credential("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.owner_id, "alice@example.com");
        assert_eq!(record.ciphertext, vec![9, 8]);

        let files: Vec<_> = std::fs::read_dir(temp_dir.path().join(CREDENTIALS_DIR))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("toml"))
            .collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_owner_ids_with_path_characters_stay_inside_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path()).await.unwrap();

        store.upsert_credential("../../escape", &[7]).await.unwrap();
        let record = store.find_credential("../../escape").await.unwrap().unwrap();
        assert_eq!(record.ciphertext, vec![7]);
        assert!(!temp_dir.path().parent().unwrap().join("escape.toml").exists());
    }
}
