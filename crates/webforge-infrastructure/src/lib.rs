pub mod config_service;
pub mod dto;
pub mod gemini_generator;
pub mod history;
pub mod keystore;
pub mod paths;
pub mod storage;
pub mod vault;

pub use crate::config_service::{ConfigService, LoadedConfig};
pub use crate::gemini_generator::GeminiGenerator;
pub use crate::history::{InMemorySessionHistory, JsonlSessionHistory};
pub use crate::keystore::KeyStore;
pub use crate::paths::WebforgePaths;
pub use crate::storage::{FileDocumentStore, InMemoryDocumentStore};
pub use crate::vault::RsaCredentialVault;
