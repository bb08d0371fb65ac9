//! Document store implementations.

pub mod atomic_toml;
mod file_document_store;
mod memory_store;

pub use file_document_store::FileDocumentStore;
pub use memory_store::InMemoryDocumentStore;
