//! Credential domain module.
//!
//! - `model`: the stored, encrypted-only credential record
//! - `secret`: `SecretToken`, the transient plaintext holder
//! - `vault`: the `CredentialVault` contract and its `VaultError`
//! - `repository`: the document-store contract for credential records

mod model;
mod repository;
mod secret;
mod vault;

pub use model::CredentialRecord;
pub use repository::CredentialRepository;
pub use secret::SecretToken;
pub use vault::{CredentialVault, VaultError};
