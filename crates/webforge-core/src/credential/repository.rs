//! Credential repository trait.

use super::model::CredentialRecord;
use crate::error::Result;
use async_trait::async_trait;

/// Storage for encrypted credential records, one per owner.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Finds the record for `owner_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))`: A record is on file
    /// - `Ok(None)`: The owner never saved a credential
    /// - `Err(_)`: The store could not be read
    async fn find_credential(&self, owner_id: &str) -> Result<Option<CredentialRecord>>;

    /// Creates the record on first save and replaces the ciphertext in place
    /// afterwards. No history of previous ciphertexts is kept.
    async fn upsert_credential(&self, owner_id: &str, ciphertext: &[u8]) -> Result<()>;
}
