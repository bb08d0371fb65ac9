//! On-disk representations that differ from the domain models.
//!
//! Conversations are stored as-is. Credential records carry binary
//! ciphertext, which TOML cannot hold, so they go through a DTO with a
//! base64 field.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use webforge_core::credential::CredentialRecord;

/// Credential file schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialFileV1 {
    pub owner_id: String,
    /// Standard base64 of the vault ciphertext
    pub ciphertext: String,
    pub updated_at: String,
}

impl CredentialFileV1 {
    pub fn from_domain(record: &CredentialRecord) -> Self {
        Self {
            owner_id: record.owner_id.clone(),
            ciphertext: BASE64_STANDARD.encode(&record.ciphertext),
            updated_at: record.updated_at.clone(),
        }
    }

    /// Decodes the stored base64.
    ///
    /// Undecodable text is a damaged ciphertext, not a missing record: the
    /// record comes back with an empty ciphertext, which no vault decrypts.
    pub fn into_domain(self) -> CredentialRecord {
        let ciphertext = BASE64_STANDARD
            .decode(self.ciphertext.as_bytes())
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "[CredentialFileV1] Stored ciphertext for owner {} is not valid base64: {}",
                    self.owner_id,
                    e
                );
                Vec::new()
            });

        CredentialRecord {
            owner_id: self.owner_id,
            ciphertext,
            updated_at: self.updated_at,
        }
    }
}
