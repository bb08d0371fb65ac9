//! Credential record model.

/// One owner's upstream API token, stored only as ciphertext.
///
/// The record has no plaintext field, and `Debug` prints only the
/// ciphertext length.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Owning user identifier (unique key)
    pub owner_id: String,
    /// Vault ciphertext of the UTF-8 token
    pub ciphertext: Vec<u8>,
    /// Timestamp of the last save (RFC 3339)
    pub updated_at: String,
}

impl CredentialRecord {
    pub fn new(owner_id: impl Into<String>, ciphertext: Vec<u8>) -> Self {
        Self {
            owner_id: owner_id.into(),
            ciphertext,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("owner_id", &self.owner_id)
            .field("ciphertext_len", &self.ciphertext.len())
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
