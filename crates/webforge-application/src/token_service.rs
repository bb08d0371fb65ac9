//! Token service: encrypt-at-rest storage of each owner's upstream API token.

use std::sync::Arc;
use webforge_core::credential::{CredentialRepository, CredentialVault, SecretToken, VaultError};
use webforge_core::{Result, WebforgeError};

use crate::context::AppContext;

/// Saves and reads back credentials through the vault.
///
/// The plaintext only ever exists as a [`SecretToken`]; what reaches the
/// repository is vault ciphertext.
#[derive(Clone)]
pub struct TokenService {
    credentials: Arc<dyn CredentialRepository>,
    vault: Arc<dyn CredentialVault>,
}

impl TokenService {
    pub fn new(context: &AppContext) -> Self {
        Self {
            credentials: Arc::clone(&context.credentials),
            vault: Arc::clone(&context.vault),
        }
    }

    /// Encrypts `plaintext` and stores it as the owner's credential,
    /// replacing any previous one.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the token is blank or too long for the vault key
    /// - `Persistence` if the store write fails
    pub async fn save_token(&self, owner_id: &str, plaintext: &str) -> Result<()> {
        if plaintext.trim().is_empty() {
            return Err(WebforgeError::invalid_input("credential must not be blank"));
        }

        let ciphertext = self.vault.encrypt(plaintext).map_err(|e| {
            tracing::warn!("[TokenService] Encryption refused for owner {}: {}", owner_id, e);
            match e {
                VaultError::Encryption(_) => WebforgeError::invalid_input("credential too long"),
                other => WebforgeError::configuration(other.to_string()),
            }
        })?;

        self.credentials
            .upsert_credential(owner_id, &ciphertext)
            .await
            .inspect_err(|e| {
                tracing::error!("[TokenService] Failed to store credential for {}: {}", owner_id, e)
            })?;

        tracing::info!("[TokenService] Saved credential for owner {}", owner_id);
        Ok(())
    }

    /// Reads back the owner's credential.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(token))`: A credential is on file and decrypts
    /// - `Ok(None)`: The owner never saved a credential
    /// - `Err(Unauthorized)`: A record exists but cannot be decrypted
    /// - `Err(Persistence)`: The store could not be read
    pub async fn fetch_token(&self, owner_id: &str) -> Result<Option<SecretToken>> {
        let Some(record) = self.credentials.find_credential(owner_id).await? else {
            return Ok(None);
        };

        self.vault.decrypt(&record.ciphertext).map(Some).map_err(|e| {
            tracing::warn!(
                "[TokenService] Stored credential for owner {} is unusable: {}",
                owner_id,
                e
            );
            WebforgeError::unauthorized("stored credential cannot be decrypted")
        })
    }

    /// Like [`fetch_token`](Self::fetch_token), but a missing credential is
    /// `Unauthorized` too.
    pub async fn credential_for(&self, owner_id: &str) -> Result<SecretToken> {
        self.fetch_token(owner_id).await?.ok_or_else(|| {
            tracing::warn!("[TokenService] No credential on file for owner {}", owner_id);
            WebforgeError::unauthorized("no credential on file")
        })
    }
}
