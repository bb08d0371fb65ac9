//! RSA-OAEP credential vault.

use crate::keystore::KeyStore;
use rsa::Oaep;
use sha2::Sha256;
use std::sync::Arc;
use webforge_core::credential::{CredentialVault, SecretToken, VaultError};

/// Encrypts under the public key with OAEP(SHA-256) and decrypts with the
/// private key.
///
/// OAEP padding is randomized, so encrypting the same token twice yields
/// different ciphertexts. A corrupted, truncated or foreign ciphertext fails
/// the padding check and is reported as [`VaultError::Decryption`].
#[derive(Clone)]
pub struct RsaCredentialVault {
    keys: Arc<KeyStore>,
}

impl RsaCredentialVault {
    pub fn new(keys: Arc<KeyStore>) -> Self {
        Self { keys }
    }
}

impl CredentialVault for RsaCredentialVault {
    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, VaultError> {
        let limit = self.keys.max_plaintext_len();
        if plaintext.len() > limit {
            return Err(VaultError::Encryption(format!(
                "credential is {} bytes, the key holds at most {}",
                plaintext.len(),
                limit
            )));
        }

        let mut rng = rand::rngs::OsRng;
        self.keys
            .public_key()
            .encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext.as_bytes())
            .map_err(|e| VaultError::Encryption(e.to_string()))
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<SecretToken, VaultError> {
        if ciphertext.is_empty() {
            return Err(VaultError::Decryption("empty ciphertext".to_string()));
        }

        let bytes = self
            .keys
            .private_key()
            .decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map_err(|e| VaultError::Decryption(e.to_string()))?;

        String::from_utf8(bytes)
            .map(SecretToken::new)
            .map_err(|_| VaultError::Decryption("plaintext is not valid UTF-8".to_string()))
    }
}
