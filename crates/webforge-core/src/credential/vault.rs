//! Credential vault contract.

use super::secret::SecretToken;
use thiserror::Error;

/// Failures raised by a [`CredentialVault`].
///
/// Messages carry the failure class only, never plaintext or ciphertext.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// The ciphertext is malformed, truncated, corrupted, or was produced
    /// under a different key pair.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The plaintext could not be encrypted (for example it exceeds the
    /// padding capacity of the key).
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Key material is missing, unparseable, or the pair does not match.
    #[error("key error: {0}")]
    Key(String),
}

/// Asymmetric encrypt-at-rest / decrypt-on-use for a single opaque secret.
///
/// Implementations are CPU-bound and perform no I/O. Encryption is
/// randomized, so callers must not expect the same plaintext to produce the
/// same bytes twice.
pub trait CredentialVault: Send + Sync {
    /// Encrypts `plaintext` under the public key.
    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, VaultError>;

    /// Decrypts `ciphertext` with the private key.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<SecretToken, VaultError>;
}
