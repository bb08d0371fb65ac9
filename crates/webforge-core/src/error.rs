//! Error types for webforge.

use thiserror::Error;

/// The closed error taxonomy shared by every webforge layer.
///
/// Request-scoped variants are mapped to a caller-visible status with
/// [`WebforgeError::status_code`] and a redacted message with
/// [`WebforgeError::public_message`]. Neither ever carries ciphertext or a
/// plaintext credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebforgeError {
    /// Bad or missing startup configuration (key pair, config file).
    /// Fatal; only raised while bootstrapping.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No credential on file, or the stored credential cannot be decrypted.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The generation collaborator failed, timed out, or returned output
    /// that could not be parsed.
    #[error("Generation failed: {0}")]
    GenerationFailure(String),

    /// A document or credential store read/write failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Malformed caller input (invalid id, blank name, over-long credential).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl WebforgeError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationFailure(message.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    pub fn is_generation_failure(&self) -> bool {
        matches!(self, Self::GenerationFailure(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    // ============================================================================
    // Caller-visible mapping
    // ============================================================================

    /// HTTP-style status for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Configuration(_) => 500,
            Self::Unauthorized(_) => 401,
            Self::NotFound { .. } => 404,
            Self::GenerationFailure(_) => 502,
            Self::Persistence(_) => 500,
            Self::InvalidInput(_) => 400,
        }
    }

    /// Message safe to hand to an API caller.
    ///
    /// Internal detail (store paths, upstream bodies, crypto failure classes)
    /// stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Configuration(_) => "Service is not configured".to_string(),
            Self::Unauthorized(_) => "Unauthorized: no usable credential".to_string(),
            Self::NotFound { entity_type, .. } => format!("{} not found", entity_type),
            Self::GenerationFailure(_) => "AI response generation failed".to_string(),
            Self::Persistence(_) => "Failed to save or load data".to_string(),
            Self::InvalidInput(reason) => reason.clone(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for WebforgeError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(format!("{} (kind: {:?})", err, err.kind()))
    }
}

/// A type alias for `Result<T, WebforgeError>`.
pub type Result<T> = std::result::Result<T, WebforgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(WebforgeError::unauthorized("x").status_code(), 401);
        assert_eq!(WebforgeError::not_found("Conversation", "abc").status_code(), 404);
        assert_eq!(WebforgeError::generation("x").status_code(), 502);
        assert_eq!(WebforgeError::persistence("x").status_code(), 500);
        assert_eq!(WebforgeError::invalid_input("x").status_code(), 400);
        assert_eq!(WebforgeError::configuration("x").status_code(), 500);
    }

    #[test]
    fn test_public_message_hides_internal_detail() {
        let err = WebforgeError::persistence("/var/lib/webforge/conversations/abc.toml: EACCES");
        assert!(!err.public_message().contains("/var/lib"));

        let err = WebforgeError::generation("upstream said: key AIza... is invalid");
        assert!(!err.public_message().contains("AIza"));

        let err = WebforgeError::not_found("Conversation", "abc");
        assert_eq!(err.public_message(), "Conversation not found");
    }

    #[test]
    fn test_unauthorized_reasons_share_one_public_message() {
        let absent = WebforgeError::unauthorized("no credential on file");
        let corrupt = WebforgeError::unauthorized("stored credential cannot be decrypted");
        assert_eq!(absent.public_message(), corrupt.public_message());
        assert!(!absent.public_message().contains("on file"));
    }

    #[test]
    fn test_io_error_maps_to_persistence() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: WebforgeError = io.into();
        assert!(err.is_persistence());
    }
}
