//! Application configuration model (config.toml).
//!
//! Every section and field has a default, so a missing or partial file is
//! valid. Loading, environment overrides and path resolution live in the
//! infrastructure layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub keys: KeyConfig,
    pub storage: StorageConfig,
    pub generation: GenerationConfig,
    pub logging: LoggingConfig,
}

/// Location of the vault key pair (PEM files).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct KeyConfig {
    pub public_key_path: PathBuf,
    pub private_key_path: PathBuf,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            public_key_path: PathBuf::from("public.pem"),
            private_key_path: PathBuf::from("private.pem"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Root for conversations, credentials and session history.
    /// Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
}

/// Generation collaborator settings.
#[derive(Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub base_url: String,
    /// Upper bound for one generation call. A timed-out call never mutates
    /// the conversation.
    pub timeout_secs: u64,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    /// Shared credential used for stateless generation only.
    pub fallback_api_key: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            timeout_secs: 60,
            temperature: 2.0,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 8192,
            fallback_api_key: None,
        }
    }
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("max_output_tokens", &self.max_output_tokens)
            .field(
                "fallback_api_key",
                &self.fallback_api_key.as_ref().map(|_| "***"),
            )
            .finish()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.generation.model, "gemini-2.0-flash");
        assert_eq!(config.generation.timeout_secs, 60);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [generation]
            timeout_secs = 5
            fallback_api_key = "shared-key"

            [keys]
            private_key_path = "/etc/webforge/private.pem"
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.timeout_secs, 5);
        assert_eq!(config.generation.top_k, 64);
        assert_eq!(config.keys.public_key_path, PathBuf::from("public.pem"));
        assert_eq!(
            config.keys.private_key_path,
            PathBuf::from("/etc/webforge/private.pem")
        );
    }

    #[test]
    fn test_debug_redacts_fallback_key() {
        let config = GenerationConfig {
            fallback_api_key: Some("shared-key".to_string()),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("shared-key"));
    }
}
