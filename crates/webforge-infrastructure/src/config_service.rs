//! Configuration loading.
//!
//! Reads `config.toml` from an explicit path or from
//! `~/.config/webforge/config.toml`, applies environment overrides and
//! resolves relative paths against the directory holding the config file.

use crate::paths::WebforgePaths;
use std::path::{Path, PathBuf};
use webforge_core::config::AppConfig;
use webforge_core::{Result, WebforgeError};

/// Overrides `storage.data_dir`.
pub const ENV_DATA_DIR: &str = "WEBFORGE_DATA_DIR";
/// Overrides `generation.fallback_api_key`.
pub const ENV_FALLBACK_API_KEY: &str = "WEBFORGE_FALLBACK_API_KEY";

/// A loaded configuration with every path made absolute.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// Directory relative paths were resolved against.
    pub config_dir: PathBuf,
    /// Root of the document store and session history.
    pub data_dir: PathBuf,
}

impl LoadedConfig {
    pub fn public_key_path(&self) -> &Path {
        &self.config.keys.public_key_path
    }

    pub fn private_key_path(&self) -> &Path {
        &self.config.keys.private_key_path
    }

    pub fn history_dir(&self) -> PathBuf {
        WebforgePaths::history_dir(&self.data_dir)
    }
}

/// Loads [`AppConfig`] from disk.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses `path` if given, otherwise the platform default location.
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => WebforgePaths::config_file()
                .map_err(|e| WebforgeError::configuration(e.to_string()))?,
        };
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration with overrides from the process environment.
    pub fn load(&self) -> Result<LoadedConfig> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Loads the configuration, reading overrides through `env`.
    ///
    /// A missing file yields defaults. An unreadable or malformed file is a
    /// `Configuration` error.
    pub fn load_with_env<F>(&self, env: F) -> Result<LoadedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match std::fs::read_to_string(&self.path) {
            Ok(content) => toml::from_str::<AppConfig>(&content).map_err(|e| {
                WebforgeError::configuration(format!(
                    "Invalid config file {}: {}",
                    self.path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "[ConfigService] {} not found, using defaults",
                    self.path.display()
                );
                AppConfig::default()
            }
            Err(e) => {
                return Err(WebforgeError::configuration(format!(
                    "Failed to read config file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if let Some(data_dir) = env(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            config.storage.data_dir = Some(PathBuf::from(data_dir));
        }
        if let Some(key) = env(ENV_FALLBACK_API_KEY).filter(|v| !v.trim().is_empty()) {
            config.generation.fallback_api_key = Some(key);
        }

        let config_dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        config.keys.public_key_path = resolve(&config_dir, &config.keys.public_key_path);
        config.keys.private_key_path = resolve(&config_dir, &config.keys.private_key_path);

        let data_dir = match &config.storage.data_dir {
            Some(dir) => resolve(&config_dir, dir),
            None => WebforgePaths::data_dir()
                .map_err(|e| WebforgeError::configuration(e.to_string()))?,
        };

        Ok(LoadedConfig {
            config,
            config_dir,
            data_dir,
        })
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
