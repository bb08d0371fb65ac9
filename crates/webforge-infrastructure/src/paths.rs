//! Platform paths for webforge configuration and data.
//!
//! ```text
//! ~/.config/webforge/          # Config directory
//! ├── config.toml              # Application configuration
//! ├── public.pem               # Vault public key (default location)
//! └── private.pem              # Vault private key (default location, mode 600)
//!
//! ~/.local/share/webforge/     # Data directory
//! ├── conversations/           # One TOML document per conversation
//! ├── credentials/             # One TOML document per owner
//! └── history/                 # Session-history logs (JSONL)
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "webforge";

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

pub struct WebforgePaths;

impl WebforgePaths {
    /// Returns the configuration directory (e.g. `~/.config/webforge/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the data directory (e.g. `~/.local/share/webforge/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Session-history directory under a data root.
    pub fn history_dir(data_dir: &Path) -> PathBuf {
        data_dir.join("history")
    }
}
