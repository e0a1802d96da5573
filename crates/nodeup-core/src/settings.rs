//! Persisted root/symlink configuration
//!
//! A two-line `key: value` text resource records the installation root and
//! the indirection path:
//!
//! ```text
//! root: C:\nvm
//! path: C:\nodejs
//! ```
//!
//! It is loaded once at startup; an unreadable file or a recorded root that
//! does not exist on disk is fatal before any command logic runs. Values are
//! threaded into the component constructors, never held in process globals.

use crate::errors::SettingsError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Environment override for the settings file location, mainly a test seam.
pub const SETTINGS_ENV: &str = "NODEUP_SETTINGS";

#[derive(Debug, Clone)]
pub struct Settings {
    pub root: PathBuf,
    pub symlink: PathBuf,
    file: PathBuf,
}

impl Settings {
    /// Location of the settings file: `$NODEUP_SETTINGS` if set, otherwise
    /// `«user config dir»/nodeup/settings.txt`.
    pub fn default_file() -> Result<PathBuf, SettingsError> {
        if let Ok(path) = std::env::var(SETTINGS_ENV) {
            return Ok(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join("nodeup").join("settings.txt"))
            .ok_or(SettingsError::NoConfigDir)
    }

    pub async fn load() -> Result<Self, SettingsError> {
        Self::load_from(Self::default_file()?).await
    }

    /// Read and validate the settings resource. Line order is tolerated and
    /// values are trimmed of surrounding whitespace and CR.
    pub async fn load_from(file: PathBuf) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(&file)
            .await
            .map_err(|e| SettingsError::Unreadable {
                path: file.clone(),
                message: e.to_string(),
            })?;

        let mut root = None;
        let mut symlink = None;
        for line in text.lines() {
            if let Some(value) = line.trim().strip_prefix("root:") {
                root = Some(PathBuf::from(value.trim()));
            } else if let Some(value) = line.trim().strip_prefix("path:") {
                symlink = Some(PathBuf::from(value.trim()));
            }
        }

        let root = root.ok_or_else(|| SettingsError::MissingKey {
            key: "root".to_string(),
        })?;
        let symlink = symlink.ok_or_else(|| SettingsError::MissingKey {
            key: "path".to_string(),
        })?;

        if !root.exists() {
            return Err(SettingsError::RootMissing { root });
        }

        Ok(Self {
            root,
            symlink,
            file,
        })
    }

    /// Rebind the installation root and rewrite the persisted resource,
    /// keeping the recorded indirection path. The new root must already
    /// exist on disk.
    pub async fn update_root(&mut self, new_root: &Path) -> Result<(), SettingsError> {
        if !new_root.exists() {
            return Err(SettingsError::RootMissing {
                root: new_root.to_path_buf(),
            });
        }
        self.root = new_root.to_path_buf();
        self.save().await
    }

    async fn save(&self) -> Result<(), SettingsError> {
        // CRLF separation, byte-compatible with the original collaborator.
        let content = format!(
            "root: {}\r\npath: {}",
            self.root.display(),
            self.symlink.display()
        );
        if let Some(parent) = self.file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.file, content).await?;
        Ok(())
    }
}
