//! Activation switch over the single active-version symlink
//!
//! The indirection points at exactly one installed version directory at a
//! time; absence means no version is active. Replacing it is a privileged
//! removal followed by a privileged link creation, and between those two
//! steps the system is briefly unlinked. That window is inherent to
//! directory-symlink replacement and is a known, documented race; no
//! rollback of a half-completed transition is attempted.

use crate::errors::SwitchError;
use crate::privilege::PrivilegedRunner;
use crate::store::InstallationStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

/// Owns the active-version indirection for one installation root.
pub struct ActivationSwitch {
    store: InstallationStore,
    symlink: PathBuf,
    runner: Arc<dyn PrivilegedRunner>,
}

impl ActivationSwitch {
    pub fn new(
        store: InstallationStore,
        symlink: PathBuf,
        runner: Arc<dyn PrivilegedRunner>,
    ) -> Self {
        Self {
            store,
            symlink,
            runner,
        }
    }

    /// Repoint the indirection at an installed version. Verifies the
    /// version is installed before touching the filesystem; if an
    /// indirection already exists it is removed first, then the new link
    /// is created.
    pub async fn activate(&self, version: &str) -> Result<(), SwitchError> {
        if !self.store.is_installed(version).await {
            return Err(SwitchError::NotInstalled {
                version: version.to_string(),
            });
        }

        if fs::symlink_metadata(&self.symlink).await.is_ok() {
            self.runner.run(&self.remove_argv()).await?;
        }

        let target = self.store.version_dir(version);
        self.runner
            .run(&[
                "cmd".to_string(),
                "/C".to_string(),
                "mklink".to_string(),
                "/D".to_string(),
                self.symlink.display().to_string(),
                target.display().to_string(),
            ])
            .await?;

        log::info!("active version switched to v{}", version);
        Ok(())
    }

    /// Activate any one installed version. Which one is picked depends on
    /// directory enumeration order and is unspecified. Returns the
    /// activated version, or `None` when nothing is installed.
    pub async fn enable(&self) -> Result<Option<String>, SwitchError> {
        let versions = self.store.installed_versions().await?;
        match versions.into_iter().next() {
            Some(version) => {
                self.activate(&version).await?;
                Ok(Some(version))
            }
            None => Ok(None),
        }
    }

    /// Remove the indirection without a replacement, returning to the
    /// unlinked state. Best-effort: the removal's result is intentionally
    /// ignored.
    pub async fn disable(&self) {
        if let Err(e) = self.runner.run(&self.remove_argv()).await {
            log::debug!("ignoring indirection removal failure: {}", e);
        }
    }

    /// The version reported by whatever `node` currently resolves on the
    /// PATH (`node -v` output, trimmed, e.g. `v4.2.1`). Absence of a
    /// resolvable runtime is not an error.
    pub async fn active_version(&self) -> Option<String> {
        let node = which::which("node").ok()?;
        let output = tokio::process::Command::new(node)
            .arg("-v")
            .output()
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            None
        } else {
            Some(version)
        }
    }

    fn remove_argv(&self) -> Vec<String> {
        vec![
            "cmd".to_string(),
            "/C".to_string(),
            "rmdir".to_string(),
            self.symlink.display().to_string(),
        ]
    }
}
