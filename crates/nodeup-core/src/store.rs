//! On-disk layout of installed versions
//!
//! Every installed version lives at `«root»/v«version»`. Existence of that
//! directory is the sole source of truth for "is version X installed";
//! there is no manifest. Directories are created by the install flow and
//! removed wholesale by uninstall, never partially torn down.

use crate::archive;
use crate::errors::StoreError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Manages the version directories under a single installation root.
#[derive(Debug, Clone)]
pub struct InstallationStore {
    root: PathBuf,
}

impl InstallationStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the given version, installed or not.
    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.root.join(format!("v{}", version))
    }

    /// Final location of the runtime executable for a version.
    pub fn runtime_path(&self, version: &str) -> PathBuf {
        self.version_dir(version).join("node.exe")
    }

    pub async fn is_installed(&self, version: &str) -> bool {
        self.version_dir(version).exists()
    }

    /// Create the version directory and its empty `node_modules`
    /// subdirectory, returning the directory path. An already-existing
    /// directory is a logged no-op; the store does not assume exclusivity.
    pub async fn begin_install(&self, version: &str) -> Result<PathBuf, StoreError> {
        let dir = self.version_dir(version);
        if dir.exists() {
            log::warn!(
                "version directory {} already exists, leaving it as is",
                dir.display()
            );
            return Ok(dir);
        }
        fs::create_dir_all(dir.join("node_modules")).await?;
        Ok(dir)
    }

    /// Assemble the npm half of a version directory from a fetched archive:
    /// extract into a scratch directory, relocate the launcher scripts and
    /// the module tree into place, then discard the scratch entirely.
    ///
    /// The archive is expected to contain a single top-level
    /// `npm-«npm_version»` directory; that layout is the upstream artifact
    /// contract and is special-cased rather than merged generically.
    pub async fn finish_install(
        &self,
        version: &str,
        npm_version: &str,
        npm_archive: &Path,
    ) -> Result<(), StoreError> {
        let dir = self.version_dir(version);
        let scratch = tempfile::tempdir_in(&self.root)?;
        archive::extract(npm_archive, scratch.path())?;

        let npm_root = scratch.path().join(format!("npm-{}", npm_version));
        if !npm_root.exists() {
            return Err(StoreError::ArchiveLayout {
                expected: format!("npm-{}", npm_version),
            });
        }

        fs::rename(npm_root.join("bin").join("npm"), dir.join("npm")).await?;
        fs::rename(npm_root.join("bin").join("npm.cmd"), dir.join("npm.cmd")).await?;
        fs::rename(&npm_root, dir.join("node_modules").join("npm")).await?;

        log::info!("installed npm v{} into {}", npm_version, dir.display());
        // The scratch directory is removed when it drops.
        Ok(())
    }

    /// Recursively remove a version directory.
    pub async fn uninstall(&self, version: &str) -> Result<(), StoreError> {
        fs::remove_dir_all(self.version_dir(version)).await?;
        Ok(())
    }

    /// Enumerate installed versions by listing `v*` directories under the
    /// root. The order is whatever the directory enumeration yields and
    /// must not be relied upon.
    pub async fn installed_versions(&self) -> Result<Vec<String>, StoreError> {
        let mut versions = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(version) = name.strip_prefix('v') {
                if !version.is_empty() {
                    versions.push(version.to_string());
                }
            }
        }
        Ok(versions)
    }
}
