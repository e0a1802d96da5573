//! Install orchestration
//!
//! Resolves a version token against the remote catalog, then assembles the
//! version directory from the two upstream artifacts: the runtime binary
//! goes straight into the directory, the npm source archive is fetched,
//! extracted, and relocated by the store.
//!
//! Assembly is deliberately not transactional. If the runtime download
//! succeeds and the npm step fails, the version directory stays on disk
//! with only the runtime present and the error carries the directory path
//! for manual completion.

use crate::catalog::CatalogClient;
use crate::errors::InstallError;
use crate::fetch::Fetcher;
use crate::store::InstallationStore;
use std::path::PathBuf;

/// Runtime binary downloads, templated as `«base»/v«version»/node.exe`.
pub const NODE_DIST_URL: &str = "http://nodejs.org/dist";

/// npm source archives, templated as `«base»/v«npm_version».zip`.
pub const NPM_ARCHIVE_URL: &str = "https://github.com/npm/npm/archive";

/// Outcome of a completed installation.
#[derive(Debug)]
pub struct InstallReport {
    pub version: String,
    pub npm_version: String,
    pub runtime_bytes: u64,
    pub dir: PathBuf,
}

/// Drives the resolve → fetch → assemble flow for one installation root.
pub struct Installer {
    catalog: CatalogClient,
    fetcher: Fetcher,
    store: InstallationStore,
    dist_base_url: String,
    npm_base_url: String,
}

impl Installer {
    pub fn new(store: InstallationStore, catalog: CatalogClient) -> Self {
        Self::with_mirrors(store, catalog, NODE_DIST_URL, NPM_ARCHIVE_URL)
    }

    /// Use alternate artifact hosts, e.g. a fixture server in tests.
    pub fn with_mirrors(
        store: InstallationStore,
        catalog: CatalogClient,
        dist_base_url: &str,
        npm_base_url: &str,
    ) -> Self {
        Self {
            catalog,
            fetcher: Fetcher::new(),
            store,
            dist_base_url: dist_base_url.to_string(),
            npm_base_url: npm_base_url.to_string(),
        }
    }

    /// Resolve a version token to a concrete version. `latest` goes through
    /// the checksum listing; anything else is taken as-is.
    pub async fn resolve(&self, requested: &str) -> Result<String, InstallError> {
        if requested == "latest" {
            Ok(self.catalog.resolve_latest().await?)
        } else {
            Ok(requested.to_string())
        }
    }

    /// Install a concrete (already resolved) version.
    ///
    /// The already-installed check happens before any network traffic, so a
    /// repeated install performs no fetches. Availability is checked before
    /// the version directory is created, so an unknown version leaves no
    /// state behind.
    pub async fn install(&self, version: &str) -> Result<InstallReport, InstallError> {
        if self.store.is_installed(version).await {
            return Err(InstallError::AlreadyInstalled {
                version: version.to_string(),
            });
        }

        let catalog = self.catalog.fetch_catalog().await?;
        let npm_version = match catalog.npm_version(version) {
            Some(v) => v.to_string(),
            None => {
                return Err(InstallError::NotAvailable {
                    version: version.to_string(),
                })
            }
        };

        let dir = self.store.begin_install(version).await?;

        let runtime_url = format!("{}/v{}/node.exe", self.dist_base_url, version);
        log::info!("downloading node.js v{} from {}", version, runtime_url);
        let runtime_bytes = self
            .fetcher
            .fetch(&runtime_url, &self.store.runtime_path(version))
            .await
            .map_err(|e| InstallError::RuntimeDownload {
                version: version.to_string(),
                reason: e.to_string(),
            })?;

        // The destination is a fixed name in the temp directory; a stale
        // partial file from an earlier failed attempt gets truncated.
        let npm_url = format!("{}/v{}.zip", self.npm_base_url, npm_version);
        let npm_archive = std::env::temp_dir().join(format!("npm-v{}.zip", npm_version));
        log::info!("downloading npm v{} from {}", npm_version, npm_url);

        let npm_result = match self.fetcher.fetch(&npm_url, &npm_archive).await {
            Ok(_) => self
                .store
                .finish_install(version, &npm_version, &npm_archive)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if let Err(reason) = npm_result {
            return Err(InstallError::PartialInstall {
                version: version.to_string(),
                npm_version,
                dir,
                reason,
            });
        }

        Ok(InstallReport {
            version: version.to_string(),
            npm_version,
            runtime_bytes,
            dir,
        })
    }
}
