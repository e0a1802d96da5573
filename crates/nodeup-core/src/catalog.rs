//! Remote version catalog client
//!
//! The catalog service publishes a JSON document mapping every node.js
//! version to its bundled npm version, and the dist server publishes a
//! checksum listing for the latest release. Both are fetched fresh on every
//! operation that needs them; nothing is cached across invocations.

use crate::errors::CatalogError;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;

/// JSON document mapping node.js versions to npm versions.
pub const NODE_VERSIONS_URL: &str =
    "https://raw.githubusercontent.com/coreybutler/nodedistro/master/nodeversions.json";

/// Checksum listing for the latest release, used to resolve the `latest`
/// version token.
pub const LATEST_SHASUMS_URL: &str = "http://nodejs.org/dist/latest/SHASUMS.txt";

/// One fetch of the version catalog. The document is
/// `{ "all": { <version>: <npm-version>, ... } }`; key presence is the
/// availability check.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    all: BTreeMap<String, String>,
}

impl Catalog {
    /// The npm version bundled with the given node.js version, if the
    /// catalog knows the version at all. A missing key means "not
    /// available", never a transport problem.
    pub fn npm_version(&self, version: &str) -> Option<&str> {
        self.all.get(version).map(String::as_str)
    }

    pub fn contains(&self, version: &str) -> bool {
        self.all.contains_key(version)
    }
}

/// Client for the remote catalog and the latest-release listing.
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    catalog_url: String,
    shasums_url: String,
}

impl CatalogClient {
    pub fn new() -> Self {
        Self::with_urls(NODE_VERSIONS_URL, LATEST_SHASUMS_URL)
    }

    /// Point the client at a different catalog service, e.g. a fixture
    /// server in tests or a mirror.
    pub fn with_urls(catalog_url: &str, shasums_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            catalog_url: catalog_url.to_string(),
            shasums_url: shasums_url.to_string(),
        }
    }

    /// Fetch and decode the version catalog.
    pub async fn fetch_catalog(&self) -> Result<Catalog, CatalogError> {
        let text = self.get_text(&self.catalog_url).await?;
        serde_json::from_str(&text).map_err(|e| CatalogError::Decode {
            message: e.to_string(),
        })
    }

    /// Resolve the `latest` token to a concrete version string by scanning
    /// the checksum listing for the first installer filename. The listing
    /// carries one line per artifact; only the first match counts.
    pub async fn resolve_latest(&self) -> Result<String, CatalogError> {
        let listing = self.get_text(&self.shasums_url).await?;
        let token = Regex::new("node-v.+msi")
            .map_err(|e| CatalogError::Decode {
                message: e.to_string(),
            })?
            .find(&listing)
            .ok_or(CatalogError::NoMatch)?;
        let strip = Regex::new("node-v|-x.+").map_err(|e| CatalogError::Decode {
            message: e.to_string(),
        })?;
        let version = strip.replace_all(token.as_str(), "").into_owned();
        if version.is_empty() {
            return Err(CatalogError::NoMatch);
        }
        log::debug!("resolved latest to {}", version);
        Ok(version)
    }

    async fn get_text(&self, url: &str) -> Result<String, CatalogError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| CatalogError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
        if !response.status().is_success() {
            return Err(CatalogError::Transport {
                url: url.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }
        response.text().await.map_err(|e| CatalogError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}
