//! Error types for the nodeup components
//!
//! Each component reports at its own boundary; there is no unified error
//! type. The CLI maps these to user guidance and decides what is fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the remote catalog client. All of these are fatal to the
/// current command; the catalog service has no retry policy.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("could not retrieve {url}: {message}")]
    Transport { url: String, message: String },

    #[error("malformed version catalog: {message}")]
    Decode { message: String },

    #[error("no installer entry found in the latest-version listing")]
    NoMatch,
}

/// Errors from the artifact fetcher. A failed fetch never removes the
/// partial destination file; cleanup policy belongs to the caller.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("could not retrieve {url}: {message}")]
    Transport { url: String, message: String },

    #[error("unexpected HTTP status {status} for {url}")]
    BadStatus { url: String, status: u16 },

    #[error("I/O error while writing download: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Io {
            message: err.to_string(),
        }
    }
}

/// Errors from zip extraction. Extraction aborts on the first error and
/// already-extracted entries are left in place.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid archive: {message}")]
    Archive { message: String },

    #[error("I/O error during extraction: {message}")]
    Io { message: String },
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(err: zip::result::ZipError) -> Self {
        ExtractError::Archive {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::Io {
            message: err.to_string(),
        }
    }
}

/// Errors from the installation store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error in installation store: {message}")]
    Io { message: String },

    #[error("npm archive did not contain the expected {expected} directory")]
    ArchiveLayout { expected: String },

    #[error("{0}")]
    Extract(#[from] ExtractError),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io {
            message: err.to_string(),
        }
    }
}

/// Errors from the install orchestration. `AlreadyInstalled` and
/// `NotAvailable` are informational aborts, not error exits;
/// `PartialInstall` carries the directory left on disk so the user can
/// finish the installation manually.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("version {version} is already installed")]
    AlreadyInstalled { version: String },

    #[error("version {version} is not available")]
    NotAvailable { version: String },

    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("could not download the node.js executable for version {version}: {reason}")]
    RuntimeDownload { version: String, reason: String },

    #[error("npm v{npm_version} could not be added to {}: {reason}", .dir.display())]
    PartialInstall {
        version: String,
        npm_version: String,
        dir: PathBuf,
        reason: String,
    },

    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Errors from the privileged-execution capability. `Failed` carries the
/// helper's diagnostic output verbatim.
#[derive(Error, Debug)]
pub enum PrivilegeError {
    #[error("failed to run {command}: {message}")]
    Spawn { command: String, message: String },

    #[error("{diagnostic}")]
    Failed { diagnostic: String },
}

/// Errors from the activation switch.
#[derive(Error, Debug)]
pub enum SwitchError {
    #[error("node v{version} is not installed")]
    NotInstalled { version: String },

    #[error("{0}")]
    Privilege(#[from] PrivilegeError),

    #[error("{0}")]
    Store(#[from] StoreError),
}

/// Errors from the persisted settings resource. All of these are fatal at
/// startup, before any command logic runs.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not read settings file {}: {message}", .path.display())]
    Unreadable { path: PathBuf, message: String },

    #[error("settings file is missing the \"{key}\" entry")]
    MissingKey { key: String },

    #[error("{} could not be found or does not exist", .root.display())]
    RootMissing { root: PathBuf },

    #[error("could not determine the user configuration directory")]
    NoConfigDir,

    #[error("I/O error while writing settings: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io {
            message: err.to_string(),
        }
    }
}
