//! Core library for nodeup, a side-by-side version manager for the
//! node.js runtime.
//!
//! Versions are installed next to each other under a single root directory
//! and exactly one of them is made "active" through a directory symlink that
//! sits on the system PATH. The library is organized around that lifecycle:
//!
//! - **Catalog** (`catalog`): the remote version catalog and "latest"
//!   resolution against the upstream checksum listing
//! - **Fetching** (`fetch`): streaming artifact downloads with a strict
//!   HTTP 200 success contract
//! - **Extraction** (`archive`): unpacking the npm source zip
//! - **Store** (`store`): the on-disk layout of installed versions
//! - **Install orchestration** (`install`): resolve, fetch, and assemble a
//!   version directory from the runtime binary and the npm archive
//! - **Activation** (`switch`, `privilege`): repointing the active-version
//!   symlink through an elevation capability
//! - **Settings** (`settings`): the persisted root/symlink configuration
//!
//! Every component takes its configuration (root path, symlink path, base
//! URLs) as explicit constructor values; nothing is process-global. One
//! process invocation performs one top-level operation and exits, so all
//! I/O is awaited sequentially and no locking is done.

pub mod archive;
pub mod catalog;
pub mod errors;
pub mod fetch;
pub mod install;
pub mod privilege;
pub mod settings;
pub mod store;
pub mod switch;

pub use catalog::{Catalog, CatalogClient};
pub use errors::{
    CatalogError, ExtractError, FetchError, InstallError, PrivilegeError, SettingsError,
    StoreError, SwitchError,
};
pub use fetch::Fetcher;
pub use install::{InstallReport, Installer};
pub use privilege::{ElevatedRunner, PrivilegedRunner};
pub use settings::Settings;
pub use store::InstallationStore;
pub use switch::ActivationSwitch;

#[cfg(test)]
pub mod test_utils;
