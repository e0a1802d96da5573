//! Privileged command execution capability
//!
//! Repointing the active-version symlink needs elevated filesystem
//! operations. The switch builds the argv; how elevation happens is owned
//! by this capability, so the switch has no platform knowledge and tests
//! can substitute a fake.

use crate::errors::PrivilegeError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Runs an argv with elevated privileges, returning the command's stdout.
/// A failed step must surface the underlying diagnostic output verbatim.
#[async_trait]
pub trait PrivilegedRunner: Send + Sync {
    async fn run(&self, argv: &[String]) -> Result<String, PrivilegeError>;
}

/// Production runner: shells out through the elevation helper that ships
/// in the installation root.
pub struct ElevatedRunner {
    elevate_path: PathBuf,
}

impl ElevatedRunner {
    pub fn new(root: &Path) -> Self {
        Self {
            elevate_path: root.join("elevate.cmd"),
        }
    }
}

#[async_trait]
impl PrivilegedRunner for ElevatedRunner {
    async fn run(&self, argv: &[String]) -> Result<String, PrivilegeError> {
        let output = Command::new(&self.elevate_path)
            .args(argv)
            .output()
            .await
            .map_err(|e| PrivilegeError::Spawn {
                command: self.elevate_path.display().to_string(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(PrivilegeError::Failed {
                diagnostic: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }
}
