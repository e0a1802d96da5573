//! Shared test fixtures

pub mod dist_server;

use crate::errors::PrivilegeError;
use crate::privilege::PrivilegedRunner;
use async_trait::async_trait;
use std::io::Write;
use std::sync::Mutex;

/// Build an npm source zip with the upstream layout: a single top-level
/// `npm-«version»` directory holding `bin/npm`, `bin/npm.cmd` and the
/// module tree.
pub fn npm_fixture_zip(npm_version: &str) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buf);
        let options = zip::write::SimpleFileOptions::default();
        let top = format!("npm-{}", npm_version);

        writer.add_directory(format!("{}/", top), options).unwrap();
        writer
            .add_directory(format!("{}/bin/", top), options)
            .unwrap();
        writer
            .start_file(format!("{}/bin/npm", top), options.unix_permissions(0o755))
            .unwrap();
        writer.write_all(b"#!/bin/sh\nnode npm-cli.js\n").unwrap();
        writer
            .start_file(format!("{}/bin/npm.cmd", top), options)
            .unwrap();
        writer.write_all(b"@node npm-cli.js %*\r\n").unwrap();
        writer
            .start_file(format!("{}/lib/npm.js", top), options)
            .unwrap();
        writer.write_all(b"module.exports = {}\n").unwrap();
        writer
            .start_file(format!("{}/package.json", top), options)
            .unwrap();
        writer
            .write_all(format!("{{\"version\":\"{}\"}}", npm_version).as_bytes())
            .unwrap();
        writer.finish().unwrap();
    }
    buf.into_inner()
}

/// Fake privileged runner. It interprets the switch's argv contract
/// (`cmd /C rmdir «link»` and `cmd /C mklink /D «link» «target»`) against
/// the local filesystem so tests can assert real link state, and records
/// every invocation.
pub struct FakeElevator {
    calls: Mutex<Vec<Vec<String>>>,
    fail_next: Mutex<Option<String>>,
}

impl FakeElevator {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
        }
    }

    /// Make the next invocation fail with the given diagnostic.
    pub fn fail_next(&self, diagnostic: &str) {
        *self.fail_next.lock().unwrap() = Some(diagnostic.to_string());
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for FakeElevator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrivilegedRunner for FakeElevator {
    async fn run(&self, argv: &[String]) -> Result<String, PrivilegeError> {
        self.calls.lock().unwrap().push(argv.to_vec());

        if let Some(diagnostic) = self.fail_next.lock().unwrap().take() {
            return Err(PrivilegeError::Failed { diagnostic });
        }

        match argv {
            [_, _, op, link] if op == "rmdir" => {
                std::fs::remove_file(link).map_err(|e| PrivilegeError::Failed {
                    diagnostic: e.to_string(),
                })?;
            }
            [_, _, op, _, link, target] if op == "mklink" => {
                #[cfg(unix)]
                std::os::unix::fs::symlink(target, link).map_err(|e| {
                    PrivilegeError::Failed {
                        diagnostic: e.to_string(),
                    }
                })?;
            }
            other => {
                return Err(PrivilegeError::Failed {
                    diagnostic: format!("unexpected argv: {:?}", other),
                })
            }
        }
        Ok(String::new())
    }
}
