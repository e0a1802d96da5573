//! Zip archive extraction
//!
//! Unpacks an archive into a destination directory, preserving the entry
//! hierarchy and (on unix) stored file modes. Extraction aborts on the
//! first I/O error; entries already written stay on disk, matching the
//! fetcher's partial-failure policy.

use crate::errors::ExtractError;
use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

/// Extract every entry of the zip at `archive_path` into `destination`.
/// Entries whose names would escape the destination are skipped.
pub fn extract(archive_path: &Path, destination: &Path) -> Result<(), ExtractError> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let outpath = match entry.enclosed_name() {
            Some(path) => destination.join(path),
            None => {
                log::warn!("skipping archive entry with unsafe path: {}", entry.name());
                continue;
            }
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let mut outfile = File::create(&outpath)?;
            std::io::copy(&mut entry, &mut outfile)?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn write_fixture_zip(path: &Path) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        writer.add_directory("pkg-1.0/", options).unwrap();
        writer.add_directory("pkg-1.0/bin/", options).unwrap();
        writer
            .start_file("pkg-1.0/bin/run", options.unix_permissions(0o755))
            .unwrap();
        writer.write_all(b"#!/bin/sh\necho hi\n").unwrap();
        writer
            .start_file("pkg-1.0/lib/deep/data.txt", options)
            .unwrap();
        writer.write_all(b"nested contents").unwrap();
        writer.start_file("top.txt", options).unwrap();
        writer.write_all(b"top level").unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn extract_reproduces_the_directory_tree() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("fixture.zip");
        write_fixture_zip(&zip_path);
        let dest = dir.path().join("out");

        extract(&zip_path, &dest).unwrap();

        assert!(dest.join("pkg-1.0/bin").is_dir());
        assert_eq!(
            std::fs::read(dest.join("pkg-1.0/bin/run")).unwrap(),
            b"#!/bin/sh\necho hi\n"
        );
        assert_eq!(
            std::fs::read(dest.join("pkg-1.0/lib/deep/data.txt")).unwrap(),
            b"nested contents"
        );
        assert_eq!(std::fs::read(dest.join("top.txt")).unwrap(), b"top level");
    }

    #[cfg(unix)]
    #[test]
    fn extract_preserves_stored_file_modes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("fixture.zip");
        write_fixture_zip(&zip_path);
        let dest = dir.path().join("out");

        extract(&zip_path, &dest).unwrap();

        let mode = std::fs::metadata(dest.join("pkg-1.0/bin/run"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn entries_escaping_the_destination_are_skipped() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("fixture.zip");
        {
            let file = File::create(&zip_path).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            let options = SimpleFileOptions::default();
            writer.start_file("../escape.txt", options).unwrap();
            writer.write_all(b"should not land outside").unwrap();
            writer.start_file("safe.txt", options).unwrap();
            writer.write_all(b"ok").unwrap();
            writer.finish().unwrap();
        }
        let dest = dir.path().join("out");
        std::fs::create_dir_all(&dest).unwrap();

        extract(&zip_path, &dest).unwrap();

        assert!(!dir.path().join("escape.txt").exists());
        assert_eq!(std::fs::read(dest.join("safe.txt")).unwrap(), b"ok");
    }

    #[test]
    fn a_bogus_archive_reports_an_archive_error() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("junk.zip");
        std::fs::write(&zip_path, b"this is not a zip file").unwrap();

        let err = extract(&zip_path, dir.path()).unwrap_err();
        assert!(matches!(err, ExtractError::Archive { .. }));
    }
}
