// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Final archive construction.
//
// Entry names are fixed by the push package layout: icons keep their
// icon.iconset/ prefix, the three generated files sit flat at the root.
// The archive is only valid once finalized; an unfinished zip is garbage.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use pushwerk_core::ARCHIVE_NAME;
use pushwerk_core::error::{PushwerkError, Result};

fn zip_err(e: zip::result::ZipError) -> PushwerkError {
    PushwerkError::Archive(e.to_string())
}

/// Pack `entries` (source path, archive-relative name) into
/// `pushpackage.zip` under `root` and return the archive's absolute path.
///
/// An unreadable source entry is logged and skipped — the archive is still
/// produced, possibly incomplete. Failure to create or finalize the
/// archive itself is fatal.
pub fn assemble(root: &Path, entries: &[(PathBuf, String)]) -> Result<PathBuf> {
    let archive_path = root.join(ARCHIVE_NAME);
    let file = std::fs::File::create(&archive_path).map_err(|e| {
        PushwerkError::Archive(format!("cannot create {}: {e}", archive_path.display()))
    })?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut added = 0usize;
    for (source, name) in entries {
        let bytes = match std::fs::read(source) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(source = %source.display(), entry = %name, error = %e,
                    "archive entry unreadable, skipping");
                continue;
            }
        };
        zip.start_file(name.as_str(), options).map_err(zip_err)?;
        zip.write_all(&bytes)
            .map_err(|e| PushwerkError::Archive(format!("cannot write entry {name}: {e}")))?;
        added += 1;
    }

    zip.finish().map_err(zip_err)?;
    debug!(archive = %archive_path.display(), entries = added, "archive finalized");

    // The workspace path may be relative to the process cwd; the returned
    // archive path must not be.
    Ok(std::fs::canonicalize(&archive_path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    fn entry_names(path: &Path) -> Vec<String> {
        let file = std::fs::File::open(path).unwrap();
        let archive = ZipArchive::new(file).unwrap();
        archive.file_names().map(str::to_owned).collect()
    }

    #[test]
    fn packs_all_readable_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("website.json"), b"{}").unwrap();
        std::fs::create_dir(dir.path().join("icon.iconset")).unwrap();
        std::fs::write(dir.path().join("icon.iconset/icon_16x16.png"), b"png").unwrap();

        let entries = vec![
            (
                dir.path().join("icon.iconset/icon_16x16.png"),
                "icon.iconset/icon_16x16.png".to_owned(),
            ),
            (dir.path().join("website.json"), "website.json".to_owned()),
        ];

        let archive = assemble(dir.path(), &entries).unwrap();
        assert!(archive.is_absolute());
        assert!(archive.ends_with(ARCHIVE_NAME));

        let mut names = entry_names(&archive);
        names.sort();
        assert_eq!(names, vec!["icon.iconset/icon_16x16.png", "website.json"]);
    }

    #[test]
    fn skips_unreadable_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("website.json"), b"{}").unwrap();

        let entries = vec![
            (dir.path().join("missing.png"), "icon.iconset/missing.png".to_owned()),
            (dir.path().join("website.json"), "website.json".to_owned()),
        ];

        let archive = assemble(dir.path(), &entries).unwrap();
        assert_eq!(entry_names(&archive), vec!["website.json"]);
    }

    #[test]
    fn entry_bytes_survive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let payload = b"detached signature bytes \x00\x30\x82";
        std::fs::write(dir.path().join("signature"), payload).unwrap();

        let entries = vec![(dir.path().join("signature"), "signature".to_owned())];
        let archive = assemble(dir.path(), &entries).unwrap();

        let file = std::fs::File::open(&archive).unwrap();
        let mut zip = ZipArchive::new(file).unwrap();
        let mut entry = zip.by_name("signature").unwrap();
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(&mut entry, &mut bytes).unwrap();
        assert_eq!(bytes, payload);
    }

    #[test]
    fn unwritable_root_is_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing_root = dir.path().join("nope");
        let err = assemble(&missing_root, &[]).unwrap_err();
        assert!(matches!(err, PushwerkError::Archive(_)));
    }
}
