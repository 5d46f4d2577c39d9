// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content digests — SHA-1 hashing for the package hash manifest.
//
// SHA-1 is not a security boundary here: the push client verifies package
// contents against SHA-1 digests, so the manifest must record exactly that.
// Tamper resistance comes from the PKCS#7 signature over the manifest.

use std::path::Path;

use pushwerk_core::error::{PushwerkError, Result};
use sha1::{Digest, Sha1};

/// Compute the SHA-1 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Read `path` and return the SHA-1 hex digest of its contents.
///
/// I/O errors are propagated; tolerating unreadable files is the caller's
/// decision, not this function's.
pub fn hash_file(path: impl AsRef<Path>) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(hash_bytes(&bytes))
}

/// Verify that `data` matches the expected SHA-1 hex digest.
///
/// Returns `Ok(())` when the hash matches, or
/// `Err(PushwerkError::DigestMismatch)` with the expected and actual values
/// when it does not.
pub fn verify_hash(data: &[u8], expected_hex: &str) -> Result<()> {
    let actual = hash_bytes(data);
    if actual == expected_hex {
        Ok(())
    } else {
        Err(PushwerkError::DigestMismatch {
            expected: expected_hex.to_owned(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-1 of the empty byte slice (well-known constant).
    const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    #[test]
    fn hash_empty_input() {
        assert_eq!(hash_bytes(b""), EMPTY_SHA1);
    }

    #[test]
    fn hash_known_value() {
        // SHA-1("hello") — verified against coreutils sha1sum.
        let expected = "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d";
        assert_eq!(hash_bytes(b"hello"), expected);
    }

    #[test]
    fn hash_file_matches_hash_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        std::fs::write(&path, b"push package payload").unwrap();

        assert_eq!(
            hash_file(&path).unwrap(),
            hash_bytes(b"push package payload")
        );
    }

    #[test]
    fn hash_file_propagates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = hash_file(dir.path().join("absent"));
        assert!(matches!(result, Err(PushwerkError::Io(_))));
    }

    #[test]
    fn verify_matching_hash() {
        let data = b"pushwerk";
        let hex = hash_bytes(data);
        assert!(verify_hash(data, &hex).is_ok());
    }

    #[test]
    fn verify_mismatched_hash() {
        let result = verify_hash(b"a", "0000");
        match result.unwrap_err() {
            PushwerkError::DigestMismatch { expected, actual } => {
                assert_eq!(expected, "0000");
                assert_eq!(actual, hash_bytes(b"a"));
            }
            other => panic!("unexpected error variant: {other}"),
        }
    }
}
