// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pushwerk-package — the package-assembly pipeline.
//
// A push package is a zip archive with a prescribed layout: six icons under
// icon.iconset/, a website descriptor, a SHA-1 hash manifest over those
// files, and a detached PKCS#7 signature over the manifest. This crate owns
// the whole pipeline from scratch workspace to finished archive.

pub mod archive;
pub mod builder;
pub mod digest;
pub mod manifest;
pub mod signer;
pub mod workspace;

#[cfg(test)]
pub(crate) mod testutil;

pub use builder::{BuiltPackage, PackageBuilder};
pub use digest::{hash_bytes, hash_file, verify_hash};
pub use manifest::HashManifest;
pub use signer::SigningIdentity;
pub use workspace::Workspace;
