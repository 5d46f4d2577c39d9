// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Website descriptor and hash manifest construction.
//
// The descriptor carries the site identity plus the per-subscriber
// authentication token. The manifest maps every package-relative path
// (icons + website.json) to its SHA-1 digest; the signature in the next
// pipeline stage is computed over the manifest's exact serialized bytes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pushwerk_core::error::{PushwerkError, Result};
use pushwerk_core::{MIN_TOKEN_LEN, SiteIdentity, WebsiteDescriptor};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::digest;

/// Build the `website.json` payload for one subscriber.
///
/// An empty token is a hard error raised before anything touches the
/// filesystem. Tokens shorter than [`MIN_TOKEN_LEN`] are accepted but
/// logged: the package will assemble and sign correctly, yet the
/// subscribing client is known to reject it.
pub fn descriptor(site: &SiteIdentity, token: &str) -> Result<WebsiteDescriptor> {
    if token.is_empty() {
        return Err(PushwerkError::InvalidToken(
            "authentication token is empty".into(),
        ));
    }
    if token.len() < MIN_TOKEN_LEN {
        warn!(
            token_len = token.len(),
            min = MIN_TOKEN_LEN,
            "authentication token below client minimum; package will be rejected"
        );
    }

    Ok(WebsiteDescriptor {
        website_name: site.website_name.clone(),
        website_push_id: site.website_push_id.clone(),
        allowed_domains: site.allowed_domains.clone(),
        url_format_string: site.url_format_string.clone(),
        authentication_token: token.to_owned(),
        web_service_url: site.web_service_url.clone(),
    })
}

/// Map from package-relative path to SHA-1 hex digest.
///
/// Keys use `/` separators and must match archive entry names exactly.
/// `BTreeMap` keeps the serialized form deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashManifest(BTreeMap<String, String>);

impl HashManifest {
    /// Hash every entry under `root`, skipping unreadable files.
    ///
    /// A missing or unreadable entry is recorded with a warning and left
    /// out of the manifest; the build proceeds in degraded form. Hard
    /// failures are reserved for the signing and archive stages.
    pub fn build(root: &Path, entries: &[String]) -> Self {
        let mut hashes = BTreeMap::new();
        for entry in entries {
            let source = entry_source(root, entry);
            match digest::hash_file(&source) {
                Ok(hex) => {
                    hashes.insert(entry.clone(), hex);
                }
                Err(e) => {
                    warn!(entry = %entry, error = %e, "manifest entry unreadable, skipping");
                }
            }
        }
        Self(hashes)
    }

    /// The exact byte serialization that gets written to `manifest.json`
    /// and signed. Compact JSON, deterministic key order.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse a manifest back from its JSON bytes.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Re-hash every recorded file under `root` and fail on the first
    /// mismatch or unreadable file. Used for tamper checks.
    pub fn verify(&self, root: &Path) -> Result<()> {
        for (entry, expected) in &self.0 {
            let bytes = std::fs::read(entry_source(root, entry))?;
            digest::verify_hash(&bytes, expected)?;
        }
        Ok(())
    }

    pub fn digest_for(&self, entry: &str) -> Option<&str> {
        self.0.get(entry).map(String::as_str)
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.0.contains_key(entry)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolve a `/`-separated package-relative entry to its on-disk source.
fn entry_source(root: &Path, entry: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for part in entry.split('/') {
        path.push(part);
    }
    path
}
