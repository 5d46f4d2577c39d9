// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Pushwerk push package service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directory inside the package that holds the icon set.
pub const ICONSET_DIR: &str = "icon.iconset";

/// The required package icons. Every push package carries exactly this set.
pub const ICON_FILES: [&str; 6] = [
    "icon_16x16.png",
    "icon_16x16@2x.png",
    "icon_32x32.png",
    "icon_32x32@2x.png",
    "icon_128x128.png",
    "icon_128x128@2x.png",
];

/// Website descriptor file name (flat at the package root).
pub const WEBSITE_JSON: &str = "website.json";

/// Hash manifest file name (flat at the package root).
pub const MANIFEST_JSON: &str = "manifest.json";

/// Detached signature file name (flat at the package root).
pub const SIGNATURE_FILE: &str = "signature";

/// Name of the finished archive inside the build workspace.
pub const ARCHIVE_NAME: &str = "pushpackage.zip";

/// Minimum authentication token length accepted by push-subscribing
/// clients. Shorter tokens produce a package the client will reject.
pub const MIN_TOKEN_LEN: usize = 16;

/// Archive-relative path for one icon (always `/`-separated).
pub fn icon_entry(icon: &str) -> String {
    format!("{ICONSET_DIR}/{icon}")
}

/// Archive-relative paths of the full icon set.
pub fn iconset_entries() -> Vec<String> {
    ICON_FILES.iter().map(|i| icon_entry(i)).collect()
}

/// Unique identifier for one package build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildId(pub Uuid);

impl BuildId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BuildId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `website.json` payload shipped inside every push package.
///
/// Key names are fixed by the push protocol and must serialize exactly as
/// written here. The descriptor is immutable once written into a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteDescriptor {
    #[serde(rename = "websiteName")]
    pub website_name: String,
    #[serde(rename = "websitePushID")]
    pub website_push_id: String,
    #[serde(rename = "allowedDomains")]
    pub allowed_domains: Vec<String>,
    #[serde(rename = "urlFormatString")]
    pub url_format_string: String,
    /// Opaque per-subscriber token echoed back by the client on every
    /// registration call.
    #[serde(rename = "authenticationToken")]
    pub authentication_token: String,
    #[serde(rename = "webServiceURL")]
    pub web_service_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iconset_entries_are_slash_separated() {
        let entries = iconset_entries();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0], "icon.iconset/icon_16x16.png");
        assert!(entries.iter().all(|e| !e.contains('\\')));
    }

    #[test]
    fn build_ids_are_unique() {
        assert_ne!(BuildId::new(), BuildId::new());
    }

    #[test]
    fn descriptor_serializes_fixed_keys() {
        let descriptor = WebsiteDescriptor {
            website_name: "Example".into(),
            website_push_id: "web.com.example.notification".into(),
            allowed_domains: vec!["https://www.example.com".into()],
            url_format_string: "https://www.example.com?%@".into(),
            authentication_token: "0123456789abcdef".into(),
            web_service_url: "https://www.example.com".into(),
        };

        let json = serde_json::to_string(&descriptor).unwrap();
        for key in [
            "websiteName",
            "websitePushID",
            "allowedDomains",
            "urlFormatString",
            "authenticationToken",
            "webServiceURL",
        ] {
            assert!(json.contains(key), "missing key {key} in {json}");
        }
    }
}
