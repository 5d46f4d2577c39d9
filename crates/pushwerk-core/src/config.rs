// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Package build configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PushwerkError, Result};

/// The site identity embedded in every package's `website.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteIdentity {
    /// Display name shown in notification UI.
    pub website_name: String,
    /// Push ID the site registered with the push vendor.
    pub website_push_id: String,
    /// Origins allowed to request permission for this package.
    pub allowed_domains: Vec<String>,
    /// Click-through URL template (`%@` is replaced by the notification
    /// arguments).
    pub url_format_string: String,
    /// Base URL of the registration web service.
    pub web_service_url: String,
}

impl SiteIdentity {
    /// Derive the conventional identity for a site called `name`:
    /// `web.com.<name>.notification` push ID and `https://www.<name>.com`
    /// domain/service URLs, with the display name capitalised.
    pub fn for_site(name: &str) -> Self {
        let mut display = String::from(name);
        if let Some(first) = display.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Self {
            website_name: display,
            website_push_id: format!("web.com.{name}.notification"),
            allowed_domains: vec![format!("https://www.{name}.com")],
            url_format_string: format!("https://www.{name}.com?%@"),
            web_service_url: format!("https://www.{name}.com"),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.website_name.is_empty() {
            return Err(PushwerkError::Configuration(
                "website_name is empty".into(),
            ));
        }
        if self.website_push_id.is_empty() {
            return Err(PushwerkError::Configuration(
                "website_push_id is empty".into(),
            ));
        }
        if self.web_service_url.is_empty() {
            return Err(PushwerkError::Configuration(
                "web_service_url is empty".into(),
            ));
        }
        Ok(())
    }
}

/// Everything a [`PackageBuilder`] needs, supplied explicitly at
/// construction. Nothing here is mutated at runtime.
///
/// [`PackageBuilder`]: ../pushwerk_package/builder/struct.PackageBuilder.html
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Path to the PKCS#12 bundle holding the push certificate and key.
    pub certificate_path: PathBuf,
    /// Import password for the PKCS#12 bundle.
    pub certificate_password: String,
    /// Directory containing the `icon.iconset` source icons.
    pub asset_dir: PathBuf,
    /// Parent directory under which per-build workspaces are created.
    #[serde(default = "default_workspace_parent")]
    pub workspace_parent: PathBuf,
    /// Site identity written into `website.json`.
    pub site: SiteIdentity,
}

fn default_workspace_parent() -> PathBuf {
    std::env::temp_dir()
}

impl PackageConfig {
    /// Check that every required field is present and non-empty.
    ///
    /// Performed once before any filesystem mutation; a failure here means
    /// no package can ever be produced from this configuration.
    pub fn validate(&self) -> Result<()> {
        if self.certificate_path.as_os_str().is_empty() {
            return Err(PushwerkError::Configuration(
                "certificate_path is empty".into(),
            ));
        }
        if self.certificate_password.is_empty() {
            return Err(PushwerkError::Configuration(
                "certificate_password is empty".into(),
            ));
        }
        if self.asset_dir.as_os_str().is_empty() {
            return Err(PushwerkError::Configuration("asset_dir is empty".into()));
        }
        if self.workspace_parent.as_os_str().is_empty() {
            return Err(PushwerkError::Configuration(
                "workspace_parent is empty".into(),
            ));
        }
        self.site.validate()
    }
}
