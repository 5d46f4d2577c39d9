// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Package build orchestration.
//
// One build runs strictly sequentially: workspace → icons → website.json
// → manifest.json → signature → pushpackage.zip. Asset problems degrade
// the package; configuration, workspace, signing, and archive problems
// abort it. Isolation between concurrent builds is purely by unique
// workspace naming — no locking.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use pushwerk_core::config::PackageConfig;
use pushwerk_core::error::{PushwerkError, Result};
use pushwerk_core::{
    BuildId, ICON_FILES, ICONSET_DIR, MANIFEST_JSON, SIGNATURE_FILE, WEBSITE_JSON, icon_entry,
    iconset_entries,
};

use crate::archive;
use crate::manifest::{self, HashManifest};
use crate::signer::SigningIdentity;
use crate::workspace::Workspace;

/// Builds push packages from a fixed configuration.
///
/// The configuration is validated and the PKCS#12 credential unlocked once
/// at construction; the credential is read-only afterwards, so one builder
/// can serve concurrent builds from behind an `Arc`.
#[derive(Debug)]
pub struct PackageBuilder {
    config: PackageConfig,
    identity: SigningIdentity,
}

impl PackageBuilder {
    /// Validate `config` and load the signing credential.
    pub fn new(config: PackageConfig) -> Result<Self> {
        config.validate()?;
        let identity = SigningIdentity::from_pkcs12_file(
            &config.certificate_path,
            &config.certificate_password,
        )?;
        Ok(Self { config, identity })
    }

    pub fn config(&self) -> &PackageConfig {
        &self.config
    }

    /// Assemble a signed push package for one subscriber.
    ///
    /// The token is validated before the workspace exists, so an invalid
    /// token never touches the filesystem. On any fatal error the
    /// workspace guard removes whatever was written.
    #[instrument(skip_all, fields(token_len = token.len()))]
    pub fn build(&self, token: &str) -> Result<BuiltPackage> {
        let descriptor = manifest::descriptor(&self.config.site, token)?;
        let descriptor_bytes = serde_json::to_vec(&descriptor)?;

        let workspace = Workspace::create(&self.config.workspace_parent)?;

        let missing_assets = self.copy_icons(&workspace)?;

        std::fs::write(workspace.join(WEBSITE_JSON), &descriptor_bytes)?;

        // The manifest covers the icons plus website.json; never itself or
        // the signature.
        let mut manifest_entries = iconset_entries();
        manifest_entries.push(WEBSITE_JSON.to_owned());
        let hash_manifest = HashManifest::build(workspace.path(), &manifest_entries);
        let manifest_bytes = hash_manifest.to_json_bytes()?;
        std::fs::write(workspace.join(MANIFEST_JSON), &manifest_bytes)?;

        // Signed over the exact bytes just written.
        let signature = self.identity.sign_detached(&manifest_bytes)?;
        std::fs::write(workspace.join(SIGNATURE_FILE), &signature)?;

        let mut zip_entries: Vec<(PathBuf, String)> = ICON_FILES
            .iter()
            .map(|icon| (workspace.join(&icon_entry(icon)), icon_entry(icon)))
            .collect();
        for name in [WEBSITE_JSON, MANIFEST_JSON, SIGNATURE_FILE] {
            zip_entries.push((workspace.join(name), name.to_owned()));
        }
        let archive_path = archive::assemble(workspace.path(), &zip_entries)?;

        if missing_assets.is_empty() {
            info!(build = %workspace.id(), archive = %archive_path.display(), "package built");
        } else {
            warn!(build = %workspace.id(), missing = missing_assets.len(),
                "package built in degraded form");
        }

        Ok(BuiltPackage {
            id: workspace.id(),
            archive_path,
            missing_assets,
            created_at: Utc::now(),
            workspace,
        })
    }

    /// Copy the fixed icon set into the workspace. A missing source icon
    /// is recorded and skipped; the build proceeds in degraded form.
    fn copy_icons(&self, workspace: &Workspace) -> Result<Vec<String>> {
        let iconset_dir = workspace.join(ICONSET_DIR);
        std::fs::create_dir(&iconset_dir).map_err(|e| {
            PushwerkError::Workspace(format!(
                "cannot create iconset dir {}: {e}",
                iconset_dir.display()
            ))
        })?;

        let mut missing = Vec::new();
        for icon in ICON_FILES {
            let source = self.config.asset_dir.join(ICONSET_DIR).join(icon);
            if let Err(e) = std::fs::copy(&source, iconset_dir.join(icon)) {
                let asset = PushwerkError::Asset(format!(
                    "cannot copy icon {}: {e}",
                    source.display()
                ));
                warn!(error = %asset, "icon missing, continuing degraded");
                missing.push(icon_entry(icon));
            }
        }
        Ok(missing)
    }
}

/// A finished package, still backed by its build workspace.
///
/// The archive lives inside the workspace; dropping this value reclaims
/// both. Use [`persist_to`](Self::persist_to) or
/// [`read_archive`](Self::read_archive) to get the artifact out first.
#[derive(Debug)]
pub struct BuiltPackage {
    id: BuildId,
    workspace: Workspace,
    archive_path: PathBuf,
    missing_assets: Vec<String>,
    created_at: DateTime<Utc>,
}

impl BuiltPackage {
    pub fn id(&self) -> BuildId {
        self.id
    }

    /// Absolute path of `pushpackage.zip`, valid until this value drops.
    pub fn archive_path(&self) -> &std::path::Path {
        &self.archive_path
    }

    /// Archive-relative names of icons that could not be sourced.
    pub fn missing_assets(&self) -> &[String] {
        &self.missing_assets
    }

    /// True when any required asset was dropped from the package.
    pub fn is_degraded(&self) -> bool {
        !self.missing_assets.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Read the finished archive into memory.
    pub fn read_archive(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.archive_path)?)
    }

    /// Copy the archive to `dest`, then release the workspace.
    pub fn persist_to(self, dest: impl AsRef<std::path::Path>) -> Result<PathBuf> {
        let dest = dest.as_ref();
        std::fs::copy(&self.archive_path, dest)?;
        Ok(dest.to_path_buf())
    }

    /// Hand ownership of the workspace directory to the caller instead of
    /// deleting it on drop.
    pub fn into_workspace_path(self) -> PathBuf {
        self.workspace.keep()
    }
}
