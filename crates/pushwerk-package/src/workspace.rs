// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scoped build workspaces.
//
// One package build = one uniquely-named directory. Uniqueness comes from
// a v4 UUID, never from wall-clock time: two builds in the same tick must
// not collide. The directory is removed when the guard drops, on every
// exit path; `sweep_stale` reclaims directories orphaned by a crash.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

use pushwerk_core::BuildId;
use pushwerk_core::error::{PushwerkError, Result};

/// Name prefix of every build workspace directory.
pub const WORKSPACE_PREFIX: &str = "pushwerk-";

/// An exclusively-owned build directory, deleted on drop.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    id: BuildId,
    armed: bool,
}

impl Workspace {
    /// Create a fresh workspace under `parent`.
    ///
    /// The parent is created if missing; the workspace directory itself
    /// must not already exist. No retry on collision — the caller may
    /// simply invoke again, which draws a new UUID.
    pub fn create(parent: &Path) -> Result<Self> {
        std::fs::create_dir_all(parent).map_err(|e| {
            PushwerkError::Workspace(format!(
                "cannot create workspace parent {}: {e}",
                parent.display()
            ))
        })?;

        let id = BuildId::new();
        let root = parent.join(format!("{WORKSPACE_PREFIX}{id}"));
        std::fs::create_dir(&root).map_err(|e| {
            PushwerkError::Workspace(format!("cannot create workspace {}: {e}", root.display()))
        })?;

        debug!(workspace = %root.display(), "workspace created");
        Ok(Self {
            root,
            id,
            armed: true,
        })
    }

    pub fn id(&self) -> BuildId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a `/`-separated package-relative entry inside this
    /// workspace.
    pub fn join(&self, entry: &str) -> PathBuf {
        let mut path = self.root.clone();
        for part in entry.split('/') {
            path.push(part);
        }
        path
    }

    /// Disarm cleanup and hand back the directory path. The caller now
    /// owns deletion.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        self.root.clone()
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.root) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(workspace = %self.root.display(), error = %e,
                    "workspace cleanup failed; sweep_stale will reclaim it");
            }
        } else {
            debug!(workspace = %self.root.display(), "workspace removed");
        }
    }
}

/// Delete workspace directories under `parent` older than `max_age`.
///
/// Covers builds that crashed before their guard could run. Only
/// directories carrying the workspace prefix are touched; individual
/// removal failures are logged and skipped. Returns the number of
/// directories removed. A missing parent is a no-op.
pub fn sweep_stale(parent: &Path, max_age: Duration) -> Result<usize> {
    let entries = match std::fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(PushwerkError::Workspace(format!(
                "cannot read workspace parent {}: {e}",
                parent.display()
            )));
        }
    };

    let mut removed = 0usize;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "unreadable directory entry during sweep");
                continue;
            }
        };

        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with(WORKSPACE_PREFIX) {
            continue;
        }

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.elapsed().ok());
        let Some(age) = age else { continue };

        if age >= max_age {
            match std::fs::remove_dir_all(&path) {
                Ok(()) => {
                    debug!(workspace = %path.display(), "stale workspace removed");
                    removed += 1;
                }
                Err(e) => {
                    warn!(workspace = %path.display(), error = %e, "stale workspace removal failed");
                }
            }
        }
    }
    Ok(removed)
}
