// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The PushRegistry seam and its in-memory implementation.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use tracing::debug;

use pushwerk_core::error::{PushwerkError, Result};

/// Registration capability the push web service dispatches into.
///
/// `subscriber` is the authenticated identity extracted from the inbound
/// authorization header; `device` is the client's push device token.
/// Implementations decide where registrations live.
pub trait PushRegistry: Send + Sync {
    /// Record that `device` should receive pushes for `subscriber`.
    /// Registering an already-registered device is a no-op.
    fn register_device(&self, subscriber: &str, device: &str) -> Result<()>;

    /// Remove a registration. Deregistering an unknown device is a no-op
    /// (the client retries DELETE freely).
    fn deregister_device(&self, subscriber: &str, device: &str) -> Result<()>;
}

fn validate(subscriber: &str, device: &str) -> Result<()> {
    if subscriber.is_empty() {
        return Err(PushwerkError::Registration("subscriber is empty".into()));
    }
    if device.is_empty() {
        return Err(PushwerkError::Registration("device token is empty".into()));
    }
    Ok(())
}

/// In-memory `PushRegistry` for tests and single-process embedding.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    devices: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device tokens currently registered for `subscriber`, sorted.
    pub fn devices_for(&self, subscriber: &str) -> Vec<String> {
        self.devices
            .read()
            .expect("registry lock poisoned")
            .get(subscriber)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_registered(&self, subscriber: &str, device: &str) -> bool {
        self.devices
            .read()
            .expect("registry lock poisoned")
            .get(subscriber)
            .is_some_and(|set| set.contains(device))
    }
}

impl PushRegistry for MemoryRegistry {
    fn register_device(&self, subscriber: &str, device: &str) -> Result<()> {
        validate(subscriber, device)?;
        let mut devices = self.devices.write().expect("registry lock poisoned");
        let inserted = devices
            .entry(subscriber.to_owned())
            .or_default()
            .insert(device.to_owned());
        debug!(subscriber, device, inserted, "device registered");
        Ok(())
    }

    fn deregister_device(&self, subscriber: &str, device: &str) -> Result<()> {
        validate(subscriber, device)?;
        let mut devices = self.devices.write().expect("registry lock poisoned");
        let removed = devices
            .get_mut(subscriber)
            .is_some_and(|set| set.remove(device));
        if let Some(set) = devices.get(subscriber) {
            if set.is_empty() {
                devices.remove(subscriber);
            }
        }
        debug!(subscriber, device, removed, "device deregistered");
        Ok(())
    }
}
