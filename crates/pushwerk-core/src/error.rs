// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pushwerk.

use thiserror::Error;

/// Top-level error type for all Pushwerk operations.
#[derive(Debug, Error)]
pub enum PushwerkError {
    // -- Setup errors --
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid subscriber token: {0}")]
    InvalidToken(String),

    // -- Build pipeline --
    #[error("workspace error: {0}")]
    Workspace(String),

    /// An individual package asset could not be read. Non-fatal: recorded
    /// and the build proceeds in degraded form.
    #[error("asset error: {0}")]
    Asset(String),

    #[error("archive error: {0}")]
    Archive(String),

    // -- Signing --
    #[error("credential error: {0}")]
    Credential(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("signature encoding failed: {0}")]
    Encoding(String),

    // -- Verification --
    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("signature verification failed: {0}")]
    SignatureInvalid(String),

    // -- Registry --
    #[error("registration error: {0}")]
    Registration(String),

    // -- I/O and serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PushwerkError>;
