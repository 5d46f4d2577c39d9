// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detached PKCS#7 signing of the hash manifest.
//
// The push client expects the `signature` file to be raw DER, not the
// S/MIME text envelope signing tools emit by default. `Pkcs7::to_der`
// gives us the binary form directly, so no envelope ever exists.
//
// The PKCS#12 credential is parsed once and never written back; a loaded
// identity is safe to share across concurrent builds.

use std::path::Path;

use openssl::error::ErrorStack;
use openssl::pkcs7::{Pkcs7, Pkcs7Flags};
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::stack::Stack;
use openssl::x509::X509;
use openssl::x509::store::X509StoreBuilder;
use tracing::debug;

use pushwerk_core::error::{PushwerkError, Result};

fn credential_err(context: &str, e: ErrorStack) -> PushwerkError {
    PushwerkError::Credential(format!("{context}: {e}"))
}

/// Certificate and private key unlocked from a PKCS#12 bundle.
pub struct SigningIdentity {
    cert: X509,
    key: PKey<Private>,
    /// Intermediate certificates bundled alongside the leaf, embedded in
    /// every signature so clients can build the chain.
    chain: Stack<X509>,
}

impl SigningIdentity {
    /// Read and unlock a PKCS#12 bundle from disk.
    pub fn from_pkcs12_file(path: impl AsRef<Path>, password: &str) -> Result<Self> {
        let path = path.as_ref();
        let der = std::fs::read(path).map_err(|e| {
            PushwerkError::Credential(format!(
                "cannot read credential bundle {}: {e}",
                path.display()
            ))
        })?;
        Self::from_pkcs12_der(&der, password)
    }

    /// Unlock a PKCS#12 bundle already held in memory.
    ///
    /// Fails with a credential error when the bundle is malformed, the
    /// password is wrong, or the bundle is missing its certificate or key.
    pub fn from_pkcs12_der(der: &[u8], password: &str) -> Result<Self> {
        let pkcs12 =
            Pkcs12::from_der(der).map_err(|e| credential_err("malformed PKCS#12 bundle", e))?;
        let parsed = pkcs12
            .parse2(password)
            .map_err(|e| credential_err("cannot unlock PKCS#12 bundle", e))?;

        let cert = parsed
            .cert
            .ok_or_else(|| PushwerkError::Credential("bundle has no certificate".into()))?;
        let key = parsed
            .pkey
            .ok_or_else(|| PushwerkError::Credential("bundle has no private key".into()))?;
        let chain = match parsed.ca {
            Some(ca) => ca,
            None => Stack::new().map_err(|e| credential_err("cannot allocate chain", e))?,
        };

        debug!(chain_len = chain.len(), "signing identity loaded");
        Ok(Self { cert, key, chain })
    }

    /// Produce a detached, binary-mode PKCS#7 signature over `data`,
    /// returned as raw DER.
    ///
    /// Detached means the signature does not embed `data`; binary mode
    /// suppresses the MIME canonicalisation that would otherwise rewrite
    /// line endings inside the signed content.
    pub fn sign_detached(&self, data: &[u8]) -> Result<Vec<u8>> {
        let flags = Pkcs7Flags::DETACHED | Pkcs7Flags::BINARY;
        let pkcs7 = Pkcs7::sign(&self.cert, &self.key, &self.chain, data, flags)
            .map_err(|e| PushwerkError::Signing(e.to_string()))?;

        let der = pkcs7
            .to_der()
            .map_err(|e| PushwerkError::Encoding(e.to_string()))?;

        debug!(content_len = data.len(), der_len = der.len(), "manifest signed");
        Ok(der)
    }

    /// Verify a detached DER signature against `data`.
    ///
    /// The signature's embedded certificate is used for the check; chain
    /// validation against a trust store is deliberately skipped — callers
    /// that need full chain validation own that policy.
    pub fn verify_detached(&self, data: &[u8], signature_der: &[u8]) -> Result<()> {
        let pkcs7 = Pkcs7::from_der(signature_der)
            .map_err(|e| PushwerkError::Encoding(format!("signature is not valid DER: {e}")))?;

        let certs = Stack::new().map_err(|e| PushwerkError::SignatureInvalid(e.to_string()))?;
        let store = X509StoreBuilder::new()
            .map_err(|e| PushwerkError::SignatureInvalid(e.to_string()))?
            .build();

        pkcs7
            .verify(
                &certs,
                &store,
                Some(data),
                None,
                Pkcs7Flags::BINARY | Pkcs7Flags::NOVERIFY,
            )
            .map_err(|e| PushwerkError::SignatureInvalid(e.to_string()))
    }
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("chain_len", &self.chain.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_pkcs12_der as test_bundle;

    #[test]
    fn unlock_bundle_with_correct_password() {
        let der = test_bundle("hunter2-hunter2!");
        SigningIdentity::from_pkcs12_der(&der, "hunter2-hunter2!").expect("unlock failed");
    }

    #[test]
    fn wrong_password_is_credential_error() {
        let der = test_bundle("correct");
        let err = SigningIdentity::from_pkcs12_der(&der, "wrong").unwrap_err();
        assert!(matches!(err, PushwerkError::Credential(_)));
    }

    #[test]
    fn garbage_bundle_is_credential_error() {
        let err = SigningIdentity::from_pkcs12_der(b"not a pkcs12", "pw").unwrap_err();
        assert!(matches!(err, PushwerkError::Credential(_)));
    }

    #[test]
    fn missing_bundle_file_is_credential_error() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            SigningIdentity::from_pkcs12_file(dir.path().join("absent.p12"), "pw").unwrap_err();
        assert!(matches!(err, PushwerkError::Credential(_)));
    }

    #[test]
    fn signature_is_der_not_pem() {
        let der = test_bundle("pw");
        let identity = SigningIdentity::from_pkcs12_der(&der, "pw").unwrap();

        let sig = identity.sign_detached(b"{\"website.json\":\"abc\"}").unwrap();

        // ASN.1 SEQUENCE tag, never a text envelope.
        assert_eq!(sig[0], 0x30);
        assert!(!sig.windows(5).any(|w| w == b"-----"));
    }

    #[test]
    fn detached_signature_omits_content() {
        let der = test_bundle("pw");
        let identity = SigningIdentity::from_pkcs12_der(&der, "pw").unwrap();

        let content = b"this exact phrase must not appear in the signature";
        let sig = identity.sign_detached(content).unwrap();
        assert!(
            !sig.windows(content.len()).any(|w| w == content),
            "detached signature embedded the signed content"
        );
    }

    #[test]
    fn sign_then_verify_round_trip() {
        let der = test_bundle("pw");
        let identity = SigningIdentity::from_pkcs12_der(&der, "pw").unwrap();

        let manifest = b"{\"icon.iconset/icon_16x16.png\":\"da39a3ee\"}";
        let sig = identity.sign_detached(manifest).unwrap();
        identity.verify_detached(manifest, &sig).expect("verify failed");
    }

    #[test]
    fn verify_rejects_tampered_content() {
        let der = test_bundle("pw");
        let identity = SigningIdentity::from_pkcs12_der(&der, "pw").unwrap();

        let sig = identity.sign_detached(b"original manifest bytes").unwrap();
        let err = identity
            .verify_detached(b"original manifest bytez", &sig)
            .unwrap_err();
        assert!(matches!(err, PushwerkError::SignatureInvalid(_)));
    }

    #[test]
    fn verify_rejects_non_der_signature() {
        let der = test_bundle("pw");
        let identity = SigningIdentity::from_pkcs12_der(&der, "pw").unwrap();

        let err = identity
            .verify_detached(b"content", b"-----BEGIN PKCS7-----")
            .unwrap_err();
        assert!(matches!(err, PushwerkError::Encoding(_)));
    }
}
