// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared helpers for this crate's unit tests. Credentials are generated
// per test run; no fixture files are checked in.

use std::path::Path;

use openssl::asn1::Asn1Time;
use openssl::bn::BigNum;
use openssl::hash::MessageDigest;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use openssl::x509::{X509, X509NameBuilder};

use pushwerk_core::{ICON_FILES, ICONSET_DIR};

/// Build a throwaway self-signed certificate + RSA key and bundle them as
/// password-protected PKCS#12 DER.
pub(crate) fn test_pkcs12_der(password: &str) -> Vec<u8> {
    let rsa = Rsa::generate(2048).expect("rsa keygen");
    let key = PKey::from_rsa(rsa).expect("pkey");

    let mut name = X509NameBuilder::new().expect("name builder");
    name.append_entry_by_text("CN", "Pushwerk Test Push Certificate")
        .expect("cn");
    let name = name.build();

    let mut builder = X509::builder().expect("x509 builder");
    builder.set_version(2).expect("version");
    let serial = BigNum::from_u32(1)
        .and_then(|bn| bn.to_asn1_integer())
        .expect("serial");
    builder.set_serial_number(&serial).expect("serial");
    builder.set_subject_name(&name).expect("subject");
    builder.set_issuer_name(&name).expect("issuer");
    builder.set_pubkey(&key).expect("pubkey");
    builder
        .set_not_before(&Asn1Time::days_from_now(0).expect("asn1 time"))
        .expect("not before");
    builder
        .set_not_after(&Asn1Time::days_from_now(365).expect("asn1 time"))
        .expect("not after");
    builder.sign(&key, MessageDigest::sha256()).expect("sign");
    let cert = builder.build();

    Pkcs12::builder()
        .name("pushwerk test")
        .pkey(&key)
        .cert(&cert)
        .build2(password)
        .expect("pkcs12 build")
        .to_der()
        .expect("pkcs12 der")
}

/// Write the six required icons (distinct fake bytes each) into
/// `<asset_dir>/icon.iconset/`.
pub(crate) fn populate_iconset(asset_dir: &Path) {
    let iconset = asset_dir.join(ICONSET_DIR);
    std::fs::create_dir_all(&iconset).expect("create iconset dir");
    for icon in ICON_FILES {
        std::fs::write(iconset.join(icon), format!("fake png: {icon}")).expect("write icon");
    }
}
