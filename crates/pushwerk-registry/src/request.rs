// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parsing of inbound push web service requests.
//
// The push client sends:
//   Authorization: ApplePushNotifications <authenticationToken>
//   POST|DELETE /v1/devices/<deviceToken>/registrations/<websitePushID>
//
// Only the pure parsing lives here. Method dispatch (POST registers,
// DELETE deregisters) is ordinary routing and belongs to the embedding
// server.

/// Authorization scheme the push client uses.
pub const AUTHORIZATION_SCHEME: &str = "ApplePushNotifications";

const DEVICES_PREFIX: &str = "/v1/devices/";
const REGISTRATIONS_SEGMENT: &str = "/registrations";

/// Extract the subscriber's authentication token from an `Authorization`
/// header value. Returns `None` when the scheme is missing or the token
/// is empty.
///
/// The token is the same opaque value the package's `website.json` carried
/// as `authenticationToken` — the client echoes it back verbatim.
pub fn subscriber_from_authorization(header: &str) -> Option<String> {
    let rest = header.trim().strip_prefix(AUTHORIZATION_SCHEME)?;
    let token = rest.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_owned())
    }
}

/// A parsed registration path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRegistration {
    /// The client's push device token.
    pub device_token: String,
    /// Website push ID named in the path, when present.
    pub website_push_id: Option<String>,
}

/// Parse `/v1/devices/<deviceToken>/registrations/<websitePushID>`.
///
/// Returns `None` for any path that does not carry a non-empty device
/// token between the fixed prefix and the registrations segment. A query
/// string after the push ID is ignored.
pub fn device_registration_from_path(path: &str) -> Option<DeviceRegistration> {
    let rest = path.strip_prefix(DEVICES_PREFIX)?;
    let (device_token, after) = rest.split_once(REGISTRATIONS_SEGMENT)?;
    if device_token.is_empty() || device_token.contains('/') {
        return None;
    }

    let website_push_id = after
        .strip_prefix('/')
        .map(|id| id.split('?').next().unwrap_or(""))
        .filter(|id| !id.is_empty())
        .map(str::to_owned);

    Some(DeviceRegistration {
        device_token: device_token.to_owned(),
        website_push_id,
    })
}
