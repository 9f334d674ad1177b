// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook signature verification for the LINE platform.
//!
//! LINE signs every webhook delivery with HMAC-SHA256 over the raw request
//! body, keyed by the channel secret, and sends the base64 digest in the
//! `X-Line-Signature` header. Verification must happen on the raw bytes
//! before any JSON parsing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verify an `X-Line-Signature` value against the raw request body.
///
/// Returns `false` for malformed base64 as well as digest mismatch; the
/// comparison itself is constant-time via `Mac::verify_slice`.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature_b64: &str) -> bool {
    let Ok(expected) = BASE64.decode(signature_b64) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Compute the signature LINE would send for a body. Used by tests and
/// local tooling to forge valid webhook requests.
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}
