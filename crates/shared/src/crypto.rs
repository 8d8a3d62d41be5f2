//! Cryptographic utilities for webhook verification and reference generation.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes base64(HMAC-SHA256(secret, body)) for a webhook payload.
pub fn webhook_signature(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Verifies a received webhook signature against the raw request body.
///
/// The comparison is constant-time (delegated to `Mac::verify_slice`).
/// Returns false for signatures that are not valid base64.
pub fn verify_webhook_signature(secret: &str, body: &[u8], received: &str) -> bool {
    let Ok(received_bytes) = BASE64.decode(received) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    mac.verify_slice(&received_bytes).is_ok()
}

/// Generates a random 16-character lowercase hex donation reference.
pub fn generate_reference() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
