//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a URL-safe random token from `len` bytes of entropy
pub fn random_token(len: usize) -> String {
    URL_SAFE_NO_PAD.encode(random_bytes(len))
}

/// Sign a message with HMAC-SHA256, encoded as URL-safe base64 (no padding)
pub fn sign(message: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
}

/// Verify a signature produced by [`sign`]
///
/// Recomputes the expected signature and compares it to the supplied one.
/// The length check happens before the constant-time comparison so that
/// unequal-length inputs short-circuit to `false` instead of feeding the
/// timing-safe comparator mismatched buffers.
pub fn verify(message: &str, signature: &str, secret: &str) -> bool {
    let expected = sign(message, secret);
    constant_time_eq(expected.as_bytes(), signature.as_bytes())
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
