//! Opaque session and CSRF token generation.
//!
//! The browser holds the raw session token in a cookie; the database only
//! ever sees its SHA-256 hash.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

fn random_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rand::Rng::random(&mut rng);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a cryptographically random session token
/// (32 bytes, base64url-encoded, no padding).
pub fn generate_session_token() -> String {
    random_token()
}

/// Generate the per-session token that mutating forms must echo back.
pub fn generate_csrf_token() -> String {
    random_token()
}

/// SHA-256 hash of a raw session token, hex-encoded.
///
/// This is the value stored in the database as `session.token_hash`.
pub fn hash_session_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare two tokens by their SHA-256 digests, folding every byte so the
/// time taken does not depend on where the inputs first differ.
pub fn tokens_match(expected: &str, submitted: &str) -> bool {
    let a = Sha256::digest(expected.as_bytes());
    let b = Sha256::digest(submitted.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
