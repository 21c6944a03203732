//! Session token generation and fingerprinting.

use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Prefix carried by every server-generated session token.
pub const SESSION_TOKEN_PREFIX: &str = "QR-";

const TOKEN_SUFFIX_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Short, stable identifier for a session token, safe to put in logs.
pub fn token_fingerprint(token: &str) -> String {
    sha256_hex(token)[..12].to_string()
}

/// Generates a session token of the form `QR-<unix millis>-<6 base36 chars>`.
///
/// Same shape the lecturer UI produces when it fills the token itself, so
/// tokens from either source look alike on a printed QR sheet.
pub fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TOKEN_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!(
        "{}{}-{}",
        SESSION_TOKEN_PREFIX,
        Utc::now().timestamp_millis(),
        suffix
    )
}
