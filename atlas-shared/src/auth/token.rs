/// Opaque bearer-token utilities
///
/// Session tokens are 32 bytes of OS-CSPRNG entropy, URL-safe base64 without
/// padding (43 characters). Only the SHA-256 hex digest is ever stored; the
/// plaintext exists only in the response that issued it.
///
/// # Example
///
/// ```
/// use atlas_shared::auth::token::{generate_token, hash_token};
///
/// let (token, hash) = generate_token();
/// assert_eq!(token.len(), 43);
/// assert_eq!(hash, hash_token(&token));
/// ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Bytes of entropy per token
const TOKEN_ENTROPY_BYTES: usize = 32;

/// Length of an encoded token (32 bytes base64url, no padding)
pub const TOKEN_LENGTH: usize = 43;

/// Generates a new bearer token
///
/// Returns the plaintext token and its SHA-256 hex digest for storage.
/// The plaintext must be handed to the client exactly once and forgotten.
pub fn generate_token() -> (String, String) {
    let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);

    let token = URL_SAFE_NO_PAD.encode(bytes);
    let hash = hash_token(&token);

    (token, hash)
}

/// Hashes a bearer token with SHA-256
///
/// Returns the hex-encoded digest (64 characters). Deterministic, so the
/// presented token can be matched against the stored digest without ever
/// persisting the plaintext.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length_and_charset() {
        let (token, _) = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_token();
        let (b, _) = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = hash_token("some-token");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_token("t"), hash_token("t"));
        assert_ne!(hash_token("t"), hash_token("u"));
    }
}
