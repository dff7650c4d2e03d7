//! PKCE and state parameter generation for the authorization-code flow

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};

/// Random bytes behind each verifier/state value
const RANDOM_BYTES: usize = 32;

/// Generate a URL-safe random token (43 characters for 32 bytes)
pub fn random_token() -> Result<String, getrandom::Error> {
    let mut bytes = [0u8; RANDOM_BYTES];
    getrandom::getrandom(&mut bytes)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// S256 code challenge for a verifier (RFC 7636 §4.2)
pub fn code_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}
