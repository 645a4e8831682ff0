/// Opaque session token generation
///
/// Sessions are server-side rows keyed by a random token; the token
/// itself carries no claims and is never parsed, only looked up.
use rand::RngCore;

/// Byte length of the raw token (hex-encoded to 64 characters).
const TOKEN_BYTES: usize = 32;

/// Generate a cryptographically random session token.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_64_hex_chars() {
        let token = generate_session_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_session_token(), generate_session_token());
    }
}
