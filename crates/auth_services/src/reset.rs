use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

/// How long an issued reset token stays valid.
pub const RESET_TOKEN_TTL_SECONDS: i64 = 3600;

/// Generates a password-reset token: 20 random bytes, hex-encoded.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 20];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Computes the expiry timestamp for a token issued at `issued_at`.
pub fn reset_token_expiry(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + Duration::seconds(RESET_TOKEN_TTL_SECONDS)
}

/// Whether a token with the given expiry is still usable at `now`.
/// Validity is strict: a token issued at T is accepted strictly before
/// T + 3600s and rejected from T + 3600s onward.
pub fn reset_token_is_valid(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now < expires_at
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_40_hex_chars() {
        let token = generate_reset_token();
        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_reset_token(), generate_reset_token());
    }

    #[test]
    fn test_validity_window() {
        let issued_at = Utc::now();
        let expires_at = reset_token_expiry(issued_at);

        assert!(reset_token_is_valid(
            expires_at,
            issued_at + Duration::seconds(3599)
        ));
        assert!(!reset_token_is_valid(
            expires_at,
            issued_at + Duration::seconds(3600)
        ));
        assert!(!reset_token_is_valid(
            expires_at,
            issued_at + Duration::seconds(3601)
        ));
    }
}
