//! Signed session tokens, minted at login and checked by the gate.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::Error, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Session lifetime. Also the cookie Max-Age, so browser and token expire
/// together.
pub const TOKEN_TTL_SECONDS: i64 = 86_400;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier
    pub id: i32,
    /// User email
    pub email: String,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration time (unix timestamp)
    pub exp: i64,
}

impl Claims {
    fn new(user_id: i32, email: &str, ttl_seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + ttl_seconds,
        }
    }
}

/// Sign a session token for the given user.
///
/// # Errors
/// Returns an error if serialization or signing fails.
pub fn issue(user_id: i32, email: &str, secret: &str) -> Result<String, Error> {
    issue_with_ttl(user_id, email, secret, TOKEN_TTL_SECONDS)
}

fn issue_with_ttl(
    user_id: i32,
    email: &str,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, Error> {
    let claims = Claims::new(user_id, email, ttl_seconds);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode a session token, checking signature and expiry.
///
/// # Errors
/// Returns an error for a malformed, forged, or expired token.
pub fn verify(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_and_verify_round_trip() {
        let token = issue(7, "admin@kampuso.dev", SECRET).unwrap();
        let claims = verify(&token, SECRET).unwrap();

        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "admin@kampuso.dev");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = issue(7, "admin@kampuso.dev", SECRET).unwrap();
        assert!(verify(&token, "other-secret").is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        // Past the default validation leeway of 60 seconds.
        let token = issue_with_ttl(7, "admin@kampuso.dev", SECRET, -120).unwrap();
        assert!(verify(&token, SECRET).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(verify("not-a-token", SECRET).is_err());
    }
}
