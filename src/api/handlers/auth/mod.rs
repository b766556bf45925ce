//! Administrator registration and login.
//!
//! Passwords are bcrypt-hashed before storage and never echoed back. A
//! successful login mints a signed token carried in an `HttpOnly` cookie;
//! the gate in [`crate::api::guard`] checks that cookie on protected paths.

pub mod login;
pub mod password;
pub mod register;
mod storage;
pub mod token;
pub(crate) mod types;

pub use login::login;
pub use register::register;

use axum::http::{header::InvalidHeaderValue, HeaderValue};
use regex::Regex;

/// Name of the session cookie set at login and required by the gate.
pub const TOKEN_COOKIE_NAME: &str = "token";

/// Lightweight email sanity check used by auth handlers before touching the
/// database.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Build the `HttpOnly` cookie carrying the session token.
pub(crate) fn token_cookie(token: &str, production: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl = token::TOKEN_TTL_SECONDS;
    // Only mark cookies Secure when the deployment is served over HTTPS.
    let mut cookie =
        format!("{TOKEN_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl}");
    if production {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_accepts_simple() {
        assert!(valid_email("user@example.com"));
    }

    #[test]
    fn valid_email_rejects_missing_at() {
        assert!(!valid_email("user.example.com"));
    }

    #[test]
    fn valid_email_rejects_missing_domain() {
        assert!(!valid_email("user@"));
        assert!(!valid_email("user@example"));
    }

    #[test]
    fn token_cookie_sets_expected_attributes() {
        let cookie = token_cookie("abc123", false).unwrap();
        let value = cookie.to_str().unwrap();
        assert!(value.starts_with("token=abc123; "));
        assert!(value.contains("Path=/"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(value.contains("Max-Age=86400"));
        assert!(!value.contains("Secure"));
    }

    #[test]
    fn token_cookie_is_secure_in_production() {
        let cookie = token_cookie("abc123", true).unwrap();
        assert!(cookie.to_str().unwrap().ends_with("; Secure"));
    }
}
