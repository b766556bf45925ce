//! Password hashing backed by bcrypt.

use bcrypt::BcryptError;

/// Work factor for new digests. Existing stored digests were produced with
/// the same cost, so this must not change without a migration.
const COST: u32 = 10;

/// Hash a plaintext password with a per-call salt.
///
/// Surrounding whitespace is trimmed before hashing; verification applies
/// the same trim so both sides agree.
///
/// # Errors
/// Returns an error if the bcrypt computation fails.
pub fn hash(plaintext: &str) -> Result<String, BcryptError> {
    bcrypt::hash(plaintext.trim(), COST)
}

/// Verify a plaintext password against a stored digest.
///
/// # Errors
/// Returns an error if the digest cannot be parsed.
pub fn verify(plaintext: &str, digest: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(plaintext.trim(), digest.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let digest = hash("hunter2").unwrap();
        assert!(verify("hunter2", &digest).unwrap());
        assert!(!verify("hunter3", &digest).unwrap());
    }

    #[test]
    fn hash_is_salted_per_call() {
        let first = hash("same-password").unwrap();
        let second = hash("same-password").unwrap();
        assert_ne!(first, second);
        assert!(verify("same-password", &first).unwrap());
        assert!(verify("same-password", &second).unwrap());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let digest = hash("  hunter2  ").unwrap();
        assert!(verify("hunter2", &digest).unwrap());
        assert!(verify(" hunter2 ", &digest).unwrap());
    }

    #[test]
    fn verify_rejects_garbage_digest() {
        assert!(verify("hunter2", "not-a-digest").is_err());
    }
}
