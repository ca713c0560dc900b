//! Password hashing and verification using bcrypt.

use anyhow::{Context, Result};

/// Fixed bcrypt work factor. Verification cost is part of the login
/// contract: it keeps brute-force attempts expensive.
pub const BCRYPT_COST: u32 = 12;

/// Hash a plaintext password with a random salt.
///
/// # Errors
/// Returns an error if the hashing primitive fails (effectively never for
/// valid UTF-8 input).
pub fn hash(password: &str) -> Result<String> {
    bcrypt::hash(password, BCRYPT_COST).context("failed to hash password")
}

/// Verify a plaintext password against a stored hash.
///
/// Returns `false` on any mismatch, including malformed stored hashes;
/// callers never see an error from this path.
#[must_use]
pub fn verify(password: &str, hashed: &str) -> bool {
    bcrypt::verify(password, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_matches() {
        let hashed = hash("hunter2").expect("hash");
        assert!(verify("hunter2", &hashed));
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hashed = hash("hunter2").expect("hash");
        assert!(!verify("wrong", &hashed));
    }

    #[test]
    fn malformed_hash_is_a_mismatch_not_an_error() {
        assert!(!verify("hunter2", "not-a-bcrypt-hash"));
        assert!(!verify("hunter2", ""));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash("hunter2").expect("hash");
        let second = hash("hunter2").expect("hash");
        assert_ne!(first, second);
        assert!(verify("hunter2", &first));
        assert!(verify("hunter2", &second));
    }

    #[test]
    fn hash_embeds_fixed_cost() {
        let hashed = hash("hunter2").expect("hash");
        assert!(hashed.contains("$12$"), "unexpected hash format: {hashed}");
    }
}
