//! Session token issuance and validation.
//!
//! Tokens are compact HS256 JWTs. Expiry is fixed at issuance and never
//! refreshed on use; there is no server-side revocation, so a leaked token
//! stays valid until it expires.

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — admin id (UUID string).
    pub sub: String,
    /// Email of the authenticated admin.
    pub email: String,
    /// Display name of the authenticated admin.
    pub name: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp); fixed at issuance.
    pub exp: i64,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl TokenService {
    /// Derive signing keys once from the configured secret; requests then
    /// validate in parallel against immutable key material.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_seconds: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl_seconds,
        }
    }

    /// Issue a signed session token for the given principal.
    ///
    /// # Errors
    /// Returns an error if signing fails.
    pub fn issue(&self, subject: &str, email: &str, name: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding).context("failed to sign session token")
    }

    /// Validate a session token and return its claims.
    ///
    /// Any parse, signature, or expiry failure is identically `None`; no
    /// partial trust is ever extended to an invalid token.
    #[must_use]
    pub fn validate(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK_SECONDS: i64 = 7 * 24 * 60 * 60;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&SecretString::from(secret.to_string()), WEEK_SECONDS)
    }

    #[test]
    fn issued_token_round_trips() {
        let tokens = service("test-secret");
        let token = tokens
            .issue("9f2c8c0e-4c58-4e1a-9e14-df5a3a4f3a21", "admin@example.com", "Admin User")
            .expect("issue");

        let claims = tokens.validate(&token).expect("valid token");
        assert_eq!(claims.sub, "9f2c8c0e-4c58-4e1a-9e14-df5a3a4f3a21");
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.name, "Admin User");
        assert_eq!(claims.exp - claims.iat, WEEK_SECONDS);
    }

    #[test]
    fn token_issued_eight_days_ago_is_expired() {
        let tokens = service("test-secret");
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "sub".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin User".to_string(),
            iat: now - 8 * 24 * 60 * 60,
            exp: now - 24 * 60 * 60,
        };
        let token = tokens.sign(&claims).expect("sign");
        assert!(tokens.validate(&token).is_none());
    }

    #[test]
    fn token_at_the_expiry_boundary_is_still_valid() {
        let tokens = service("test-secret");
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "sub".to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin User".to_string(),
            iat: now - WEEK_SECONDS + 600,
            exp: now + 600,
        };
        let token = tokens.sign(&claims).expect("sign");
        assert!(tokens.validate(&token).is_some());
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let issuer = service("secret-a");
        let verifier = service("secret-b");
        let token = issuer
            .issue("sub", "admin@example.com", "Admin User")
            .expect("issue");
        assert!(verifier.validate(&token).is_none());
        assert!(issuer.validate(&token).is_some());
    }

    #[test]
    fn garbage_and_tampered_tokens_are_invalid() {
        let tokens = service("test-secret");
        assert!(tokens.validate("").is_none());
        assert!(tokens.validate("not-a-jwt").is_none());
        assert!(tokens.validate("a.b.c").is_none());

        let token = tokens
            .issue("sub", "admin@example.com", "Admin User")
            .expect("issue");
        let mut tampered = token.clone();
        tampered.replace_range(..1, if token.starts_with('x') { "y" } else { "x" });
        assert!(tokens.validate(&tampered).is_none());
    }
}
