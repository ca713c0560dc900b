//! Auth configuration and shared state.

use anyhow::{anyhow, Result};
use secrecy::{ExposeSecret, SecretString};

use super::token::TokenService;

/// Session lifetime: token expiry and cookie Max-Age move together.
const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Clone)]
pub struct AuthConfig {
    base_url: String,
    session_secret: SecretString,
}

impl AuthConfig {
    /// Build the auth configuration.
    ///
    /// # Errors
    /// Returns an error when the signing secret is blank. There is no
    /// fallback secret: a process that cannot prove it was configured must
    /// not mint tokens.
    pub fn new(base_url: String, session_secret: SecretString) -> Result<Self> {
        if session_secret.expose_secret().trim().is_empty() {
            return Err(anyhow!("session signing secret must not be empty"));
        }
        Ok(Self {
            base_url,
            session_secret,
        })
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> i64 {
        SESSION_TTL_SECONDS
    }

    /// Only mark cookies secure when the site is served over HTTPS.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(super) fn session_secret(&self) -> &SecretString {
        &self.session_secret
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("base_url", &self.base_url)
            .field("session_secret", &"***")
            .finish()
    }
}

/// Process-wide auth state, constructed once at startup and shared by the
/// request gate and the handlers. Holds only immutable data, so requests
/// validate tokens fully in parallel with no contention.
#[derive(Debug)]
pub struct AuthState {
    config: AuthConfig,
    tokens: TokenService,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        let tokens = TokenService::new(config.session_secret(), config.session_ttl_seconds());
        Self { config, tokens }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_secret_is_rejected() {
        let result = AuthConfig::new(
            "http://localhost:8080".to_string(),
            SecretString::from(String::new()),
        );
        assert!(result.is_err());

        let result = AuthConfig::new(
            "http://localhost:8080".to_string(),
            SecretString::from("   ".to_string()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn cookie_secure_follows_base_url_scheme() {
        let config = AuthConfig::new(
            "https://vetrina.studio".to_string(),
            SecretString::from("sekret".to_string()),
        )
        .expect("config");
        assert!(config.cookie_secure());

        let config = AuthConfig::new(
            "http://localhost:8080".to_string(),
            SecretString::from("sekret".to_string()),
        )
        .expect("config");
        assert!(!config.cookie_secure());
    }

    #[test]
    fn debug_redacts_the_secret() {
        let config = AuthConfig::new(
            "http://localhost:8080".to_string(),
            SecretString::from("super-sekret".to_string()),
        )
        .expect("config");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-sekret"));
    }

    #[test]
    fn session_ttl_is_seven_days() {
        let config = AuthConfig::new(
            "http://localhost:8080".to_string(),
            SecretString::from("sekret".to_string()),
        )
        .expect("config");
        assert_eq!(config.session_ttl_seconds(), 7 * 24 * 60 * 60);
    }
}
