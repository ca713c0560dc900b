//! Authenticated principal extraction for API handlers.
//!
//! The request gate covers the admin pages; API handlers call
//! [`require_auth`] per request. Both paths resolve through the same
//! [`TokenService::validate`](super::token::TokenService::validate), so the
//! two checks cannot drift.

use axum::http::{HeaderMap, StatusCode};

use super::{cookie, AuthState};

/// Authenticated admin context derived from the session cookie.
#[derive(Clone, Debug)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Resolve the session cookie into a principal, or return 401.
///
/// A missing cookie, a bad signature, and an expired token are
/// indistinguishable to the caller.
///
/// # Errors
/// Returns `StatusCode::UNAUTHORIZED` for every failure mode.
pub fn require_auth(headers: &HeaderMap, state: &AuthState) -> Result<Principal, StatusCode> {
    let token = cookie::extract_session_token(headers).ok_or(StatusCode::UNAUTHORIZED)?;
    let claims = state
        .tokens()
        .validate(&token)
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Principal {
        id: claims.sub,
        email: claims.email,
        name: claims.name,
    })
}

/// Whether the request carries a valid session, without failing.
#[must_use]
pub fn is_authenticated(headers: &HeaderMap, state: &AuthState) -> bool {
    require_auth(headers, state).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;
    use axum::http::{header::COOKIE, HeaderValue};
    use secrecy::SecretString;

    fn state() -> AuthState {
        let config = AuthConfig::new(
            "http://localhost:8080".to_string(),
            SecretString::from("test-secret".to_string()),
        )
        .expect("config");
        AuthState::new(config)
    }

    fn cookie_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("vetrina_session={token}")).expect("header"),
        );
        headers
    }

    #[test]
    fn valid_cookie_resolves_to_principal() {
        let state = state();
        let token = state
            .tokens()
            .issue("id-1", "admin@example.com", "Admin User")
            .expect("issue");

        let principal = require_auth(&cookie_headers(&token), &state).expect("principal");
        assert_eq!(principal.id, "id-1");
        assert_eq!(principal.email, "admin@example.com");
        assert_eq!(principal.name, "Admin User");
    }

    #[test]
    fn missing_and_forged_cookies_are_equally_unauthorized() {
        let state = state();

        let missing = require_auth(&HeaderMap::new(), &state);
        assert_eq!(missing.unwrap_err(), StatusCode::UNAUTHORIZED);

        let forged = require_auth(&cookie_headers("not-a-token"), &state);
        assert_eq!(forged.unwrap_err(), StatusCode::UNAUTHORIZED);

        let other = AuthState::new(
            AuthConfig::new(
                "http://localhost:8080".to_string(),
                SecretString::from("other-secret".to_string()),
            )
            .expect("config"),
        );
        let token = other
            .tokens()
            .issue("id-1", "admin@example.com", "Admin User")
            .expect("issue");
        let cross = require_auth(&cookie_headers(&token), &state);
        assert_eq!(cross.unwrap_err(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn is_authenticated_mirrors_require_auth() {
        let state = state();
        assert!(!is_authenticated(&HeaderMap::new(), &state));
        let token = state
            .tokens()
            .issue("id-1", "admin@example.com", "Admin User")
            .expect("issue");
        assert!(is_authenticated(&cookie_headers(&token), &state));
    }
}
