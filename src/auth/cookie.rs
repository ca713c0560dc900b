//! Session cookie construction and extraction.

use axum::http::{header::InvalidHeaderValue, HeaderMap, HeaderValue};

use super::state::AuthConfig;

pub const SESSION_COOKIE_NAME: &str = "vetrina_session";

/// Build the `Set-Cookie` value carrying a freshly issued session token.
///
/// # Errors
/// Returns an error if the token contains bytes invalid in a header value.
pub fn session_cookie(config: &AuthConfig, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build the `Set-Cookie` value that clears the session cookie.
///
/// # Errors
/// Returns an error if the value cannot be encoded as a header (it can).
pub fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Extract the raw session token from the request's `Cookie` header.
#[must_use]
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;
    use secrecy::SecretString;

    fn config(base_url: &str) -> AuthConfig {
        AuthConfig::new(
            base_url.to_string(),
            SecretString::from("sekret".to_string()),
        )
        .expect("config")
    }

    #[test]
    fn session_cookie_carries_expected_attributes() {
        let value = session_cookie(&config("http://localhost:8080"), "tok").expect("cookie");
        let cookie = value.to_str().expect("ascii");
        assert!(cookie.starts_with("vetrina_session=tok"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn session_cookie_is_secure_over_https() {
        let value = session_cookie(&config("https://vetrina.studio"), "tok").expect("cookie");
        assert!(value.to_str().expect("ascii").contains("; Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let value = clear_session_cookie(&config("http://localhost:8080")).expect("cookie");
        let cookie = value.to_str().expect("ascii");
        assert!(cookie.starts_with("vetrina_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn extracts_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; vetrina_session=tok123; lang=en"),
        );
        assert_eq!(extract_session_token(&headers), Some("tok123".to_string()));
    }

    #[test]
    fn missing_cookie_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(extract_session_token(&headers), None);
    }
}
