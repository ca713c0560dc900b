//! # Vetrina (Marketing Site & Admin Backoffice API)
//!
//! `vetrina` is the HTTP backend for a small-business marketing site: a
//! public JSON API (portfolio projects, service catalog, contact form) and
//! an authenticated admin backoffice (projects/services CRUD, message
//! inbox, admin-user management, dashboard stats).
//!
//! ## Authentication
//!
//! Admins log in with email + password (bcrypt, fixed cost 12). A
//! successful login issues a signed HS256 session token carrying
//! `{sub, email, name, iat, exp}` with a fixed 7-day expiry, transported in
//! an `HttpOnly`/`SameSite=Lax` cookie. Tokens are never persisted
//! server-side; logout only clears the cookie.
//!
//! ## Request gate
//!
//! Every request passes through a stateless gate before routing:
//! `/admin/**` requires a valid session token and redirects to the login
//! page otherwise, while the login page itself redirects already
//! authenticated callers to the dashboard. API handlers re-validate the
//! cookie per request through the same token service, so the two checks
//! cannot drift.
//!
//! ## Error surface
//!
//! Validation failures return a field/message list; authentication
//! failures are a uniform `401` that never distinguishes a missing cookie
//! from a bad signature or an expired token.

pub mod api;
pub mod auth;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
