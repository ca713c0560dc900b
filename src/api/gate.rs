//! Request gate enforcing the protected-path policy.
//!
//! Runs once per request, before routing: `/admin/**` requires a valid
//! session token and redirects to the login page otherwise, while the
//! login page redirects already-authenticated callers to the dashboard.
//! The check is a local cryptographic validation of the session cookie —
//! no I/O, no shared mutable state — and never fails past this boundary:
//! every outcome is a redirect or a pass-through.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::auth::{cookie, AuthState};

pub const ADMIN_PREFIX: &str = "/admin";
pub const LOGIN_PATH: &str = "/admin/login";
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Pass,
    ToLogin,
    ToDashboard,
}

pub async fn handle(
    State(auth): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let authenticated = has_valid_session(request.headers(), &auth);
    match decide(request.uri().path(), authenticated) {
        Decision::Pass => next.run(request).await,
        Decision::ToLogin => Redirect::temporary(LOGIN_PATH).into_response(),
        Decision::ToDashboard => Redirect::temporary(DASHBOARD_PATH).into_response(),
    }
}

fn has_valid_session(headers: &HeaderMap, auth: &AuthState) -> bool {
    cookie::extract_session_token(headers)
        .and_then(|token| auth.tokens().validate(&token))
        .is_some()
}

/// Pure policy table over (path kind, token validity).
fn decide(path: &str, authenticated: bool) -> Decision {
    if path == LOGIN_PATH {
        if authenticated {
            Decision::ToDashboard
        } else {
            Decision::Pass
        }
    } else if is_protected(path) {
        if authenticated {
            Decision::Pass
        } else {
            Decision::ToLogin
        }
    } else {
        Decision::Pass
    }
}

fn is_protected(path: &str) -> bool {
    path == ADMIN_PREFIX || path.starts_with("/admin/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_paths_require_a_session() {
        assert_eq!(decide("/admin/dashboard", false), Decision::ToLogin);
        assert_eq!(decide("/admin/projects/123/edit", false), Decision::ToLogin);
        assert_eq!(decide("/admin", false), Decision::ToLogin);
    }

    #[test]
    fn protected_paths_pass_with_a_session() {
        assert_eq!(decide("/admin/dashboard", true), Decision::Pass);
        assert_eq!(decide("/admin/messages", true), Decision::Pass);
    }

    #[test]
    fn login_page_redirects_authenticated_callers() {
        assert_eq!(decide("/admin/login", true), Decision::ToDashboard);
        assert_eq!(decide("/admin/login", false), Decision::Pass);
    }

    #[test]
    fn unprotected_paths_pass_unconditionally() {
        assert_eq!(decide("/", false), Decision::Pass);
        assert_eq!(decide("/api/projects", false), Decision::Pass);
        assert_eq!(decide("/health", true), Decision::Pass);
        // Prefix match is on path segments, not raw strings.
        assert_eq!(decide("/administrator", false), Decision::Pass);
    }
}
