//! Session endpoints: login, logout, and cookie introspection.
//!
//! Flow Overview:
//! 1) Validate the login payload and look up the admin by email.
//! 2) Verify the password against the stored bcrypt hash.
//! 3) Issue a 7-day session token and set the `HttpOnly` cookie.
//!
//! Unknown emails and wrong passwords answer with the same body and
//! status, so the endpoint leaks nothing about which accounts exist.

pub mod types;

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::{
    api::validate::normalize_email,
    auth::{cookie, password, AuthState},
};

use super::{admins::storage::find_by_email, internal_error, validation_failed};
use self::types::{LoginRequest, LoginResponse, SessionUser};

fn invalid_credentials() -> Response {
    super::error_response(StatusCode::UNAUTHORIZED, "Invalid credentials")
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded; session cookie set.", body = LoginResponse),
        (status = 400, description = "Validation failed.", body = crate::api::handlers::ValidationErrorResponse),
        (status = 401, description = "Invalid credentials.", body = crate::api::handlers::ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return super::error_response(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let errors = request.validate();
    if !errors.is_empty() {
        return validation_failed(errors);
    }

    let email = normalize_email(&request.email);

    let admin = match find_by_email(&pool, &email).await {
        Ok(Some(admin)) => admin,
        // Unknown email and wrong password must be indistinguishable.
        Ok(None) => return invalid_credentials(),
        Err(err) => return internal_error("Failed to look up admin for login", &err),
    };

    if !password::verify(&request.password, &admin.password_hash) {
        return invalid_credentials();
    }

    let token = match auth_state
        .tokens()
        .issue(&admin.id.to_string(), &admin.email, &admin.name)
    {
        Ok(token) => token,
        Err(err) => return internal_error("Failed to issue session token", &err),
    };

    let mut headers = HeaderMap::new();
    match cookie::session_cookie(auth_state.config(), &token) {
        Ok(value) => {
            headers.insert(SET_COOKIE, value);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    let response = LoginResponse {
        success: true,
        user: SessionUser {
            id: admin.id.to_string(),
            email: admin.email,
            name: admin.name,
        },
    };

    (StatusCode::OK, headers, Json(response)).into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session cookie cleared.")
    ),
    tag = "auth"
)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Tokens are not persisted server-side; clearing the cookie is the
    // whole logout. A copied token stays valid until its expiry.
    let mut headers = HeaderMap::new();
    if let Ok(value) = cookie::clear_session_cookie(auth_state.config()) {
        headers.insert(SET_COOKIE, value);
    }
    (StatusCode::NO_CONTENT, headers).into_response()
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Session is active.", body = SessionUser),
        (status = 204, description = "No active session.")
    ),
    tag = "auth"
)]
pub async fn session(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    // Missing cookies are treated as "no session" to avoid leaking auth state.
    let Some(token) = cookie::extract_session_token(&headers) else {
        return StatusCode::NO_CONTENT.into_response();
    };
    match auth_state.tokens().validate(&token) {
        Some(claims) => {
            let response = SessionUser {
                id: claims.sub,
                email: claims.email,
                name: claims.name,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
