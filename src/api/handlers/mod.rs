//! HTTP handlers for the public site API and the admin backoffice.
//!
//! Handlers parse inputs, enforce the auth contract, and map high-level
//! flow; SQL lives in each domain's `storage` module. Error responses
//! follow a small taxonomy: validation failures carry a field/message
//! list, auth failures are a uniform 401, lookup misses are 404, and
//! anything unexpected is logged and surfaced as a generic 500.

pub mod admins;
pub mod auth;
pub mod health;
pub mod messages;
pub mod projects;
pub mod services;
pub mod stats;

pub use self::health::{health, root};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use super::validate::FieldError;

/// Generic error body: `{"error": "..."}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Validation error body carrying one entry per failing field.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub details: Vec<FieldError>,
}

/// Minimal success body for deletes and other ack-only endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Uniform 401: never distinguishes a missing cookie from a bad token.
pub(crate) fn unauthorized() -> Response {
    error_response(StatusCode::UNAUTHORIZED, "Unauthorized")
}

pub(crate) fn validation_failed(details: Vec<FieldError>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ValidationErrorResponse {
            error: "Validation failed".to_string(),
            details,
        }),
    )
        .into_response()
}

pub(crate) fn not_found(message: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, message)
}

/// Log the detail, answer with a generic failure body.
pub(crate) fn internal_error(context: &str, err: &anyhow::Error) -> Response {
    error!("{context}: {err}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

pub(crate) fn success() -> Response {
    (StatusCode::OK, Json(SuccessResponse { success: true })).into_response()
}
