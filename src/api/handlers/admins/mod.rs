//! Admin-account management endpoints.
//!
//! Every endpoint requires an authenticated session. Deletion refuses to
//! remove the last remaining account so the backoffice can never lock
//! itself out.

pub(crate) mod storage;
pub mod types;

use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::validate::normalize_email,
    auth::{password, principal::require_auth, AuthState},
};

use super::{error_response, internal_error, not_found, success, unauthorized, validation_failed};
use self::{
    storage::{DeleteOutcome, InsertOutcome},
    types::{AdminResponse, CreateAdminRequest},
};

#[derive(Debug, Deserialize)]
pub struct DeleteAdminParams {
    id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "List admin accounts.", body = [AdminResponse]),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
    ),
    tag = "admins"
)]
pub async fn list_admins(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    if require_auth(&headers, &auth_state).is_err() {
        return unauthorized();
    }

    match storage::list(&pool).await {
        Ok(records) => {
            let response: Vec<AdminResponse> =
                records.iter().map(AdminResponse::from_record).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => internal_error("Failed to list admins", &err),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin account created.", body = AdminResponse),
        (status = 400, description = "Validation failed or email already in use.", body = super::ErrorResponse),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
    ),
    tag = "admins"
)]
pub async fn create_admin(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<CreateAdminRequest>>,
) -> impl IntoResponse {
    if require_auth(&headers, &auth_state).is_err() {
        return unauthorized();
    }

    let Some(Json(request)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let errors = request.validate();
    if !errors.is_empty() {
        return validation_failed(errors);
    }

    let email = normalize_email(&request.email);

    let password_hash = match password::hash(&request.password) {
        Ok(hash) => hash,
        Err(err) => return internal_error("Failed to hash admin password", &err),
    };

    match storage::insert(&pool, &email, request.name.trim(), &password_hash).await {
        Ok(InsertOutcome::Created(record)) => (
            StatusCode::CREATED,
            Json(AdminResponse::from_record(&record)),
        )
            .into_response(),
        Ok(InsertOutcome::Duplicate) => error_response(
            StatusCode::BAD_REQUEST,
            "Admin with this email already exists",
        ),
        Err(err) => internal_error("Failed to create admin", &err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/users",
    params(("id" = String, Query, description = "Admin id to delete")),
    responses(
        (status = 200, description = "Admin account deleted.", body = super::SuccessResponse),
        (status = 400, description = "Missing id or last remaining admin.", body = super::ErrorResponse),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
        (status = 404, description = "Admin not found.", body = super::ErrorResponse),
    ),
    tag = "admins"
)]
pub async fn delete_admin(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Query(params): Query<DeleteAdminParams>,
) -> impl IntoResponse {
    if require_auth(&headers, &auth_state).is_err() {
        return unauthorized();
    }

    let Some(id) = params.id else {
        return error_response(StatusCode::BAD_REQUEST, "Admin ID required");
    };

    let Ok(id) = Uuid::parse_str(id.trim()) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid admin ID");
    };

    match storage::delete(&pool, id).await {
        Ok(DeleteOutcome::Deleted) => success(),
        Ok(DeleteOutcome::LastAdmin) => {
            error_response(StatusCode::BAD_REQUEST, "Cannot delete the last admin")
        }
        Ok(DeleteOutcome::NotFound) => not_found("Admin not found"),
        Err(err) => internal_error("Failed to delete admin", &err),
    }
}
