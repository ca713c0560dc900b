//! Service catalog endpoints.
//!
//! The public site lists active services; an authenticated session widens
//! the listing to inactive entries and unlocks the write operations.

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

use crate::auth::{
    principal::{is_authenticated, require_auth},
    AuthState,
};

use super::{error_response, internal_error, not_found, success, unauthorized, validation_failed};
use self::types::{ServiceInput, ServiceResponse, UpdateServiceRequest};

#[derive(Debug, Deserialize)]
pub struct DeleteServiceParams {
    id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/services",
    responses(
        (status = 200, description = "List services; inactive entries require a session.", body = [ServiceResponse]),
    ),
    tag = "services"
)]
pub async fn list_services(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let include_inactive = is_authenticated(&headers, &auth_state);

    match storage::list(&pool, include_inactive).await {
        Ok(records) => {
            let response: Vec<ServiceResponse> = records
                .into_iter()
                .map(ServiceResponse::from_record)
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => internal_error("Failed to list services", &err),
    }
}

#[utoipa::path(
    post,
    path = "/api/services",
    request_body = ServiceInput,
    responses(
        (status = 201, description = "Service created.", body = ServiceResponse),
        (status = 400, description = "Validation failed.", body = super::ValidationErrorResponse),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
    ),
    tag = "services"
)]
pub async fn create_service(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ServiceInput>>,
) -> impl IntoResponse {
    if require_auth(&headers, &auth_state).is_err() {
        return unauthorized();
    }

    let Some(Json(input)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let errors = input.validate();
    if !errors.is_empty() {
        return validation_failed(errors);
    }

    match storage::insert(&pool, &input).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ServiceResponse::from_record(record)),
        )
            .into_response(),
        Err(err) => internal_error("Failed to create service", &err),
    }
}

#[utoipa::path(
    put,
    path = "/api/services",
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated.", body = ServiceResponse),
        (status = 400, description = "Validation failed.", body = super::ValidationErrorResponse),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
        (status = 404, description = "Service not found.", body = super::ErrorResponse),
    ),
    tag = "services"
)]
pub async fn update_service(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<UpdateServiceRequest>>,
) -> impl IntoResponse {
    if require_auth(&headers, &auth_state).is_err() {
        return unauthorized();
    }

    let Some(Json(request)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let Ok(id) = Uuid::parse_str(request.id.trim()) else {
        return not_found("Service not found");
    };

    let errors = request.service.validate();
    if !errors.is_empty() {
        return validation_failed(errors);
    }

    match storage::update(&pool, id, &request.service).await {
        Ok(Some(record)) => {
            (StatusCode::OK, Json(ServiceResponse::from_record(record))).into_response()
        }
        Ok(None) => not_found("Service not found"),
        Err(err) => internal_error("Failed to update service", &err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/services",
    params(("id" = String, Query, description = "Service id to delete")),
    responses(
        (status = 200, description = "Service deleted.", body = super::SuccessResponse),
        (status = 400, description = "Missing service id.", body = super::ErrorResponse),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
        (status = 404, description = "Service not found.", body = super::ErrorResponse),
    ),
    tag = "services"
)]
pub async fn delete_service(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Query(params): Query<DeleteServiceParams>,
) -> impl IntoResponse {
    if require_auth(&headers, &auth_state).is_err() {
        return unauthorized();
    }

    let Some(id) = params.id else {
        return error_response(StatusCode::BAD_REQUEST, "Service ID required");
    };

    let Ok(id) = Uuid::parse_str(id.trim()) else {
        return not_found("Service not found");
    };

    match storage::delete(&pool, id).await {
        Ok(true) => success(),
        Ok(false) => not_found("Service not found"),
        Err(err) => internal_error("Failed to delete service", &err),
    }
}
