//! Portfolio project endpoints.
//!
//! Reads are public (the site renders from them); writes require an
//! authenticated session.

pub(crate) mod storage;
pub mod types;

use axum::{
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{principal::require_auth, AuthState};

use super::{error_response, internal_error, not_found, success, unauthorized, validation_failed};
use self::types::{ProjectInput, ProjectResponse};

#[derive(Debug, Deserialize)]
pub struct ListProjectsParams {
    category: Option<String>,
}

fn parse_id(id: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(id.trim()).map_err(|_| not_found("Project not found"))
}

#[utoipa::path(
    get,
    path = "/api/projects",
    params(("category" = Option<String>, Query, description = "Filter by category")),
    responses(
        (status = 200, description = "List projects, featured first.", body = [ProjectResponse]),
    ),
    tag = "projects"
)]
pub async fn list_projects(
    pool: Extension<PgPool>,
    Query(params): Query<ListProjectsParams>,
) -> impl IntoResponse {
    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match storage::list(&pool, category).await {
        Ok(records) => {
            let response: Vec<ProjectResponse> = records
                .into_iter()
                .map(ProjectResponse::from_record)
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => internal_error("Failed to list projects", &err),
    }
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project detail.", body = ProjectResponse),
        (status = 404, description = "Project not found.", body = super::ErrorResponse),
    ),
    tag = "projects"
)]
pub async fn get_project(Path(id): Path<String>, pool: Extension<PgPool>) -> impl IntoResponse {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match storage::get(&pool, id).await {
        Ok(Some(record)) => {
            (StatusCode::OK, Json(ProjectResponse::from_record(record))).into_response()
        }
        Ok(None) => not_found("Project not found"),
        Err(err) => internal_error("Failed to fetch project", &err),
    }
}

#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = ProjectInput,
    responses(
        (status = 201, description = "Project created.", body = ProjectResponse),
        (status = 400, description = "Validation failed.", body = super::ValidationErrorResponse),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
    ),
    tag = "projects"
)]
pub async fn create_project(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ProjectInput>>,
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
            Json(ProjectResponse::from_record(record)),
        )
            .into_response(),
        Err(err) => internal_error("Failed to create project", &err),
    }
}

#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    request_body = ProjectInput,
    responses(
        (status = 200, description = "Project updated.", body = ProjectResponse),
        (status = 400, description = "Validation failed.", body = super::ValidationErrorResponse),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
        (status = 404, description = "Project not found.", body = super::ErrorResponse),
    ),
    tag = "projects"
)]
pub async fn update_project(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ProjectInput>>,
) -> impl IntoResponse {
    if require_auth(&headers, &auth_state).is_err() {
        return unauthorized();
    }

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let Some(Json(input)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let errors = input.validate();
    if !errors.is_empty() {
        return validation_failed(errors);
    }

    match storage::update(&pool, id, &input).await {
        Ok(Some(record)) => {
            (StatusCode::OK, Json(ProjectResponse::from_record(record))).into_response()
        }
        Ok(None) => not_found("Project not found"),
        Err(err) => internal_error("Failed to update project", &err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project deleted.", body = super::SuccessResponse),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
        (status = 404, description = "Project not found.", body = super::ErrorResponse),
    ),
    tag = "projects"
)]
pub async fn delete_project(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    if require_auth(&headers, &auth_state).is_err() {
        return unauthorized();
    }

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match storage::delete(&pool, id).await {
        Ok(true) => success(),
        Ok(false) => not_found("Project not found"),
        Err(err) => internal_error("Failed to delete project", &err),
    }
}
