//! Contact form submission and the admin message inbox.
//!
//! The contact endpoint is public: it validates, stores the message, and
//! enqueues the notification email in the same transaction. Delivery
//! happens asynchronously in the outbox worker, so a slow or failing mail
//! endpoint never fails the submission. Inbox endpoints require a session.

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
    api::email::EmailConfig,
    auth::{principal::require_auth, AuthState},
};

use super::{error_response, internal_error, not_found, success, unauthorized, validation_failed};
use self::types::{ContactRequest, ContactResponse, MessageResponse, UpdateMessageRequest};

#[derive(Debug, Deserialize)]
pub struct DeleteMessageParams {
    id: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Message stored and notification queued.", body = ContactResponse),
        (status = 400, description = "Validation failed.", body = super::ValidationErrorResponse),
    ),
    tag = "contact"
)]
pub async fn contact(
    pool: Extension<PgPool>,
    email_config: Extension<Arc<EmailConfig>>,
    payload: Option<Json<ContactRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let errors = request.validate();
    if !errors.is_empty() {
        return validation_failed(errors);
    }

    match storage::insert_with_notification(&pool, &request, email_config.to_address()).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(ContactResponse {
                success: true,
                message: "Your message has been sent successfully!".to_string(),
            }),
        )
            .into_response(),
        Err(err) => internal_error("Failed to store contact message", &err),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/messages",
    responses(
        (status = 200, description = "List contact messages, newest first.", body = [MessageResponse]),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
    ),
    tag = "messages"
)]
pub async fn list_messages(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    if require_auth(&headers, &auth_state).is_err() {
        return unauthorized();
    }

    match storage::list(&pool).await {
        Ok(records) => {
            let response: Vec<MessageResponse> = records
                .into_iter()
                .map(MessageResponse::from_record)
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => internal_error("Failed to list messages", &err),
    }
}

#[utoipa::path(
    put,
    path = "/api/admin/messages",
    request_body = UpdateMessageRequest,
    responses(
        (status = 200, description = "Message read flag updated.", body = MessageResponse),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
        (status = 404, description = "Message not found.", body = super::ErrorResponse),
    ),
    tag = "messages"
)]
pub async fn update_message(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<UpdateMessageRequest>>,
) -> impl IntoResponse {
    if require_auth(&headers, &auth_state).is_err() {
        return unauthorized();
    }

    let Some(Json(request)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let Ok(id) = Uuid::parse_str(request.id.trim()) else {
        return not_found("Message not found");
    };

    match storage::set_read(&pool, id, request.read).await {
        Ok(Some(record)) => {
            (StatusCode::OK, Json(MessageResponse::from_record(record))).into_response()
        }
        Ok(None) => not_found("Message not found"),
        Err(err) => internal_error("Failed to update message", &err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/messages",
    params(("id" = String, Query, description = "Message id to delete")),
    responses(
        (status = 200, description = "Message deleted.", body = super::SuccessResponse),
        (status = 400, description = "Missing message id.", body = super::ErrorResponse),
        (status = 401, description = "Missing or invalid session.", body = super::ErrorResponse),
        (status = 404, description = "Message not found.", body = super::ErrorResponse),
    ),
    tag = "messages"
)]
pub async fn delete_message(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Query(params): Query<DeleteMessageParams>,
) -> impl IntoResponse {
    if require_auth(&headers, &auth_state).is_err() {
        return unauthorized();
    }

    let Some(id) = params.id else {
        return error_response(StatusCode::BAD_REQUEST, "Message ID required");
    };

    let Ok(id) = Uuid::parse_str(id.trim()) else {
        return not_found("Message not found");
    };

    match storage::delete(&pool, id).await {
        Ok(true) => success(),
        Ok(false) => not_found("Message not found"),
        Err(err) => internal_error("Failed to delete message", &err),
    }
}
