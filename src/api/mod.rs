//! Router assembly and server startup.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::AuthState;

pub mod email;
pub mod gate;
pub mod handlers;
pub mod validate;

mod openapi;

pub use self::openapi::openapi;

/// Routes under `/api`; CORS applies to these only.
fn api_router() -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/session", get(handlers::auth::session))
        .route(
            "/api/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/api/projects/:id",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route(
            "/api/services",
            get(handlers::services::list_services)
                .post(handlers::services::create_service)
                .put(handlers::services::update_service)
                .delete(handlers::services::delete_service),
        )
        .route("/api/contact", post(handlers::messages::contact))
        .route(
            "/api/admin/messages",
            get(handlers::messages::list_messages)
                .put(handlers::messages::update_message)
                .delete(handlers::messages::delete_message),
        )
        .route(
            "/api/admin/users",
            get(handlers::admins::list_admins)
                .post(handlers::admins::create_admin)
                .delete(handlers::admins::delete_admin),
        )
        .route("/api/admin/stats", get(handlers::stats::stats))
}

/// Cross-origin policy for the API: mirror the caller's origin (or answer
/// `*` for origin-less requests) with credentials allowed. Preflights are
/// short-circuited by the layer and never reach the handlers.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(Duration::from_secs(86400))
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(
    port: u16,
    dsn: String,
    auth_state: Arc<AuthState>,
    email_config: email::EmailConfig,
    worker_config: email::EmailWorkerConfig,
) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    // Background worker polls email_outbox (DB-backed queue) for pending
    // rows, delivers/logs them, and retries failures with backoff.
    email::spawn_outbox_worker(pool.clone(), email_config.sender(), worker_config);

    let email_config = Arc::new(email_config);

    let app = Router::new()
        .route("/", get(handlers::root))
        .route(
            "/health",
            get(handlers::health).options(handlers::health),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi()))
        .merge(api_router().layer(cors_layer()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(auth_state.clone()))
                .layer(Extension(email_config))
                .layer(Extension(pool))
                .layer(middleware::from_fn_with_state(
                    auth_state.clone(),
                    gate::handle,
                )),
        );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
