use utoipa::OpenApi;

use super::{handlers, validate};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::session,
        handlers::projects::list_projects,
        handlers::projects::get_project,
        handlers::projects::create_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::services::list_services,
        handlers::services::create_service,
        handlers::services::update_service,
        handlers::services::delete_service,
        handlers::messages::contact,
        handlers::messages::list_messages,
        handlers::messages::update_message,
        handlers::messages::delete_message,
        handlers::admins::list_admins,
        handlers::admins::create_admin,
        handlers::admins::delete_admin,
        handlers::stats::stats,
    ),
    components(schemas(
        handlers::ErrorResponse,
        handlers::ValidationErrorResponse,
        handlers::SuccessResponse,
        validate::FieldError,
        handlers::auth::types::LoginRequest,
        handlers::auth::types::LoginResponse,
        handlers::auth::types::SessionUser,
        handlers::projects::types::ProjectInput,
        handlers::projects::types::ProjectResponse,
        handlers::services::types::ServiceInput,
        handlers::services::types::UpdateServiceRequest,
        handlers::services::types::ServiceResponse,
        handlers::messages::types::ContactRequest,
        handlers::messages::types::ContactResponse,
        handlers::messages::types::UpdateMessageRequest,
        handlers::messages::types::MessageResponse,
        handlers::admins::types::CreateAdminRequest,
        handlers::admins::types::AdminResponse,
        handlers::stats::CategoryCount,
        handlers::stats::TrendPoint,
        handlers::stats::StatsResponse,
    )),
    tags(
        (name = "auth", description = "Login, logout, and session introspection"),
        (name = "projects", description = "Portfolio projects"),
        (name = "services", description = "Service catalog"),
        (name = "contact", description = "Public contact form"),
        (name = "messages", description = "Admin message inbox"),
        (name = "admins", description = "Admin-account management"),
        (name = "stats", description = "Dashboard aggregation"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

/// The generated `OpenAPI` document for the HTTP surface.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::openapi;

    #[test]
    fn document_covers_the_http_surface() {
        let doc = openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/auth/login",
            "/api/auth/logout",
            "/api/auth/session",
            "/api/projects",
            "/api/projects/{id}",
            "/api/services",
            "/api/contact",
            "/api/admin/messages",
            "/api/admin/users",
            "/api/admin/stats",
            "/health",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }

    #[test]
    fn document_serializes_to_json() {
        let doc = openapi();
        let json = doc.to_json().expect("openapi json");
        assert!(json.contains("\"openapi\""));
        assert!(json.contains("LoginRequest"));
    }
}
