//! Request/response types for admin-account management.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::validate::{check_email, check_len, FieldError};

use super::storage::AdminRecord;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct CreateAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl CreateAdminRequest {
    pub(crate) fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_len(&mut errors, "name", &self.name, 2, 100);
        check_email(&mut errors, "email", &self.email);
        if self.password.chars().count() < 8 {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 8 characters",
            ));
        }
        errors
    }
}

/// Admin account as exposed over the API; the password hash never leaves
/// the storage layer.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AdminResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: String,
}

impl AdminResponse {
    pub(crate) fn from_record(record: &AdminRecord) -> Self {
        Self {
            id: record.id.to_string(),
            email: record.email.clone(),
            name: record.name.clone(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn create_admin_request_collects_all_failures() {
        let request = CreateAdminRequest {
            name: "x".to_string(),
            email: "nope".to_string(),
            password: "short".to_string(),
        };
        let errors = request.validate();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn admin_response_excludes_password_hash() {
        let record = AdminRecord {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            name: "Admin User".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(AdminResponse::from_record(&record)).expect("json");
        assert!(value.get("password").is_none());
        assert!(value.get("password_hash").is_none());
        assert_eq!(
            value.get("email").and_then(|v| v.as_str()),
            Some("admin@example.com")
        );
    }
}
