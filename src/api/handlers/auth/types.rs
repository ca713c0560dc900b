//! Request/response types for the auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::validate::{check_email, check_len, FieldError};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub(crate) fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_email(&mut errors, "email", &self.email);
        if self.password.chars().count() < 6 {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters",
            ));
        }
        errors
    }
}

/// Public view of an admin account; never carries password material.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub success: bool,
    pub user: SessionUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_validation_collects_all_failures() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = request.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.field == "email"));
        assert!(errors.iter().any(|e| e.field == "password"));
    }

    #[test]
    fn login_request_accepts_valid_input() {
        let request = LoginRequest {
            email: "admin@example.com".to_string(),
            password: "Admin@123456".to_string(),
        };
        assert!(request.validate().is_empty());
    }

    #[test]
    fn login_response_serializes_without_password_fields() {
        let response = LoginResponse {
            success: true,
            user: SessionUser {
                id: "id-1".to_string(),
                email: "admin@example.com".to_string(),
                name: "Admin User".to_string(),
            },
        };
        let value = serde_json::to_value(&response).expect("json");
        assert!(value.get("user").and_then(|u| u.get("password")).is_none());
        assert_eq!(
            value.pointer("/user/email").and_then(|v| v.as_str()),
            Some("admin@example.com")
        );
    }
}
