//! Request/response types for the contact form and the message inbox.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::validate::{check_email, check_len, FieldError};

use super::storage::MessageRecord;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactRequest {
    pub(crate) fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_len(&mut errors, "name", &self.name, 2, 100);
        check_email(&mut errors, "email", &self.email);
        check_len(&mut errors, "subject", &self.subject, 2, 200);
        check_len(&mut errors, "message", &self.message, 5, 2000);
        errors
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UpdateMessageRequest {
    pub id: String,
    pub read: bool,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}

impl MessageResponse {
    pub(crate) fn from_record(record: MessageRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name,
            email: record.email,
            subject: record.subject,
            message: record.message,
            read: record.read,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> ContactRequest {
        ContactRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            subject: "Quote request".to_string(),
            message: "Hello, I would like a quote.".to_string(),
        }
    }

    #[test]
    fn valid_contact_request_passes() {
        assert!(valid_request().validate().is_empty());
    }

    #[test]
    fn contact_validation_collects_all_failures() {
        let request = ContactRequest {
            name: "a".to_string(),
            email: "nope".to_string(),
            subject: "x".to_string(),
            message: "hey".to_string(),
        };
        let errors = request.validate();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn overlong_message_fails() {
        let mut request = valid_request();
        request.message = "x".repeat(2001);
        assert!(request.validate().iter().any(|e| e.field == "message"));
    }
}
