//! Request/response types for the service catalog.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::validate::{check_len, FieldError};

use super::storage::ServiceRecord;

fn default_active() -> bool {
    true
}

/// Payload for creating or replacing a catalog entry.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ServiceInput {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub features: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl ServiceInput {
    pub(crate) fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_len(&mut errors, "title", &self.title, 3, 100);
        if self.description.trim().chars().count() < 20 {
            errors.push(FieldError::new(
                "description",
                "Description must be at least 20 characters",
            ));
        }
        if self.icon.trim().is_empty() {
            errors.push(FieldError::new("icon", "Icon is required"));
        }
        if self.features.is_empty() {
            errors.push(FieldError::new(
                "features",
                "At least one feature is required",
            ));
        }
        if self.sort_order < 0 {
            errors.push(FieldError::new("sort_order", "Order must not be negative"));
        }
        errors
    }
}

/// Update payload: the target id rides along in the body.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UpdateServiceRequest {
    pub id: String,
    #[serde(flatten)]
    pub service: ServiceInput,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ServiceResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub features: Vec<String>,
    pub active: bool,
    pub sort_order: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl ServiceResponse {
    pub(crate) fn from_record(record: ServiceRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title,
            description: record.description,
            icon: record.icon,
            features: record.features,
            active: record.active,
            sort_order: record.sort_order,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ServiceInput {
        ServiceInput {
            title: "Web Development".to_string(),
            description: "Custom web applications built with modern technologies.".to_string(),
            icon: "Code".to_string(),
            features: vec!["Responsive Design".to_string()],
            active: true,
            sort_order: 1,
        }
    }

    #[test]
    fn valid_service_passes() {
        assert!(valid_input().validate().is_empty());
    }

    #[test]
    fn missing_icon_and_features_fail() {
        let mut input = valid_input();
        input.icon = "  ".to_string();
        input.features.clear();
        let errors = input.validate();
        assert!(errors.iter().any(|e| e.field == "icon"));
        assert!(errors.iter().any(|e| e.field == "features"));
    }

    #[test]
    fn negative_sort_order_fails() {
        let mut input = valid_input();
        input.sort_order = -1;
        assert!(input.validate().iter().any(|e| e.field == "sort_order"));
    }

    #[test]
    fn defaults_apply_on_deserialize() {
        let input: ServiceInput = serde_json::from_value(serde_json::json!({
            "title": "Web Development",
            "description": "Custom web applications built with modern technologies.",
            "icon": "Code",
            "features": ["Responsive Design"],
        }))
        .expect("deserialize");
        assert!(input.active);
        assert_eq!(input.sort_order, 0);
    }

    #[test]
    fn update_request_flattens_service_fields() {
        let request: UpdateServiceRequest = serde_json::from_value(serde_json::json!({
            "id": "b9c7d6b4-4f6e-45d2-a2b0-0f4f4f4f4f4f",
            "title": "Web Development",
            "description": "Custom web applications built with modern technologies.",
            "icon": "Code",
            "features": ["Responsive Design"],
            "active": false,
            "sort_order": 3,
        }))
        .expect("deserialize");
        assert_eq!(request.service.sort_order, 3);
        assert!(!request.service.active);
    }
}
