//! Request/response types for portfolio projects.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::validate::{check_len, valid_http_url, FieldError};

use super::storage::ProjectRecord;

/// Payload for creating or replacing a project.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub technologies: Vec<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub project_link: Option<String>,
    pub category: String,
    #[serde(default)]
    pub featured: bool,
}

impl ProjectInput {
    pub(crate) fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_len(&mut errors, "title", &self.title, 3, 200);
        if self.description.trim().chars().count() < 20 {
            errors.push(FieldError::new(
                "description",
                "Description must be at least 20 characters",
            ));
        }
        if self.images.is_empty() {
            errors.push(FieldError::new("images", "At least one image is required"));
        } else if self.images.iter().any(|image| !valid_http_url(image)) {
            errors.push(FieldError::new("images", "Images must be valid URLs"));
        }
        if self.technologies.is_empty() {
            errors.push(FieldError::new(
                "technologies",
                "At least one technology is required",
            ));
        }
        if self.category.trim().is_empty() {
            errors.push(FieldError::new("category", "Category is required"));
        }
        // An empty link is allowed; a non-empty one must parse.
        if let Some(link) = self.project_link.as_deref() {
            if !link.is_empty() && !valid_http_url(link) {
                errors.push(FieldError::new("project_link", "Invalid project link"));
            }
        }
        errors
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ProjectResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub technologies: Vec<String>,
    pub client_name: Option<String>,
    pub project_link: Option<String>,
    pub category: String,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl ProjectResponse {
    pub(crate) fn from_record(record: ProjectRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title,
            description: record.description,
            images: record.images,
            technologies: record.technologies,
            client_name: record.client_name,
            project_link: record.project_link,
            category: record.category,
            featured: record.featured,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ProjectInput {
        ProjectInput {
            title: "Marketing site relaunch".to_string(),
            description: "Full redesign and rebuild of the marketing site.".to_string(),
            images: vec!["https://cdn.example.com/shot.png".to_string()],
            technologies: vec!["Rust".to_string()],
            client_name: None,
            project_link: None,
            category: "web".to_string(),
            featured: false,
        }
    }

    #[test]
    fn valid_project_passes() {
        assert!(valid_input().validate().is_empty());
    }

    #[test]
    fn empty_images_and_technologies_fail() {
        let mut input = valid_input();
        input.images.clear();
        input.technologies.clear();
        let errors = input.validate();
        assert!(errors.iter().any(|e| e.field == "images"));
        assert!(errors.iter().any(|e| e.field == "technologies"));
    }

    #[test]
    fn non_url_image_fails() {
        let mut input = valid_input();
        input.images = vec!["not-a-url".to_string()];
        assert!(input.validate().iter().any(|e| e.field == "images"));
    }

    #[test]
    fn empty_project_link_is_allowed() {
        let mut input = valid_input();
        input.project_link = Some(String::new());
        assert!(input.validate().is_empty());

        input.project_link = Some("nope".to_string());
        assert!(input.validate().iter().any(|e| e.field == "project_link"));
    }

    #[test]
    fn featured_defaults_to_false() {
        let input: ProjectInput = serde_json::from_value(serde_json::json!({
            "title": "Marketing site relaunch",
            "description": "Full redesign and rebuild of the marketing site.",
            "images": ["https://cdn.example.com/shot.png"],
            "technologies": ["Rust"],
            "category": "web",
        }))
        .expect("deserialize");
        assert!(!input.featured);
        assert!(input.client_name.is_none());
    }
}
