//! Field validation shared by the public and admin forms.
//!
//! Validators collect every failing field instead of stopping at the
//! first, so clients can render a full error list from one response.

use regex::Regex;
use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

/// A single field/message pair in a validation error response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Normalize an email for lookup/uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

pub(crate) fn valid_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Check a trimmed string length against inclusive bounds, recording an
/// error under `field` when out of range.
pub(crate) fn check_len(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.trim().chars().count();
    if len < min {
        errors.push(FieldError::new(
            field,
            &format!("must be at least {min} characters"),
        ));
    } else if len > max {
        errors.push(FieldError::new(
            field,
            &format!("must be at most {max} characters"),
        ));
    }
}

pub(crate) fn check_email(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if !valid_email(value.trim()) {
        errors.push(FieldError::new(field, "Invalid email address"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.com"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn valid_http_url_requires_http_scheme() {
        assert!(valid_http_url("https://example.com/image.png"));
        assert!(valid_http_url("http://example.com"));
        assert!(!valid_http_url("ftp://example.com"));
        assert!(!valid_http_url("example.com"));
        assert!(!valid_http_url(""));
    }

    #[test]
    fn check_len_reports_both_bounds() {
        let mut errors = Vec::new();
        check_len(&mut errors, "name", "a", 2, 100);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");

        let mut errors = Vec::new();
        check_len(&mut errors, "subject", &"x".repeat(201), 2, 200);
        assert_eq!(errors.len(), 1);

        let mut errors = Vec::new();
        check_len(&mut errors, "name", "ok", 2, 100);
        assert!(errors.is_empty());
    }

    #[test]
    fn check_len_ignores_surrounding_whitespace() {
        let mut errors = Vec::new();
        check_len(&mut errors, "name", "  a  ", 2, 100);
        assert_eq!(errors.len(), 1);
    }
}
