use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Keys the backend uses for messages that do not belong to a single field.
const GENERAL_KEYS: [&str; 3] = ["detail", "non_field_errors", "general"];

/// Field-keyed error messages, as returned by the backend on a 400 or
/// produced locally by form validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a validation body such as `{"price": ["A valid number is required."]}`.
    /// Values may be a single string or a list. Returns `None` when the body
    /// is not a JSON object.
    pub fn from_body(body: &str) -> Option<Self> {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
            return None;
        };

        let mut errors = Self::new();
        for (field, value) in map {
            match value {
                Value::String(s) => errors.insert(field, s),
                Value::Array(items) => {
                    for item in items {
                        errors.insert(field.clone(), value_text(item));
                    }
                }
                other => errors.insert(field, value_text(other)),
            }
        }
        Some(errors)
    }

    /// Single general message, e.g. for failures that have no field.
    pub fn general_message(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert("general", message);
        errors
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|m| m.first()).map(String::as_str)
    }

    /// First message not tied to a form field.
    pub fn general(&self) -> Option<&str> {
        GENERAL_KEYS.iter().find_map(|k| self.first(k))
    }

    pub fn clear_field(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn general_detail(body: &str) -> Option<String> {
    FieldErrors::from_body(body).and_then(|e| e.general().map(str::to_string))
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("not signed in")]
    MissingCredentials,

    #[error("unauthorized ({status})")]
    Unauthorized { status: u16, detail: Option<String> },

    #[error("not found")]
    NotFound,

    #[error("validation failed")]
    Validation(FieldErrors),

    #[error("API error: {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-2xx response.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::Unauthorized {
                status,
                detail: general_detail(body),
            },
            404 => Self::NotFound,
            400 => match FieldErrors::from_body(body) {
                Some(errors) if !errors.is_empty() => Self::Validation(errors),
                _ => Self::Status {
                    status,
                    detail: None,
                },
            },
            _ => Self::Status {
                status,
                detail: general_detail(body),
            },
        }
    }

    /// True for both a missing token and a 401/403 from the backend.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::MissingCredentials | Self::Unauthorized { .. })
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Server-supplied message, if there is one worth showing.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Validation(errors) => errors.general(),
            Self::Status { detail, .. } | Self::Unauthorized { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    /// Errors to render inline under a form. Anything that is not a
    /// validation failure becomes a general message.
    pub fn into_field_errors(self, fallback: &str) -> FieldErrors {
        match self {
            Self::Validation(errors) => errors,
            other => FieldErrors::general_message(other.message_or(fallback)),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_drf_field_lists() {
        let body = r#"{"price": ["A valid number is required."], "name": "Required."}"#;
        let errors = FieldErrors::from_body(body).unwrap();
        assert_eq!(errors.first("price"), Some("A valid number is required."));
        assert_eq!(errors.first("name"), Some("Required."));
        assert_eq!(errors.general(), None);
    }

    #[test]
    fn detail_is_general() {
        let errors = FieldErrors::from_body(r#"{"detail": "Application already submitted."}"#).unwrap();
        assert_eq!(errors.general(), Some("Application already submitted."));
    }

    #[test]
    fn non_object_body_is_not_field_errors() {
        assert!(FieldErrors::from_body("<html>").is_none());
        assert!(FieldErrors::from_body("[1,2]").is_none());
    }

    #[test]
    fn classifies_statuses() {
        assert_eq!(
            ApiError::from_status(401, ""),
            ApiError::Unauthorized { status: 401, detail: None }
        );
        assert!(ApiError::from_status(403, "").is_unauthorized());
        assert_eq!(ApiError::from_status(404, "{}"), ApiError::NotFound);
        assert!(matches!(
            ApiError::from_status(400, r#"{"title": ["This field is required."]}"#),
            ApiError::Validation(_)
        ));
        assert_eq!(
            ApiError::from_status(400, "{}"),
            ApiError::Status { status: 400, detail: None }
        );
        assert_eq!(
            ApiError::from_status(500, r#"{"detail": "boom"}"#).detail(),
            Some("boom")
        );
    }

    #[test]
    fn forbidden_keeps_server_reason() {
        let err = ApiError::from_status(403, r#"{"detail": "Cannot ban an admin user."}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.message_or("Failed to update ban status."), "Cannot ban an admin user.");
        assert_eq!(
            ApiError::from_status(403, "").message_or("Failed to update ban status."),
            "Failed to update ban status."
        );
    }

    #[test]
    fn missing_credentials_counts_as_unauthorized() {
        assert!(ApiError::MissingCredentials.is_unauthorized());
        assert!(!ApiError::NotFound.is_unauthorized());
    }

    #[test]
    fn non_validation_errors_become_general_field_errors() {
        let errors = ApiError::Network("offline".into()).into_field_errors("An error occurred.");
        assert_eq!(errors.general(), Some("An error occurred."));
    }
}
