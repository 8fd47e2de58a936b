//! Error handling for EventDesk
//!
//! This module defines the main error types used throughout the client
//! and the single normalization point for backend error payloads.

use serde_json::Value;
use thiserror::Error;

/// Main error type for the EventDesk client
#[derive(Error, Debug)]
pub enum EventDeskError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for EventDesk operations
pub type Result<T> = std::result::Result<T, EventDeskError>;

impl EventDeskError {
    /// Check if the error is recoverable by retrying the same action
    pub fn is_recoverable(&self) -> bool {
        match self {
            EventDeskError::Api(api) => api.kind == ApiErrorKind::Network,
            EventDeskError::Http(_) => true,
            EventDeskError::ServiceUnavailable(_) => true,
            EventDeskError::Serialization(_) => false,
            EventDeskError::Io(_) => true,
            EventDeskError::UrlParse(_) => false,
            EventDeskError::Config(_) => false,
            EventDeskError::NotAuthenticated => false,
            EventDeskError::PaymentDeclined(_) => false,
            EventDeskError::InvalidStateTransition { .. } => false,
            EventDeskError::InvalidInput(_) => false,
        }
    }

    /// Human-readable message suitable for direct display
    pub fn user_message(&self) -> String {
        match self {
            EventDeskError::Api(api) => api.message.clone(),
            EventDeskError::Http(_) => "Network request failed. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Error category as seen by downstream UI code. Callers switch on the
/// kind instead of inspecting message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// One or more fields failed server-side validation
    Validation,
    /// Authentication failed or the session is no longer valid
    Auth,
    /// The request conflicts with existing server state (e.g. duplicate email)
    Conflict,
    /// The addressed resource does not exist
    NotFound,
    /// Transport-level failure (timeout, connection refused, DNS)
    Network,
    /// Anything the client cannot classify
    Unknown,
}

/// A single field-level validation error extracted from a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Normalized backend error
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
    pub fields: Vec<FieldError>,
}

impl ApiError {
    /// Construct an auth-kind error with no HTTP payload
    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Auth,
            status: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Construct a network-kind error from a transport failure
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Check whether this error implicates a specific input field
    pub fn implicates_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

/// Normalize a non-success backend response into an [`ApiError`].
///
/// Message extraction follows a fixed priority order: plain string body,
/// `detail`, `message`, `error`, concatenated field-validation errors,
/// the raw JSON body, then a generic fallback. Field errors are collected
/// whenever the body carries per-field arrays, regardless of which source
/// won the message.
pub fn normalize_error_body(status: u16, body: &str) -> ApiError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let fields = parsed.as_ref().map(collect_field_errors).unwrap_or_default();

    let message = extract_message(body, parsed.as_ref(), &fields)
        .unwrap_or_else(|| format!("Request failed with status {}", status));

    ApiError {
        kind: classify(status, &fields),
        status: Some(status),
        message,
        fields,
    }
}

fn classify(status: u16, fields: &[FieldError]) -> ApiErrorKind {
    match status {
        401 | 403 => ApiErrorKind::Auth,
        404 => ApiErrorKind::NotFound,
        409 => ApiErrorKind::Conflict,
        400 | 422 if !fields.is_empty() => ApiErrorKind::Validation,
        _ => ApiErrorKind::Unknown,
    }
}

fn extract_message(body: &str, parsed: Option<&Value>, fields: &[FieldError]) -> Option<String> {
    let value = match parsed {
        Some(value) => value,
        None => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                return None;
            }
            return Some(trimmed.to_string());
        }
    };

    if let Value::String(text) = value {
        if !text.trim().is_empty() {
            return Some(text.trim().to_string());
        }
    }

    for key in ["detail", "message", "error"] {
        if let Some(text) = value.get(key).and_then(Value::as_str) {
            if !text.trim().is_empty() {
                return Some(text.trim().to_string());
            }
        }
    }

    if !fields.is_empty() {
        let joined = fields
            .iter()
            .map(|f| format!("{}: {}", f.field, f.message))
            .collect::<Vec<_>>()
            .join("; ");
        return Some(joined);
    }

    if value.is_object() || value.is_array() {
        return Some(value.to_string());
    }

    None
}

/// Collect `{"field": ["msg", ...]}` style validation errors from a body
fn collect_field_errors(value: &Value) -> Vec<FieldError> {
    let mut fields = Vec::new();
    if let Value::Object(map) = value {
        for (key, entry) in map {
            if matches!(key.as_str(), "detail" | "message" | "error" | "code" | "status") {
                continue;
            }
            match entry {
                Value::Array(messages) => {
                    for message in messages.iter().filter_map(Value::as_str) {
                        fields.push(FieldError {
                            field: key.clone(),
                            message: message.to_string(),
                        });
                    }
                }
                Value::String(message) => fields.push(FieldError {
                    field: key.clone(),
                    message: message.clone(),
                }),
                _ => {}
            }
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_string_body_wins() {
        let err = normalize_error_body(400, "\"something broke\"");
        assert_eq!(err.message, "something broke");
    }

    #[test]
    fn test_detail_beats_message() {
        let err = normalize_error_body(400, r#"{"detail": "the detail", "message": "the message"}"#);
        assert_eq!(err.message, "the detail");
    }

    #[test]
    fn test_message_beats_error() {
        let err = normalize_error_body(400, r#"{"message": "the message", "error": "the error"}"#);
        assert_eq!(err.message, "the message");
    }

    #[test]
    fn test_field_errors_concatenated() {
        let err = normalize_error_body(400, r#"{"email": ["already registered"], "phone": ["too short"]}"#);
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert!(err.message.contains("email: already registered"));
        assert!(err.message.contains("phone: too short"));
        assert!(err.implicates_field("email"));
        assert!(err.implicates_field("phone"));
        assert!(!err.implicates_field("country"));
    }

    #[test]
    fn test_conflict_status_tagged() {
        let err = normalize_error_body(409, r#"{"email": ["a registration with this email already exists"]}"#);
        assert_eq!(err.kind, ApiErrorKind::Conflict);
        assert!(err.implicates_field("email"));
    }

    #[test]
    fn test_auth_statuses_tagged() {
        assert_eq!(normalize_error_body(401, "{}").kind, ApiErrorKind::Auth);
        assert_eq!(normalize_error_body(403, "{}").kind, ApiErrorKind::Auth);
        assert_eq!(normalize_error_body(404, "{}").kind, ApiErrorKind::NotFound);
    }

    #[test]
    fn test_unparseable_body_used_verbatim() {
        let err = normalize_error_body(500, "upstream exploded");
        assert_eq!(err.kind, ApiErrorKind::Unknown);
        assert_eq!(err.message, "upstream exploded");
    }

    #[test]
    fn test_empty_body_generic_message() {
        let err = normalize_error_body(502, "");
        assert_eq!(err.message, "Request failed with status 502");
    }

    proptest! {
        #[test]
        fn normalize_never_panics_and_always_has_message(status in 400u16..600, body in ".{0,256}") {
            let err = normalize_error_body(status, &body);
            prop_assert!(!err.message.is_empty());
            prop_assert_eq!(err.status, Some(status));
        }
    }
}
