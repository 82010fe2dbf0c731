//! Error type shared by every DevFolio API call.

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Body of a non-success response.
///
/// The server answers with either a `{"detail": ...}` style object, a map of
/// field names to message lists (validation), or plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBody {
    raw: String,
    json: Option<Value>,
}

impl ErrorBody {
    pub fn parse(raw: String) -> Self {
        let json = serde_json::from_str(&raw).ok();
        Self { raw, json }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }

    /// Messages reported for a single form field, e.g. `email`.
    pub fn field_errors(&self, field: &str) -> Vec<String> {
        match self.json.as_ref().and_then(|json| json.get(field)) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(message)) => vec![message.clone()],
            _ => Vec::new(),
        }
    }

    /// The message a user should see.
    ///
    /// Picks `detail`, then `message`, then `error`, then the first field
    /// error, and finally the raw body.
    pub fn message(&self) -> String {
        if let Some(Value::Object(map)) = &self.json {
            for key in ["detail", "message", "error"] {
                if let Some(Value::String(message)) = map.get(key) {
                    return message.clone();
                }
            }
            for value in map.values() {
                match value {
                    Value::Array(items) => {
                        if let Some(Value::String(message)) = items.first() {
                            return message.clone();
                        }
                    }
                    Value::String(message) => return message.clone(),
                    _ => {}
                }
            }
        }

        if self.raw.trim().is_empty() {
            "Request failed".to_string()
        } else {
            self.raw.clone()
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Errors returned by the DevFolio API clients
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(ErrorBody),

    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorBody),

    #[error("Forbidden: {0}")]
    Forbidden(ErrorBody),

    #[error("Not found: {0}")]
    NotFound(ErrorBody),

    #[error("API error: {message} (Status: {status})")]
    Status { status: StatusCode, message: String },

    /// The refresh token was rejected or missing; local tokens are gone.
    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Missing session")]
    MissingSession,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Token store error: {0}")]
    StoreError(#[from] std::io::Error),
}

impl ApiError {
    /// Map a non-success status and its body to an error.
    pub fn from_status(status: StatusCode, text: String) -> Self {
        let body = ErrorBody::parse(text);
        match status {
            StatusCode::BAD_REQUEST => ApiError::Validation(body),
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(body),
            StatusCode::FORBIDDEN => ApiError::Forbidden(body),
            StatusCode::NOT_FOUND => ApiError::NotFound(body),
            _ => ApiError::Status {
                status,
                message: body.message(),
            },
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Validation(_) => Some(StatusCode::BAD_REQUEST),
            ApiError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            ApiError::Forbidden(_) => Some(StatusCode::FORBIDDEN),
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::NetworkError(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Whether the caller should send the user back to the login page.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::SessionExpired | ApiError::MissingSession)
    }

    /// Text for a user-facing notification.
    ///
    /// Server-reported messages are returned verbatim; transport failures
    /// collapse to a generic sentence.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(body)
            | ApiError::Unauthorized(body)
            | ApiError::Forbidden(body)
            | ApiError::NotFound(body) => body.message(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::SessionExpired => "Your session has expired. Please log in again.".to_string(),
            ApiError::MissingSession => "Please log in to continue.".to_string(),
            ApiError::NetworkError(_)
            | ApiError::SerializationError(_)
            | ApiError::UrlParseError(_)
            | ApiError::StoreError(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}
