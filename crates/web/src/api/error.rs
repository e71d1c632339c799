//! Error types for the QuitQ REST client.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when calling the REST backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        /// HTTP status code returned by the backend.
        status: StatusCode,
        /// Message extracted from the response body, if any.
        message: Option<String>,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// An endpoint path could not be joined onto the base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// HTTP status returned by the backend, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            Self::Decode(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// Whether the backend rejected the bearer token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Whether this failure is on our side or the backend's rather than a
    /// rejected request (transport errors, 5xx, undecodable bodies).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        match self {
            Self::Status { status, .. } => status.is_server_error(),
            Self::Http(_) | Self::Decode(_) | Self::InvalidUrl(_) => true,
        }
    }

    /// The message to show a user: the backend's own message when it sent
    /// one, otherwise `default`.
    #[must_use]
    pub fn user_message(&self, default: &str) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => default.to_string(),
        }
    }
}

/// Extract a human readable message from an error response body.
///
/// Looks in order for a `message` string, then validation `errors` (an
/// object of string arrays, joined with spaces), then a bare JSON string,
/// then the raw text body.
#[must_use]
pub fn extract_error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            if let Some(message) = map.get("message").and_then(Value::as_str) {
                let message = message.trim();
                if !message.is_empty() {
                    return Some(message.to_string());
                }
            }

            let errors = map.get("errors").and_then(Value::as_object)?;
            let joined = errors
                .values()
                .filter_map(Value::as_array)
                .map(|list| {
                    list.iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join(" ");
            let joined = joined.trim();
            Some(if joined.is_empty() {
                "Validation failed.".to_string()
            } else {
                joined.to_string()
            })
        }
        Ok(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Ok(_) => None,
        Err(_) => Some(body.to_string()),
    }
}
