//! Domain-specific error types for peer-feedback

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field validation messages, serialized as `{"fieldErrors": {...}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.field_errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.field_errors.get(field).map(Vec::as_slice)
    }

    /// Ok when nothing was recorded, otherwise an `InvalidData` error carrying the fields
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(FeedbackError::InvalidData { details: self })
        }
    }
}

/// Main error type for the peer-feedback service
#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid data: {} field(s) rejected", .details.field_errors.len())]
    InvalidData { details: FieldErrors },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("Notification error: {message}")]
    Notification { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl FeedbackError {
    pub fn validation(message: impl Into<String>) -> Self {
        FeedbackError::Validation {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        FeedbackError::Config {
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        FeedbackError::NotFound { what: what.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            FeedbackError::Validation { .. } | FeedbackError::InvalidData { .. } => {
                StatusCode::BAD_REQUEST
            }
            FeedbackError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for FeedbackError {
    fn from(err: anyhow::Error) -> Self {
        FeedbackError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for FeedbackError {
    fn from(err: rusqlite::Error) -> Self {
        FeedbackError::Database {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for FeedbackError {
    fn from(err: reqwest::Error) -> Self {
        FeedbackError::Notification {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

/// Convert FeedbackError to an HTTP response
impl IntoResponse for FeedbackError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            FeedbackError::Validation { message } => json!({ "error": message }),
            FeedbackError::InvalidData { details } => {
                json!({ "error": "Invalid data", "details": details })
            }
            FeedbackError::NotFound { what } => json!({ "error": format!("{what} not found") }),
            other => {
                tracing::error!("request failed: {}", other);
                json!({ "error": "Internal server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for peer-feedback operations
pub type Result<T> = std::result::Result<T, FeedbackError>;
