/*
 * Responsibility
 * - Service-wide AppError taxonomy and the mapping to HTTP status codes
 * - The single wire format for error bodies (ErrorResponse / FieldError)
 * - Shutdown classification for the fail-fast path in the dispatcher
 */
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire shape of every error body the service emits.
///
/// `{"error": "..."}` for single-message errors, with `fields` present only
/// for data-validation failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

/// One violated field in a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub error: String,
}

/// Ordered collection of field-level violations. A handler reports every
/// violated field in one response rather than failing on the first.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: impl Into<String>, error: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            error: error.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for fe in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", fe.field, fe.error)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Data validation failed; every violated field is reported (400).
    #[error("data validation error: {0}")]
    FieldValidation(FieldErrors),

    /// Trusted error with a caller-chosen status and a client-safe message.
    #[error("{message}")]
    Request { status: StatusCode, message: String },

    /// Authentication failure (401).
    #[error("{0}")]
    Authentication(String),

    /// Authorization failure (403).
    #[error("{0}")]
    Authorization(String),

    /// Anything unclassified. The cause is logged; the client sees a masked
    /// message (500).
    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    /// Fatal, non-recoverable condition. The request still gets a masked 500,
    /// and the dispatcher initiates process shutdown.
    #[error("{0}")]
    Shutdown(String),
}

impl AppError {
    pub fn request(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: message.into(),
        }
    }

    pub fn shutdown(message: impl Into<String>) -> Self {
        Self::Shutdown(message.into())
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self, Self::Shutdown(_))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::FieldValidation(_) => StatusCode::BAD_REQUEST,
            Self::Request { status, .. } => *status,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) | Self::Shutdown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the wire body for this error. Internal and shutdown errors are
    /// masked so implementation detail never reaches a client.
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            Self::FieldValidation(fields) => ErrorResponse {
                error: "data validation error".to_string(),
                fields: Some(fields.0.clone()),
            },
            Self::Request { message, .. } => ErrorResponse {
                error: message.clone(),
                fields: None,
            },
            Self::Authentication(message) | Self::Authorization(message) => ErrorResponse {
                error: message.clone(),
                fields: None,
            },
            Self::Internal(_) | Self::Shutdown(_) => ErrorResponse {
                error: StatusCode::INTERNAL_SERVER_ERROR
                    .canonical_reason()
                    .unwrap_or("Internal Server Error")
                    .to_string(),
                fields: None,
            },
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(fields: FieldErrors) -> Self {
        Self::FieldValidation(fields)
    }
}
