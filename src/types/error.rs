//! Error types for Intake

use hyper::StatusCode;

/// Main error type for Intake operations
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed capability link or MAC mismatch
    #[error("Invalid capability link")]
    InvalidLink,

    /// Well-signed capability link whose issue timestamp is older than the TTL
    #[error("Expired capability link")]
    ExpiredLink,

    /// Slug resolved to zero entities, or to more than one (ambiguous
    /// capabilities never grant access)
    #[error("Entity not found")]
    EntityNotFound,

    /// A submission violated a conditional validation rule
    #[error("Validation failed on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),
}

impl IntakeError {
    /// Convert error to HTTP status code
    ///
    /// Link and resolution failures all map to 404: the submission endpoint
    /// must not let callers distinguish a bad signature from a signature
    /// that verified but matched no entity.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidLink | Self::ExpiredLink | Self::EntityNotFound => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Convert to status code and body tuple for HTTP response
    pub fn into_status_code_and_body(self) -> (StatusCode, String) {
        let status = self.status_code();
        let body = self.to_string();
        (status, body)
    }
}

// Implement From conversions for common error types

impl From<std::io::Error> for IntakeError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for IntakeError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<hyper::Error> for IntakeError {
    fn from(err: hyper::Error) -> Self {
        Self::Internal(format!("HTTP error: {}", err))
    }
}

impl From<mongodb::error::Error> for IntakeError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for IntakeError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Unauthorized(format!("JWT error: {}", err))
    }
}

impl From<crate::token::TokenError> for IntakeError {
    fn from(err: crate::token::TokenError) -> Self {
        match err {
            crate::token::TokenError::Invalid => Self::InvalidLink,
            crate::token::TokenError::Expired => Self::ExpiredLink,
        }
    }
}

/// Result type alias for Intake operations
pub type Result<T> = std::result::Result<T, IntakeError>;
