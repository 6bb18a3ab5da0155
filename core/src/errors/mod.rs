//! Domain-specific error types and error handling.

mod types;


// Re-export all error types and utilities
pub use types::{extract_english_message, extract_indonesian_message, TokenError};

use qr_shared::errors::error_codes;
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Machine-readable error code used in API error envelopes
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
            DomainError::NotFound { .. } => error_codes::NOT_FOUND,
            DomainError::Unauthorized => error_codes::FORBIDDEN,
            DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
            DomainError::Token(err) => err.error_code(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
