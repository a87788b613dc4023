//! Domain-specific error types and error handling.
//!
//! Expected lifecycle outcomes (invalid token, reuse, expiry, account
//! gating) are values returned to the caller. Only infrastructure faults
//! (store unreachable, unusable signing key) travel as
//! [`DomainError::Internal`]; they must never be conflated with the token
//! outcomes, since the distinction drives the security response.

mod types;

pub use types::{AuthError, TokenError};

use pc_shared::types::{error_codes, ErrorResponse};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Stable error code for the wire response
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
            DomainError::NotFound { .. } => error_codes::NOT_FOUND,
            DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
            DomainError::Auth(AuthError::AccountUnauthorized) => error_codes::ACCOUNT_UNAUTHORIZED,
            DomainError::Auth(AuthError::OwnerProfileNotFound) => error_codes::OWNER_NOT_FOUND,
            DomainError::Token(TokenError::ReuseDetected) => error_codes::REUSE_DETECTED,
            DomainError::Token(TokenError::RefreshTokenExpired) => error_codes::REFRESH_TOKEN_EXPIRED,
            DomainError::Token(TokenError::TokenExpired) => error_codes::TOKEN_EXPIRED,
            DomainError::Token(_) => error_codes::TOKEN_INVALID,
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        ErrorResponse::new(err.error_code(), err.to_string())
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        ErrorResponse::from(&err)
    }
}
