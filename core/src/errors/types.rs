//! Domain-specific error types for authentication and token operations
//!
//! These enums are the expected, recoverable outcomes of the credential
//! lifecycle. The presentation layer maps them onto wire responses; see
//! the `ErrorResponse` conversions in the parent module.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// The owning account is missing, not active, or not a pet-owner
    /// account. Collapsed into one variant on purpose: callers must not
    /// learn which of the three gates failed.
    #[error("Account is not authorized for token issuance")]
    AccountUnauthorized,

    /// The account is valid but has no owner profile to bind claims to
    #[error("Owner profile not found")]
    OwnerProfileNotFound,
}

/// Token-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// No refresh token record matches the presented value
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// The presented refresh token was already rotated or revoked.
    /// Treated as a stolen-credential signal: the whole session family is
    /// torn down as a side effect before this is returned.
    #[error("Refresh token reuse detected")]
    ReuseDetected,

    /// The refresh token record exists but is past its expiry
    #[error("Refresh token expired")]
    RefreshTokenExpired,

    /// Access token expired
    #[error("Token expired")]
    TokenExpired,

    /// Access token not yet valid
    #[error("Token not yet valid")]
    TokenNotYetValid,

    /// Token could not be parsed
    #[error("Invalid token format")]
    InvalidTokenFormat,

    /// Token signature verification failed
    #[error("Invalid signature")]
    InvalidSignature,

    /// The token's declared signing algorithm does not match the
    /// configured one
    #[error("Signing algorithm mismatch")]
    AlgorithmMismatch,

    /// Issuer, audience, or another claim failed validation
    #[error("Invalid claims")]
    InvalidClaims,

    /// Signing or persisting a new token failed
    #[error("Token generation failed")]
    TokenGenerationFailed,
}
