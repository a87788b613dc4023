//! Error response structure shared across all API surfaces

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
///
/// The HTTP layer serializes this directly; `error` carries a stable code
/// clients and monitoring match on, `message` is human-readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (field errors, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Common error codes used across the application
///
/// `REUSE_DETECTED` is deliberately distinct from `TOKEN_INVALID`: clients
/// must force a full re-authentication on it and security monitoring
/// alerts on its occurrence.
pub mod error_codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const TOKEN_INVALID: &str = "TOKEN_INVALID";
    pub const REFRESH_TOKEN_EXPIRED: &str = "REFRESH_TOKEN_EXPIRED";
    pub const REUSE_DETECTED: &str = "REUSE_DETECTED";
    pub const ACCOUNT_UNAUTHORIZED: &str = "ACCOUNT_UNAUTHORIZED";
    pub const OWNER_NOT_FOUND: &str = "OWNER_NOT_FOUND";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new(error_codes::REUSE_DETECTED, "Refresh token reuse detected")
            .add_detail("user_id", 42);

        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("REUSE_DETECTED"));
        assert!(json.contains("\"user_id\":42"));
    }

    #[test]
    fn test_details_omitted_when_empty() {
        let response = ErrorResponse::new(error_codes::TOKEN_INVALID, "Invalid token");
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("details"));
    }
}
