//! Issued credential pair value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credential pair returned by login issuance and rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Signed JWT access token
    pub access_token: String,

    /// Opaque refresh token
    pub refresh_token: String,

    /// Absolute expiry of the access token
    pub expires_at: DateTime<Utc>,
}

impl AuthTokens {
    /// Creates a new credential pair
    pub fn new(access_token: String, refresh_token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at,
        }
    }
}
