//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Claims structure for the access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Email address of the subject
    pub email: String,

    /// Display name of the subject
    pub name: String,

    /// Account role ("owner", "veterinarian", "admin")
    pub role: String,

    /// Owner profile ID the subject acts as
    pub owner_id: i64,

    /// Profile image reference, if the user has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    /// Creates new claims for an access token
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user the token describes
    /// * `owner_id` - Owner profile ID resolved by the caller
    /// * `issuer` - Configured issuer claim
    /// * `audience` - Configured audience claim
    /// * `expiry_minutes` - Access token lifetime in minutes
    pub fn new_access_token(
        user: &User,
        owner_id: i64,
        issuer: &str,
        audience: &str,
        expiry_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::minutes(expiry_minutes);

        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.display_name.clone(),
            role: user.account_type.as_str().to_string(),
            owner_id,
            picture: user.profile_image.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<i64, std::num::ParseIntError> {
        self.sub.parse()
    }
}

/// Refresh token record stored in the database
///
/// The token value is the record's natural key. Records are never deleted;
/// revoked and expired rows remain as the session audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Opaque token value, unique across all records
    pub token: String,

    /// User ID this token belongs to
    pub user_id: i64,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the token was revoked; set once, never cleared
    pub revoked_at: Option<DateTime<Utc>>,

    /// Token value of the successor this record was rotated into
    pub replaced_by: Option<String>,

    /// Device or session descriptor, carried forward across rotations
    pub device_info: Option<String>,
}

impl RefreshToken {
    /// Creates a new refresh token record
    ///
    /// # Arguments
    ///
    /// * `user_id` - The owning user's ID
    /// * `token` - The opaque token value
    /// * `device_info` - Device descriptor for the session, if known
    /// * `expiry_days` - Refresh token lifetime in days
    pub fn new(user_id: i64, token: String, device_info: Option<String>, expiry_days: i64) -> Self {
        let now = Utc::now();

        Self {
            token,
            user_id,
            created_at: now,
            expires_at: now + Duration::days(expiry_days),
            revoked_at: None,
            replaced_by: None,
            device_info,
        }
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Checks if the refresh token has been revoked
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Checks if the refresh token can still be rotated
    ///
    /// A token is active if it has neither expired nor been revoked.
    pub fn is_active(&self) -> bool {
        !self.is_expired() && !self.is_revoked()
    }

    /// Revokes the refresh token
    ///
    /// `revoked_at` is monotonic: once set, later calls leave the original
    /// timestamp in place.
    pub fn revoke(&mut self, at: DateTime<Utc>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(at);
        }
    }

    /// Records the successor token this record was rotated into
    ///
    /// Only valid on a revoked record: a token cannot be superseded
    /// without being retired first.
    pub fn link_successor(&mut self, token: &str) {
        debug_assert!(self.revoked_at.is_some());
        self.replaced_by = Some(token.to_string());
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}
