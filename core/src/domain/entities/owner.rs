//! Owner profile entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pet-owner profile attached to a user account
///
/// Consumed read-only by the credential kernel: its id enriches access
/// token claims so resource servers can scope queries to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerProfile {
    /// Unique identifier for the owner profile
    pub id: i64,

    /// User account this profile belongs to
    pub user_id: i64,

    /// Timestamp when the profile was created
    pub created_at: DateTime<Utc>,
}
