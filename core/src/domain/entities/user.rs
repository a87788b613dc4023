//! User entity representing a registered account in the PawCare system.
//!
//! The credential kernel consumes user records read-only; registration and
//! password handling live elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents the kind of account in the system
///
/// The persisted representation is a string column; rows are parsed into
/// this closed set exactly once, at the repository boundary, so service
/// code matches exhaustively instead of comparing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// A pet owner using the client application
    Owner,
    /// A veterinarian on clinic staff
    Veterinarian,
    /// A platform administrator
    Admin,
}

impl AccountType {
    /// Parse the database representation of an account type
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "owner" => Some(Self::Owner),
            "veterinarian" => Some(Self::Veterinarian),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Canonical string form, used for the JWT role claim
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Veterinarian => "veterinarian",
            Self::Admin => "admin",
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Account is in good standing
    Active,
    /// Account was deactivated by the user
    Inactive,
    /// Account was suspended by the platform
    Suspended,
}

impl AccountStatus {
    /// Parse the database representation of an account status
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: i64,

    /// Email address
    pub email: String,

    /// Display name shown in clients
    pub display_name: String,

    /// Account status
    pub status: AccountStatus,

    /// Kind of account
    pub account_type: AccountType,

    /// Profile image reference (storage key or URL)
    pub profile_image: Option<String>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Checks if the account is in good standing
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Checks if the account belongs to a pet owner
    pub fn is_owner(&self) -> bool {
        self.account_type == AccountType::Owner
    }
}
