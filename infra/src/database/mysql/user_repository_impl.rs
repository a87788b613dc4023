//! MySQL implementation of the UserRepository trait.
//!
//! This is the single load boundary where the string-typed `status` and
//! `account_type` columns become the closed domain enums; service code
//! never sees the raw strings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::error;

use pc_core::domain::entities::user::{AccountStatus, AccountType, User};
use pc_core::errors::DomainError;
use pc_core::repositories::UserRepository;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let status_raw: String = row
            .try_get("status")
            .map_err(|e| store_fault("read status", e))?;
        let status = AccountStatus::parse(&status_raw).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown account status in users table: {}", status_raw),
        })?;

        let account_type_raw: String = row
            .try_get("account_type")
            .map_err(|e| store_fault("read account_type", e))?;
        let account_type =
            AccountType::parse(&account_type_raw).ok_or_else(|| DomainError::Internal {
                message: format!("Unknown account type in users table: {}", account_type_raw),
            })?;

        Ok(User {
            id: row.try_get("id").map_err(|e| store_fault("read id", e))?,
            email: row
                .try_get("email")
                .map_err(|e| store_fault("read email", e))?,
            display_name: row
                .try_get("display_name")
                .map_err(|e| store_fault("read display_name", e))?,
            status,
            account_type,
            profile_image: row
                .try_get("profile_image")
                .map_err(|e| store_fault("read profile_image", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| store_fault("read created_at", e))?,
        })
    }
}

fn store_fault(context: &str, e: impl std::fmt::Display) -> DomainError {
    error!("user store failure ({}): {}", context, e);
    DomainError::Internal {
        message: format!("User store failure: {}", context),
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let query = r#"
            SELECT id, email, display_name, status, account_type, profile_image, created_at
            FROM users
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_fault("find user", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}
