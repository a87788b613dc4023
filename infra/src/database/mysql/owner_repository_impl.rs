//! MySQL implementation of the OwnerRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::error;

use pc_core::domain::entities::owner::OwnerProfile;
use pc_core::errors::DomainError;
use pc_core::repositories::OwnerRepository;

/// MySQL implementation of OwnerRepository
pub struct MySqlOwnerRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOwnerRepository {
    /// Create a new MySQL owner repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn store_fault(context: &str, e: impl std::fmt::Display) -> DomainError {
    error!("owner store failure ({}): {}", context, e);
    DomainError::Internal {
        message: format!("Owner store failure: {}", context),
    }
}

#[async_trait]
impl OwnerRepository for MySqlOwnerRepository {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<OwnerProfile>, DomainError> {
        let query = r#"
            SELECT id, user_id, created_at
            FROM owner_profiles
            WHERE user_id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_fault("find owner profile", e))?;

        match result {
            Some(row) => Ok(Some(OwnerProfile {
                id: row.try_get("id").map_err(|e| store_fault("read id", e))?,
                user_id: row
                    .try_get("user_id")
                    .map_err(|e| store_fault("read user_id", e))?,
                created_at: row
                    .try_get::<DateTime<Utc>, _>("created_at")
                    .map_err(|e| store_fault("read created_at", e))?,
            })),
            None => Ok(None),
        }
    }
}
