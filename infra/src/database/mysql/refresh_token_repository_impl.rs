//! MySQL implementation of the RefreshTokenRepository trait.
//!
//! Refresh token records live in the `refresh_tokens` table with the
//! opaque token value as primary key. Rows are only ever inserted and
//! updated, never deleted: revoked rows remain as the session audit
//! trail.
//!
//! The single-winner guarantee for concurrent rotations of one value
//! rides on `mark_revoked`'s conditional `UPDATE ... WHERE revoked_at IS
//! NULL`; MySQL's row lock serializes the competing writes and
//! `rows_affected` tells each caller whether it performed the transition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::error;

use pc_core::domain::entities::token::RefreshToken;
use pc_core::errors::DomainError;
use pc_core::repositories::RefreshTokenRepository;

/// MySQL implementation of RefreshTokenRepository
pub struct MySqlRefreshTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepository {
    /// Create a new MySQL refresh token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        Ok(RefreshToken {
            token: row
                .try_get("token")
                .map_err(|e| storage_fault("read token", e))?,
            user_id: row
                .try_get("user_id")
                .map_err(|e| storage_fault("read user_id", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| storage_fault("read created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| storage_fault("read expires_at", e))?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(|e| storage_fault("read revoked_at", e))?,
            replaced_by: row
                .try_get("replaced_by")
                .map_err(|e| storage_fault("read replaced_by", e))?,
            device_info: row
                .try_get("device_info")
                .map_err(|e| storage_fault("read device_info", e))?,
        })
    }
}

/// Map a low-level store failure into an infrastructure fault
///
/// Store faults must stay distinguishable from token outcomes like
/// `InvalidRefreshToken`, so everything here becomes `Internal`.
fn storage_fault(context: &str, e: impl std::fmt::Display) -> DomainError {
    error!("refresh token store failure ({}): {}", context, e);
    DomainError::Internal {
        message: format!("Refresh token store failure: {}", context),
    }
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                token, user_id, created_at, expires_at, revoked_at, replaced_by, device_info
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&token.token)
            .bind(token.user_id)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.revoked_at)
            .bind(&token.replaced_by)
            .bind(&token.device_info)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return DomainError::Validation {
                            message: "Token value already exists".to_string(),
                        };
                    }
                }
                storage_fault("insert refresh token", e)
            })?;

        Ok(token)
    }

    async fn find_by_token(&self, token_value: &str) -> Result<Option<RefreshToken>, DomainError> {
        let query = r#"
            SELECT token, user_id, created_at, expires_at, revoked_at, replaced_by, device_info
            FROM refresh_tokens
            WHERE token = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token_value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_fault("find refresh token", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_active_by_user(&self, user_id: i64) -> Result<Vec<RefreshToken>, DomainError> {
        let query = r#"
            SELECT token, user_id, created_at, expires_at, revoked_at, replaced_by, device_info
            FROM refresh_tokens
            WHERE user_id = ?
                AND revoked_at IS NULL
                AND expires_at > ?
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(Utc::now())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_fault("find user tokens", e))?;

        let mut tokens = Vec::with_capacity(rows.len());
        for row in rows {
            tokens.push(Self::row_to_token(&row)?);
        }

        Ok(tokens)
    }

    async fn mark_revoked(
        &self,
        token_value: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        // Conditional write: only the caller that finds revoked_at still
        // unset performs the transition.
        let query = r#"
            UPDATE refresh_tokens
            SET revoked_at = ?
            WHERE token = ? AND revoked_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(revoked_at)
            .bind(token_value)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_fault("revoke token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_rotated(&self, token_value: &str, replaced_by: &str) -> Result<(), DomainError> {
        // A record may only be superseded once it is retired.
        let query = r#"
            UPDATE refresh_tokens
            SET replaced_by = ?
            WHERE token = ? AND revoked_at IS NOT NULL
        "#;

        let result = sqlx::query(query)
            .bind(replaced_by)
            .bind(token_value)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_fault("link rotated token", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Internal {
                message: "Rotation link target missing or not revoked".to_string(),
            });
        }

        Ok(())
    }

    async fn revoke_all_for_user(
        &self,
        user_id: i64,
        revoked_at: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        // Idempotent per row: overlapping family revocations converge.
        let query = r#"
            UPDATE refresh_tokens
            SET revoked_at = ?
            WHERE user_id = ? AND revoked_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(revoked_at)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_fault("revoke user tokens", e))?;

        Ok(result.rows_affected() as usize)
    }
}
