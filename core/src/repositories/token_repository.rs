//! Refresh token repository trait defining the interface for token persistence.
//!
//! The store exclusively owns `RefreshToken` records: services mutate them
//! only through these operations, never by writing entities back directly.
//! Records are never deleted; revoked rows stay behind as the session
//! audit trail.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for refresh token persistence operations
///
/// # Concurrency
///
/// `mark_revoked` is a conditional write: it transitions a record to
/// revoked only if `revoked_at` is still unset *at write time*, and
/// reports whether this call performed the transition. Two concurrent
/// rotations of the same token value therefore serialize on this call —
/// exactly one observes `true`. Implementations must provide this via a
/// conditional update or an equivalent single-writer-per-key guarantee.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Persist a new refresh token record
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved record
    /// * `Err(DomainError)` - Save failed (e.g., duplicate token value)
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a refresh token record by its opaque value
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - Record found
    /// * `Ok(None)` - No record with the given value
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_token(&self, token_value: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Find all active (non-revoked, non-expired) records for a user
    async fn find_active_by_user(&self, user_id: i64) -> Result<Vec<RefreshToken>, DomainError>;

    /// Revoke a record if and only if it is not already revoked
    ///
    /// # Returns
    /// * `Ok(true)` - This call set `revoked_at`
    /// * `Ok(false)` - Record missing or already revoked (possibly by a
    ///   concurrent caller between our read and this write)
    /// * `Err(DomainError)` - Store error occurred
    async fn mark_revoked(
        &self,
        token_value: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Record the successor of a rotated token
    ///
    /// The record must already be revoked: a token cannot be superseded
    /// without being retired first.
    async fn mark_rotated(&self, token_value: &str, replaced_by: &str) -> Result<(), DomainError>;

    /// Revoke every non-revoked record belonging to a user
    ///
    /// Each record update is idempotent, so overlapping invocations
    /// converge to the same end state.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records this call revoked
    async fn revoke_all_for_user(
        &self,
        user_id: i64,
        revoked_at: DateTime<Utc>,
    ) -> Result<usize, DomainError>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(user_id: i64, value: &str) -> RefreshToken {
        RefreshToken::new(user_id, value.to_string(), None, 30)
    }

    #[tokio::test]
    async fn test_mock_save_and_find() {
        let repo = mock::MockRefreshTokenRepository::new();

        repo.save(record(1, "abc")).await.unwrap();

        let found = repo.find_by_token("abc").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().user_id, 1);

        assert!(repo.find_by_token("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_duplicate_value_rejected() {
        let repo = mock::MockRefreshTokenRepository::new();

        repo.save(record(1, "same")).await.unwrap();
        let result = repo.save(record(2, "same")).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_mock_mark_revoked_is_conditional() {
        let repo = mock::MockRefreshTokenRepository::new();
        repo.save(record(1, "abc")).await.unwrap();

        let now = Utc::now();
        assert!(repo.mark_revoked("abc", now).await.unwrap());
        // Second attempt loses: the record is already revoked
        assert!(!repo.mark_revoked("abc", now + Duration::seconds(1)).await.unwrap());

        let stored = repo.find_by_token("abc").await.unwrap().unwrap();
        assert_eq!(stored.revoked_at, Some(now));
    }

    #[tokio::test]
    async fn test_mock_mark_revoked_missing_token() {
        let repo = mock::MockRefreshTokenRepository::new();

        assert!(!repo.mark_revoked("missing", Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_mark_rotated_requires_revocation() {
        let repo = mock::MockRefreshTokenRepository::new();
        repo.save(record(1, "old")).await.unwrap();

        // Linking before revocation violates the record invariant
        assert!(repo.mark_rotated("old", "new").await.is_err());

        repo.mark_revoked("old", Utc::now()).await.unwrap();
        repo.mark_rotated("old", "new").await.unwrap();

        let stored = repo.find_by_token("old").await.unwrap().unwrap();
        assert_eq!(stored.replaced_by, Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_mock_find_active_by_user() {
        let repo = mock::MockRefreshTokenRepository::new();

        repo.save(record(1, "a")).await.unwrap();
        repo.save(record(1, "b")).await.unwrap();
        repo.save(record(2, "c")).await.unwrap();

        let mut expired = record(1, "d");
        expired.expires_at = Utc::now() - Duration::days(1);
        repo.save(expired).await.unwrap();

        repo.mark_revoked("b", Utc::now()).await.unwrap();

        let active = repo.find_active_by_user(1).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].token, "a");
    }

    #[tokio::test]
    async fn test_mock_revoke_all_for_user_converges() {
        let repo = mock::MockRefreshTokenRepository::new();

        repo.save(record(1, "a")).await.unwrap();
        repo.save(record(1, "b")).await.unwrap();
        repo.save(record(2, "c")).await.unwrap();

        let first = repo.revoke_all_for_user(1, Utc::now()).await.unwrap();
        assert_eq!(first, 2);

        // Overlapping invocation finds nothing left to do
        let second = repo.revoke_all_for_user(1, Utc::now()).await.unwrap();
        assert_eq!(second, 0);

        let other = repo.find_active_by_user(2).await.unwrap();
        assert_eq!(other.len(), 1);
    }
}
