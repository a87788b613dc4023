//! Main authentication service implementation

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, warn};

use crate::domain::entities::owner::OwnerProfile;
use crate::domain::entities::token::RefreshToken;
use crate::domain::entities::user::{AccountType, User};
use crate::domain::value_objects::AuthTokens;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{OwnerRepository, RefreshTokenRepository, UserRepository};
use crate::services::token::TokenService;

/// Authentication service managing the credential lifecycle
///
/// Holds read-only user/owner lookups and the token service. All rotation
/// state lives in the refresh token store; the service itself is stateless
/// and shared freely across concurrent callers.
pub struct AuthService<U, O, T>
where
    U: UserRepository,
    O: OwnerRepository,
    T: RefreshTokenRepository,
{
    /// User repository for account lookup
    user_repository: Arc<U>,
    /// Owner profile repository
    owner_repository: Arc<O>,
    /// Token service for signing and refresh token persistence
    token_service: Arc<TokenService<T>>,
}

impl<U, O, T> AuthService<U, O, T>
where
    U: UserRepository,
    O: OwnerRepository,
    T: RefreshTokenRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user lookup
    /// * `owner_repository` - Repository for owner profile lookup
    /// * `token_service` - Service for JWT signing and token persistence
    pub fn new(
        user_repository: Arc<U>,
        owner_repository: Arc<O>,
        token_service: Arc<TokenService<T>>,
    ) -> Self {
        Self {
            user_repository,
            owner_repository,
            token_service,
        }
    }

    /// Issue a credential pair for a freshly authenticated user
    ///
    /// The caller has already validated the credentials and resolved the
    /// owner profile; this composes access token issuance with refresh
    /// token persistence.
    pub async fn login(
        &self,
        user: &User,
        owner: &OwnerProfile,
        device_info: Option<String>,
    ) -> DomainResult<AuthTokens> {
        self.token_service
            .issue_tokens(user, owner.id, device_info)
            .await
    }

    /// Exchange a refresh token for a new credential pair
    ///
    /// Validates the presented token, detects reuse, retires the old
    /// record, and issues a successor pair bound to the same user and
    /// owner. The old record's device descriptor carries forward.
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidRefreshToken` - No record matches the value
    /// * `TokenError::ReuseDetected` - The record was already retired; as
    ///   a side effect every live session of the user has been revoked
    /// * `TokenError::RefreshTokenExpired` - Record past its expiry
    /// * `AuthError::AccountUnauthorized` - Owning account missing,
    ///   inactive, or not a pet-owner account
    /// * `AuthError::OwnerProfileNotFound` - No owner profile for the user
    ///
    /// Infrastructure faults surface as `DomainError::Internal` and are
    /// never folded into the outcomes above.
    pub async fn rotate_tokens(&self, old_token_value: &str) -> DomainResult<AuthTokens> {
        let repository = &self.token_service.repository;

        let record = repository
            .find_by_token(old_token_value)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

        // Reuse is checked before expiry so an expired-and-revoked token
        // still tears the family down.
        if record.is_revoked() {
            return Err(self.handle_reuse(&record).await);
        }

        if record.is_expired() {
            return Err(DomainError::Token(TokenError::RefreshTokenExpired));
        }

        let user = self
            .user_repository
            .find_by_id(record.user_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::AccountUnauthorized))?;

        if !user.is_active() {
            return Err(DomainError::Auth(AuthError::AccountUnauthorized));
        }
        match user.account_type {
            AccountType::Owner => {}
            AccountType::Veterinarian | AccountType::Admin => {
                return Err(DomainError::Auth(AuthError::AccountUnauthorized));
            }
        }

        let owner = self
            .owner_repository
            .find_by_user_id(user.id)
            .await?
            .ok_or(DomainError::Auth(AuthError::OwnerProfileNotFound))?;

        // Conditional write: exactly one of any concurrent rotations of
        // this value performs the revoked transition. A loser observed a
        // token that is no longer valid, which is the reuse scenario.
        let won = repository.mark_revoked(&record.token, Utc::now()).await?;
        if !won {
            return Err(self.handle_reuse(&record).await);
        }

        let tokens = self
            .token_service
            .issue_tokens(&user, owner.id, record.device_info.clone())
            .await?;

        repository
            .mark_rotated(&record.token, &tokens.refresh_token)
            .await?;

        Ok(tokens)
    }

    /// Revoke a single refresh token (logout)
    ///
    /// Always succeeds: absent and already-revoked tokens are no-ops.
    pub async fn logout(&self, token_value: &str) -> DomainResult<()> {
        self.token_service.revoke_refresh_token(token_value).await
    }

    /// List the active refresh token records for a user
    pub async fn active_sessions(&self, user_id: i64) -> DomainResult<Vec<RefreshToken>> {
        self.token_service
            .repository
            .find_active_by_user(user_id)
            .await
    }

    /// Handle a reuse signal: revoke the user's entire session family
    ///
    /// Refresh tokens are chained by rotation, so a replayed stale token
    /// means the whole chain may be compromised; every live session for
    /// the user is torn down, not just the one chain.
    async fn handle_reuse(&self, record: &RefreshToken) -> DomainError {
        warn!(
            user_id = record.user_id,
            "refresh token reuse detected; revoking all sessions for user"
        );

        if let Err(err) = self
            .token_service
            .revoke_all_user_tokens(record.user_id)
            .await
        {
            // The reuse outcome still goes back to the caller; the family
            // sweep will be retried on the next reuse of any token.
            error!(
                user_id = record.user_id,
                error = %err,
                "failed to revoke session family after reuse detection"
            );
        }

        DomainError::Token(TokenError::ReuseDetected)
    }
}
