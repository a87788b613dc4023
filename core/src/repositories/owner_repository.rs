//! Owner profile repository trait.

use async_trait::async_trait;

use crate::domain::entities::owner::OwnerProfile;
use crate::errors::DomainError;

/// Repository trait for owner profile lookup
#[async_trait]
pub trait OwnerRepository: Send + Sync {
    /// Find the owner profile attached to a user account
    ///
    /// # Returns
    /// * `Ok(Some(OwnerProfile))` - Profile found
    /// * `Ok(None)` - The user has no owner profile
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<OwnerProfile>, DomainError>;
}
