//! User repository trait defining the read-only interface for user lookup.
//!
//! The credential kernel only ever reads user records; registration and
//! account management belong to other services.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for user lookup
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given ID
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;
}
