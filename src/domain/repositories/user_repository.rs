use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::user::User;

/// Read and single-statement write contract for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `NOT_FOUND` for unknown ids.
    async fn get_by_id(&self, user_id: &str) -> DomainResult<User>;

    /// Persists the activity flag and returns the updated user.
    /// Fails with `NOT_FOUND` for unknown ids.
    async fn set_activity(&self, user_id: &str, is_active: bool) -> DomainResult<User>;

    async fn count(&self) -> DomainResult<i64>;
}
