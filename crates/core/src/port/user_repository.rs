// User Repository Port (Interface)

use crate::domain::{User, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for User persistence
///
/// Lookups never surface soft-deleted users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Duplicate phone is a Conflict.
    async fn insert(&self, user: &User) -> Result<()>;

    /// Find active user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>>;

    /// Find active user by normalized phone number
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>>;

    /// Update first/last name, bumping updated_at. Returns the stored user.
    async fn update_profile(
        &self,
        id: &UserId,
        first_name: &str,
        last_name: &str,
        now_millis: i64,
    ) -> Result<User>;
}
