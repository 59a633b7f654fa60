// Subscription Repository Port (Interface)

use crate::domain::{EventId, Subscription, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for reminder subscriptions
///
/// At most one subscription exists per (user, event) pair.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Create the subscription if absent; return the stored row either way.
    async fn upsert(
        &self,
        id: &str,
        user_id: &UserId,
        event_id: &EventId,
        now_millis: i64,
    ) -> Result<Subscription>;

    /// Remove the subscription if present
    async fn delete(&self, user_id: &UserId, event_id: &EventId) -> Result<()>;

    /// Look up the subscription for a (user, event) pair
    async fn find(&self, user_id: &UserId, event_id: &EventId) -> Result<Option<Subscription>>;
}
