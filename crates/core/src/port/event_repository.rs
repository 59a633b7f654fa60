// Event Repository Port (Interface)

use crate::domain::{Event, EventData, EventId, UserId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Event persistence
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new event
    async fn insert(&self, event: &Event) -> Result<()>;

    /// Find event by ID
    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>>;

    /// List a user's events, newest first
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Event>>;

    /// Replace the event's form data
    async fn update_data(&self, id: &EventId, data: &EventData, now_millis: i64) -> Result<()>;

    /// Replace the event's completed-task keys
    async fn update_completed_tasks(
        &self,
        id: &EventId,
        completed_tasks: &[String],
        now_millis: i64,
    ) -> Result<()>;

    /// All events across all users, newest first (reminder job)
    async fn find_all(&self) -> Result<Vec<Event>>;
}
