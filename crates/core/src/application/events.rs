// Event Use Cases (owner-scoped CRUD)

use crate::domain::{Event, EventData, EventId, UserId};
use crate::error::{AppError, Result};
use crate::port::{EventRepository, IdProvider, TimeProvider};

/// Create an event owned by `user_id`.
pub async fn create_event(
    events: &dyn EventRepository,
    ids: &dyn IdProvider,
    time: &dyn TimeProvider,
    user_id: &UserId,
    data: EventData,
) -> Result<Event> {
    let event = Event::new(ids.generate_id(), time.now_millis(), user_id.clone(), data);
    events.insert(&event).await?;
    Ok(event)
}

/// Load an event, enforcing ownership.
pub async fn get_owned_event(
    events: &dyn EventRepository,
    user_id: &UserId,
    event_id: &EventId,
) -> Result<Event> {
    let event = events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    if &event.user_id != user_id {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }
    Ok(event)
}

/// Replace the form data of an owned event.
pub async fn update_event_data(
    events: &dyn EventRepository,
    time: &dyn TimeProvider,
    user_id: &UserId,
    event_id: &EventId,
    data: EventData,
) -> Result<()> {
    get_owned_event(events, user_id, event_id).await?;
    events
        .update_data(event_id, &data, time.now_millis())
        .await
}

/// Replace the completed-task keys of an owned event.
pub async fn set_completed_tasks(
    events: &dyn EventRepository,
    time: &dyn TimeProvider,
    user_id: &UserId,
    event_id: &EventId,
    completed_tasks: Vec<String>,
) -> Result<()> {
    get_owned_event(events, user_id, event_id).await?;
    events
        .update_completed_tasks(event_id, &completed_tasks, time.now_millis())
        .await
}
