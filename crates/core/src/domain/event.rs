// Event Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

/// Event ID (UUID v4)
pub type EventId = String;

/// Free-form event form data (JSON object)
///
/// Holds whatever the dynamic form collected: `eventName`, `eventDate`
/// (MM/DD/YYYY), `hostName`, `hostContact`, checkbox groups, etc.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventData(serde_json::Map<String, serde_json::Value>);

impl EventData {
    pub fn new(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }

    /// Build from any JSON value; non-objects become an empty object.
    pub fn from_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|v| v.as_str())
    }

    pub fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        serde_json::Value::Object(self.0)
    }
}

/// Event entity
///
/// `completed_tasks` holds checklist completion keys: top-level tasks under
/// their bare name or id, nested subtasks as `task::path::to::subtask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub user_id: UserId,
    pub data: EventData,
    pub completed_tasks: Vec<String>,
    pub created_at: i64, // epoch ms
    pub updated_at: i64,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        user_id: impl Into<String>,
        data: EventData,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            data,
            completed_tasks: Vec::new(),
            created_at,
            updated_at: created_at,
        }
    }
}

/// Reminder subscription: the owner opted into SMS reminders for one event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub user_id: UserId,
    pub event_id: EventId,
    pub created_at: i64,
}
