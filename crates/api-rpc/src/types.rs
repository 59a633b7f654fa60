//! RPC Request/Response Types
//!
//! Wire types for the JSON-RPC API. Timestamps cross the wire as RFC 3339
//! strings; internally everything is epoch milliseconds.

use serde::{Deserialize, Serialize};
use uneventful_core::application::checklist::TaskProgress;
use uneventful_core::domain::{Event, Subscription, TasksConfig, User};

/// Epoch ms to RFC 3339 (UTC). Out-of-range values fall back to the epoch.
pub fn millis_to_rfc3339(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339()
}

// ---- auth ----

#[derive(Debug, Deserialize)]
pub struct RequestLinkParams {
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestLinkResult {
    /// "link_sent" or "registration_required"
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterParams {
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResult {
    pub status: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyResult {
    pub session_token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct MeParams {
    pub session_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeResult {
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileParams {
    pub session_token: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileResult {
    pub user: UserProfile,
}

/// User as seen by API clients
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    pub is_verified: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl UserProfile {
    pub fn from_user(user: &User, is_admin: bool) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            email: user.email.clone(),
            is_active: user.is_active,
            is_admin,
            is_verified: user.is_verified,
            created_at: millis_to_rfc3339(user.created_at),
            updated_at: millis_to_rfc3339(user.updated_at),
        }
    }
}

// ---- events ----

#[derive(Debug, Deserialize)]
pub struct EventCreateParams {
    pub session_token: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct EventListParams {
    pub session_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventListResult {
    pub events: Vec<EventView>,
}

#[derive(Debug, Deserialize)]
pub struct EventGetParams {
    pub session_token: String,
    pub event_id: String,
}

#[derive(Debug, Deserialize)]
pub struct EventUpdateParams {
    pub session_token: String,
    pub event_id: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct SetCompletedTasksParams {
    pub session_token: String,
    pub event_id: String,
    pub completed_tasks: Vec<String>,
}

/// Event as seen by API clients
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub id: String,
    pub data: serde_json::Value,
    pub completed_tasks: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl EventView {
    pub fn from_event(event: Event) -> Self {
        Self {
            id: event.id,
            completed_tasks: event.completed_tasks,
            created_at: millis_to_rfc3339(event.created_at),
            updated_at: millis_to_rfc3339(event.updated_at),
            data: event.data.into_value(),
        }
    }
}

// ---- subscriptions ----

#[derive(Debug, Deserialize)]
pub struct SubscriptionParams {
    pub session_token: String,
    pub event_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResult {
    pub subscribed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    pub id: String,
    pub event_id: String,
    pub created_at: String,
}

impl SubscriptionView {
    pub fn from_subscription(sub: Subscription) -> Self {
        Self {
            id: sub.id,
            event_id: sub.event_id,
            created_at: millis_to_rfc3339(sub.created_at),
        }
    }
}

// ---- tasks ----

#[derive(Debug, Deserialize)]
pub struct TasksConfigParams {
    pub session_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TasksConfigResult {
    pub config: TasksConfig,
}

#[derive(Debug, Deserialize)]
pub struct TasksProgressParams {
    pub session_token: String,
    pub event_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TasksProgressResult {
    pub progress: Vec<TaskProgress>,
}

// ---- health ----

#[derive(Debug, Deserialize)]
pub struct HealthParams {}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResult {
    pub status: String,
    pub version: String,
    pub uptime_seconds: i64,
}
