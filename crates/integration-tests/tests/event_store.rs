//! Event Store Integration Tests
//!
//! Owner-scoped event CRUD and reminder subscriptions against real SQLite.

use std::sync::Arc;

use serde_json::json;
use uneventful_core::application::events as event_ops;
use uneventful_core::domain::{EventData, User};
use uneventful_core::error::AppError;
use uneventful_core::port::{
    EventRepository, SubscriptionRepository, SystemTimeProvider, UserRepository, UuidProvider,
};
use uneventful_infra_sqlite::{
    create_pool, run_migrations, SqliteEventRepository, SqliteSubscriptionRepository,
    SqliteUserRepository,
};

struct Store {
    users: Arc<SqliteUserRepository>,
    events: Arc<SqliteEventRepository>,
    subscriptions: Arc<SqliteSubscriptionRepository>,
    ids: UuidProvider,
    time: SystemTimeProvider,
}

async fn store() -> Store {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    Store {
        users: Arc::new(SqliteUserRepository::new(pool.clone())),
        events: Arc::new(SqliteEventRepository::new(pool.clone())),
        subscriptions: Arc::new(SqliteSubscriptionRepository::new(pool)),
        ids: UuidProvider,
        time: SystemTimeProvider,
    }
}

async fn seed_user(store: &Store, id: &str, phone: &str) {
    store
        .users
        .insert(&User::new(id, 1000, "Ada", "Lovelace", phone, None))
        .await
        .unwrap();
}

#[tokio::test]
async fn create_update_and_check_off_an_event() {
    let s = store().await;
    seed_user(&s, "u-1", "+15551234567").await;

    let event = event_ops::create_event(
        s.events.as_ref(),
        &s.ids,
        &s.time,
        &"u-1".to_string(),
        EventData::from_value(json!({ "eventName": "Launch Party", "guestCount": 40 })),
    )
    .await
    .unwrap();

    event_ops::update_event_data(
        s.events.as_ref(),
        &s.time,
        &"u-1".to_string(),
        &event.id,
        EventData::from_value(json!({ "eventName": "Launch Party", "guestCount": 60 })),
    )
    .await
    .unwrap();

    event_ops::set_completed_tasks(
        s.events.as_ref(),
        &s.time,
        &"u-1".to_string(),
        &event.id,
        vec!["Venue::Shortlist venues".to_string(), "invites".to_string()],
    )
    .await
    .unwrap();

    let stored = event_ops::get_owned_event(s.events.as_ref(), &"u-1".to_string(), &event.id)
        .await
        .unwrap();
    assert_eq!(stored.data.get("guestCount"), Some(&json!(60)));
    assert_eq!(stored.completed_tasks.len(), 2);
}

#[tokio::test]
async fn events_are_owner_scoped() {
    let s = store().await;
    seed_user(&s, "u-1", "+15551234567").await;
    seed_user(&s, "u-2", "+15559876543").await;

    let event = event_ops::create_event(
        s.events.as_ref(),
        &s.ids,
        &s.time,
        &"u-1".to_string(),
        EventData::from_value(json!({ "eventName": "Private" })),
    )
    .await
    .unwrap();

    let err = event_ops::get_owned_event(s.events.as_ref(), &"u-2".to_string(), &event.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = event_ops::update_event_data(
        s.events.as_ref(),
        &s.time,
        &"u-2".to_string(),
        &event.id,
        EventData::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn missing_event_is_not_found() {
    let s = store().await;
    seed_user(&s, "u-1", "+15551234567").await;

    let err = event_ops::get_owned_event(s.events.as_ref(), &"u-1".to_string(), &"nope".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn subscription_lifecycle() {
    let s = store().await;
    seed_user(&s, "u-1", "+15551234567").await;

    let event = event_ops::create_event(
        s.events.as_ref(),
        &s.ids,
        &s.time,
        &"u-1".to_string(),
        EventData::from_value(json!({ "eventName": "Bash" })),
    )
    .await
    .unwrap();

    // Nothing subscribed initially
    let found = s
        .subscriptions
        .find(&"u-1".to_string(), &event.id)
        .await
        .unwrap();
    assert!(found.is_none());

    // Subscribe twice: second call is a no-op keeping the original row
    let first = s
        .subscriptions
        .upsert("s-1", &"u-1".to_string(), &event.id, 1000)
        .await
        .unwrap();
    let second = s
        .subscriptions
        .upsert("s-2", &"u-1".to_string(), &event.id, 2000)
        .await
        .unwrap();
    assert_eq!(first.id, second.id);

    // Unsubscribe is idempotent too
    s.subscriptions
        .delete(&"u-1".to_string(), &event.id)
        .await
        .unwrap();
    s.subscriptions
        .delete(&"u-1".to_string(), &event.id)
        .await
        .unwrap();

    let found = s
        .subscriptions
        .find(&"u-1".to_string(), &event.id)
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn listing_orders_newest_first() {
    let s = store().await;
    seed_user(&s, "u-1", "+15551234567").await;

    // Insert directly so created_at is controlled
    for (id, created_at) in [("e-old", 1000_i64), ("e-new", 3000), ("e-mid", 2000)] {
        let mut event = uneventful_core::domain::Event::new(
            id,
            created_at,
            "u-1",
            EventData::from_value(json!({ "eventName": id })),
        );
        event.updated_at = created_at;
        s.events.insert(&event).await.unwrap();
    }

    let events = s.events.find_by_user(&"u-1".to_string()).await.unwrap();
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["e-new", "e-mid", "e-old"]);
}
