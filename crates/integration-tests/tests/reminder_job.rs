//! Daily Reminder Job Integration Tests
//!
//! End-to-end reminder runs against real SQLite repositories, a tasks.yaml
//! on disk, and a recording SMS sender.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use uneventful_core::application::ReminderService;
use uneventful_core::domain::{Event, EventData, User};
use uneventful_core::error::Result;
use uneventful_core::port::{
    EventRepository, SmsReceipt, SmsSender, SubscriptionRepository, UserRepository,
};
use uneventful_infra_sqlite::{
    create_pool, run_migrations, SqliteEventRepository, SqliteSubscriptionRepository,
    SqliteUserRepository,
};

#[derive(Default)]
struct RecordingSms {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SmsSender for RecordingSms {
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(SmsReceipt {
            message_id: "SM1".to_string(),
        })
    }
}

fn write_tasks_config(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("uneventful-reminder-it-{}", name));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("tasks.yaml");
    std::fs::write(
        &path,
        r#"tasks:
  - id: invites
    name: Send invitations
    description: Mail the invitations.
    deadline: 14
  - id: cake
    name: Order the cake
    description: Call the bakery.
    deadline: 7
"#,
    )
    .unwrap();
    path
}

struct Fixture {
    events: Arc<SqliteEventRepository>,
    subscriptions: Arc<SqliteSubscriptionRepository>,
    sms: Arc<RecordingSms>,
    service: ReminderService,
}

async fn fixture(name: &str) -> Fixture {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let users = SqliteUserRepository::new(pool.clone());
    users
        .insert(&User::new("u-1", 1000, "Ada", "Lovelace", "+15551234567", None))
        .await
        .unwrap();

    let events = Arc::new(SqliteEventRepository::new(pool.clone()));
    let subscriptions = Arc::new(SqliteSubscriptionRepository::new(pool));
    let sms = Arc::new(RecordingSms::default());

    let service = ReminderService::new(
        events.clone(),
        subscriptions.clone(),
        sms.clone(),
        write_tasks_config(name),
    );

    Fixture {
        events,
        subscriptions,
        sms,
        service,
    }
}

async fn seed_event(
    f: &Fixture,
    id: &str,
    created_at: i64,
    data: serde_json::Value,
    subscribed: bool,
) {
    f.events
        .insert(&Event::new(id, created_at, "u-1", EventData::from_value(data)))
        .await
        .unwrap();
    if subscribed {
        f.subscriptions
            .upsert(&format!("s-{}", id), &"u-1".to_string(), &id.to_string(), 1000)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn sends_consolidated_reminder_for_due_tasks() {
    let f = fixture("consolidated").await;

    // 14 days out: "Send invitations" is due
    seed_event(
        &f,
        "e-1",
        2000,
        json!({
            "eventName": "Launch Party",
            "eventDate": "06/15/2026",
            "hostName": "Ada",
            "hostContact": "5551234567",
        }),
        true,
    )
    .await;

    // Same host phone, 7 days out: "Order the cake" is due
    seed_event(
        &f,
        "e-2",
        1000,
        json!({
            "eventName": "Retro Night",
            "eventDate": "06/08/2026",
            "hostName": "Ada",
            "hostContact": "(555) 123-4567",
        }),
        true,
    )
    .await;

    let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    let stats = f.service.run_once(today).await.unwrap();

    assert_eq!(stats.events_scanned, 2);
    assert_eq!(stats.messages_sent, 1);
    assert_eq!(stats.send_failures, 0);

    let sent = f.sms.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+15551234567");
    assert_eq!(
        sent[0].1,
        "Hi Ada! Task reminders:\n\n\
         Launch Party:\n  - Send invitations\n\n\
         Retro Night:\n  - Order the cake\n\n\
         Manage your events at uneventful.bawdyshop.space"
    );
}

#[tokio::test]
async fn skips_unsubscribed_completed_and_undue_events() {
    let f = fixture("skips").await;

    // Due but not subscribed
    seed_event(
        &f,
        "e-1",
        3000,
        json!({
            "eventName": "Quiet Party",
            "eventDate": "06/15/2026",
            "hostContact": "5551234567",
        }),
        false,
    )
    .await;

    // Subscribed but nothing lands on today's deadlines
    seed_event(
        &f,
        "e-2",
        2000,
        json!({
            "eventName": "Far Future",
            "eventDate": "12/31/2026",
            "hostContact": "5551234567",
        }),
        true,
    )
    .await;

    // Subscribed and due, but the task is already checked off
    f.events
        .insert(&Event::new(
            "e-3",
            1000,
            "u-1",
            EventData::from_value(json!({
                "eventName": "Done Already",
                "eventDate": "06/15/2026",
                "hostContact": "5551234567",
            })),
        ))
        .await
        .unwrap();
    f.events
        .update_completed_tasks(&"e-3".to_string(), &["invites".to_string()], 1000)
        .await
        .unwrap();
    f.subscriptions
        .upsert("s-e-3", &"u-1".to_string(), &"e-3".to_string(), 1000)
        .await
        .unwrap();

    let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    let stats = f.service.run_once(today).await.unwrap();

    assert_eq!(stats.events_scanned, 3);
    assert_eq!(stats.messages_sent, 0);
    assert!(f.sms.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn ignores_contacts_that_are_not_phone_numbers() {
    let f = fixture("contacts").await;

    seed_event(
        &f,
        "e-1",
        1000,
        json!({
            "eventName": "Email Only",
            "eventDate": "06/15/2026",
            "hostContact": "ada@example.com",
        }),
        true,
    )
    .await;

    let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    let stats = f.service.run_once(today).await.unwrap();

    assert_eq!(stats.messages_sent, 0);
    assert!(f.sms.sent.lock().unwrap().is_empty());
}
