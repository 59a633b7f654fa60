// Daily Reminder Job
//
// Scans all events once a day, finds preparation tasks whose deadline lands
// on today, and sends one consolidated SMS per host phone number.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use tracing::{error, info};

use crate::config::load_tasks_config;
use crate::domain::phone::host_contact_to_e164;
use crate::domain::{Event, Task};
use crate::error::Result;
use crate::port::{EventRepository, SmsSender, SubscriptionRepository};

const REMINDER_FOOTER: &str = "Manage your events at uneventful.bawdyshop.space";
const DEFAULT_HOST_NAME: &str = "Host";
const DEFAULT_EVENT_NAME: &str = "your event";

/// Parse an event date in MM/DD/YYYY form (the dynamic form's date format).
pub fn parse_event_date(date_str: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = date_str.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let month: u32 = parts[0].trim().parse().ok()?;
    let day: u32 = parts[1].trim().parse().ok()?;
    let year: i32 = parts[2].trim().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whole days from `today` until the event (negative once it has passed).
pub fn days_until_event(event_date: NaiveDate, today: NaiveDate) -> i64 {
    (event_date - today).num_days()
}

/// Tasks due today for one event: deadline matches the day count and the
/// task id is not already checked off.
pub fn tasks_due_today<'a>(event: &Event, tasks: &'a [Task], today: NaiveDate) -> Vec<&'a Task> {
    let Some(date_str) = event.data.get_str("eventDate") else {
        return Vec::new();
    };
    let Some(event_date) = parse_event_date(date_str) else {
        return Vec::new();
    };

    let days_until = days_until_event(event_date, today);

    tasks
        .iter()
        .filter(|task| {
            !event.completed_tasks.contains(&task.id) && task.deadline == days_until
        })
        .collect()
}

/// Due tasks of one event, under its display name
#[derive(Debug, Clone)]
struct EventReminder {
    event_name: String,
    task_names: Vec<String>,
}

/// All reminders routed to one phone number
#[derive(Debug, Clone)]
struct HostReminders {
    phone_number: String,
    host_name: String,
    events: Vec<EventReminder>,
}

fn build_reminder_message(reminders: &HostReminders) -> String {
    let mut message = format!("Hi {}! Task reminders:\n\n", reminders.host_name);

    for event in &reminders.events {
        message.push_str(&format!("{}:\n", event.event_name));
        for task_name in &event.task_names {
            message.push_str(&format!("  - {}\n", task_name));
        }
        message.push('\n');
    }

    message.push_str(REMINDER_FOOTER);
    message
}

/// Stats from one reminder run
#[derive(Debug, Clone, Default)]
pub struct ReminderRunStats {
    pub events_scanned: usize,
    pub messages_sent: usize,
    pub send_failures: usize,
}

/// Scans events and sends consolidated reminder SMS
pub struct ReminderService {
    events: Arc<dyn EventRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    sms: Arc<dyn SmsSender>,
    tasks_path: PathBuf,
}

impl ReminderService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        sms: Arc<dyn SmsSender>,
        tasks_path: PathBuf,
    ) -> Self {
        Self {
            events,
            subscriptions,
            sms,
            tasks_path,
        }
    }

    /// Run one reminder pass for `today`.
    ///
    /// The tasks config is re-read each run so checklist edits apply without
    /// a restart. Send failures are logged, never fatal.
    pub async fn run_once(&self, today: NaiveDate) -> Result<ReminderRunStats> {
        info!(%today, "Running daily reminder check");

        let tasks = load_tasks_config(&self.tasks_path)?.tasks;
        let events = self.events.find_all().await?;

        let mut stats = ReminderRunStats {
            events_scanned: events.len(),
            ..Default::default()
        };

        // Group reminders by phone number, preserving scan order
        let mut by_phone: Vec<HostReminders> = Vec::new();

        for event in &events {
            let due = tasks_due_today(event, &tasks, today);
            if due.is_empty() {
                continue;
            }

            // Only subscribed hosts get texted
            let subscription = self.subscriptions.find(&event.user_id, &event.id).await?;
            if subscription.is_none() {
                info!(event_id = %event.id, "Host not subscribed, skipping");
                continue;
            }

            let Some(host_contact) = event.data.get_str("hostContact") else {
                info!(event_id = %event.id, "No contact info, skipping");
                continue;
            };

            let Some(phone_number) = host_contact_to_e164(host_contact) else {
                info!(
                    event_id = %event.id,
                    contact = %host_contact,
                    "Contact does not look like a phone number, skipping"
                );
                continue;
            };

            let host_name = event
                .data
                .get_str("hostName")
                .unwrap_or(DEFAULT_HOST_NAME)
                .to_string();
            let event_name = event
                .data
                .get_str("eventName")
                .unwrap_or(DEFAULT_EVENT_NAME)
                .to_string();

            let reminder = EventReminder {
                event_name,
                task_names: due.iter().map(|t| t.name.clone()).collect(),
            };

            match by_phone.iter_mut().find(|r| r.phone_number == phone_number) {
                Some(existing) => existing.events.push(reminder),
                None => by_phone.push(HostReminders {
                    phone_number,
                    host_name,
                    events: vec![reminder],
                }),
            }
        }

        // One SMS per phone number with all their reminders
        for reminders in &by_phone {
            let message = build_reminder_message(reminders);
            info!(
                phone = %reminders.phone_number,
                event_count = reminders.events.len(),
                "Sending consolidated reminder"
            );

            match self.sms.send(&reminders.phone_number, &message).await {
                Ok(receipt) => {
                    info!(message_id = %receipt.message_id, "Reminder sent");
                    stats.messages_sent += 1;
                }
                Err(e) => {
                    error!(phone = %reminders.phone_number, error = %e, "Failed to send reminder");
                    stats.send_failures += 1;
                }
            }
        }

        info!(
            messages_sent = stats.messages_sent,
            send_failures = stats.send_failures,
            "Reminder check complete"
        );
        Ok(stats)
    }
}

/// Time to wait from `now` until the next `hour`:00 local run.
pub fn duration_until_next_run(now: NaiveDateTime, hour: u32) -> std::time::Duration {
    let mut target = now
        .date()
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| now.date().and_hms_opt(0, 0, 0).expect("midnight exists"));
    if now >= target {
        target += chrono::Duration::days(1);
    }
    (target - now).to_std().unwrap_or_default()
}

/// Fires the reminder service daily at a fixed local hour (default 9 AM)
pub struct ReminderScheduler {
    service: Arc<ReminderService>,
    hour: u32,
}

impl ReminderScheduler {
    pub fn new(service: Arc<ReminderService>, hour: u32) -> Self {
        Self { service, hour }
    }

    /// Daily loop; should be spawned in tokio::spawn.
    pub async fn run(self) {
        info!(hour = self.hour, "Daily reminder job scheduled");

        loop {
            let now: DateTime<Local> = Local::now();
            let wait = duration_until_next_run(now.naive_local(), self.hour);
            tokio::time::sleep(wait).await;

            let today = Local::now().date_naive();
            if let Err(e) = self.service.run_once(today).await {
                error!(error = %e, "Reminder run failed");
            }
        }
    }
}
