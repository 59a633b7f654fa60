// Port Layer - Interfaces for external dependencies

pub mod event_repository;
pub mod id_provider;
pub mod sms_sender;
pub mod subscription_repository;
pub mod time_provider;
pub mod user_repository;

// Re-exports
pub use event_repository::EventRepository;
pub use id_provider::{IdProvider, UuidProvider};
pub use sms_sender::{SmsReceipt, SmsSender};
pub use subscription_repository::SubscriptionRepository;
pub use time_provider::{SystemTimeProvider, TimeProvider};
pub use user_repository::UserRepository;
