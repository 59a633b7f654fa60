// Application Layer - Use Cases and Business Logic

pub mod auth;
pub mod checklist;
pub mod events;
pub mod rate_limit;
pub mod reminder;

// Re-exports
pub use auth::token::TokenService;
pub use rate_limit::SmsRateLimiter;
pub use reminder::{ReminderScheduler, ReminderService};
