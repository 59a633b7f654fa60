// YAML Application Config - tasks checklist, SMS templates, admin roster

pub mod admins;
pub mod paths;
pub mod sms;
pub mod tasks;

// Re-exports
pub use admins::AdminRoster;
pub use paths::ConfigDir;
pub use sms::SmsTemplates;
pub use tasks::load_tasks_config;
