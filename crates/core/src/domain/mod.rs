// Domain Layer - Pure business logic and entities

pub mod condition;
pub mod event;
pub mod phone;
pub mod task;
pub mod user;

// Re-exports
pub use condition::{Condition, Operator};
pub use event::{Event, EventData, EventId, Subscription};
pub use task::{Subtask, SubtaskItem, Task, TasksConfig};
pub use user::{User, UserId};
