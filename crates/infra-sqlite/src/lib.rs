// uneventful Infrastructure - SQLite Adapter
// Implements: UserRepository, EventRepository, SubscriptionRepository

mod connection;
mod error_map;
mod event_repository;
mod migration;
mod subscription_repository;
mod user_repository;

pub use connection::create_pool;
pub use event_repository::SqliteEventRepository;
pub use migration::run_migrations;
pub use subscription_repository::SqliteSubscriptionRepository;
pub use user_repository::SqliteUserRepository;

// Note: sqlx::Error conversion is handled by error_map::map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
