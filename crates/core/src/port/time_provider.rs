// Clock Port

/// Clock abstraction so rate-limit and token tests can run on a
/// controlled timeline
pub trait TimeProvider: Send + Sync {
    /// Current time as milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// Wall-clock provider used in production wiring
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
