// Magic-Link SMS Rate Limiter
//
// In-memory fixed-window counter keyed by normalized phone number. This is
// business policy (at most 3 magic-link SMS per phone per 15 minutes), not
// transport-level DoS protection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::port::TimeProvider;

pub const RATE_LIMIT_WINDOW_MS: i64 = 15 * 60 * 1000;
pub const MAX_REQUESTS_PER_WINDOW: u32 = 3;

struct Entry {
    count: u32,
    reset_at: i64, // epoch ms
}

/// Per-phone SMS rate limiter
///
/// `record` charges the window only after a successful send; the window is
/// not extended by further sends within it.
pub struct SmsRateLimiter {
    entries: Mutex<HashMap<String, Entry>>,
    time: Arc<dyn TimeProvider>,
    window_ms: i64,
    max_requests: u32,
}

impl SmsRateLimiter {
    pub fn new(time: Arc<dyn TimeProvider>) -> Self {
        Self::with_limits(time, RATE_LIMIT_WINDOW_MS, MAX_REQUESTS_PER_WINDOW)
    }

    pub fn with_limits(time: Arc<dyn TimeProvider>, window_ms: i64, max_requests: u32) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            time,
            window_ms,
            max_requests,
        }
    }

    /// Is this phone currently over its send budget?
    ///
    /// An expired entry is dropped on the spot.
    pub fn is_limited(&self, phone: &str) -> bool {
        let now = self.time.now_millis();
        let mut entries = self.lock();

        match entries.get(phone) {
            None => false,
            Some(entry) if now > entry.reset_at => {
                entries.remove(phone);
                false
            }
            Some(entry) => entry.count >= self.max_requests,
        }
    }

    /// Charge one send against the phone's window.
    pub fn record(&self, phone: &str) {
        let now = self.time.now_millis();
        let mut entries = self.lock();

        match entries.get_mut(phone) {
            Some(entry) if now <= entry.reset_at => {
                entry.count += 1;
            }
            _ => {
                entries.insert(
                    phone.to_string(),
                    Entry {
                        count: 1,
                        reset_at: now + self.window_ms,
                    },
                );
            }
        }
    }

    /// Seconds until the phone's window resets (ceiling), if a window exists.
    pub fn reset_in_secs(&self, phone: &str) -> Option<i64> {
        let now = self.time.now_millis();
        let entries = self.lock();
        entries.get(phone).map(|entry| {
            let remaining = (entry.reset_at - now).max(0);
            (remaining + 999) / 1000
        })
    }

    /// Drop expired entries (called periodically by the daemon).
    pub fn sweep(&self) {
        let now = self.time.now_millis();
        let mut entries = self.lock();
        entries.retain(|_, entry| now <= entry.reset_at);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
