use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    /// Denied, with the time remaining until the window resets
    Denied { retry_after: Duration },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Fixed-window rate limiting keyed by a caller-composed string,
/// typically `"<purpose>:<client-ip>"`. Injectable so handlers can be
/// tested with a permissive or scripted implementation, and so a shared
/// store can replace the in-memory one for multi-instance deployments.
pub trait RateLimiter: Send + Sync {
    fn check(&self, key: &str, limit: u32, window: Duration) -> Decision;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// In-memory fixed-window counter map.
///
/// The window boundary is absolute from the first call that opened it,
/// so a burst at rollover can admit up to 2x the limit across the
/// boundary. Entries are never evicted; the key space is bounded by
/// distinct purpose/IP pairs. Counters are per process: with several
/// instances behind a load balancer this is a speed bump, not a hard
/// control.
#[derive(Default)]
pub struct MemoryRateLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl MemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check against an explicit clock reading. Tests drive time through
    /// this; `check` passes `Instant::now()`.
    pub fn check_at(&self, key: &str, limit: u32, window: Duration, now: Instant) -> Decision {
        let mut windows = self.windows.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        match windows.get_mut(key) {
            Some(entry) if now < entry.reset_at => {
                if entry.count >= limit {
                    return Decision::Denied { retry_after: entry.reset_at - now };
                }
                entry.count += 1;
                Decision::Allowed
            }
            _ => {
                // First call, or the previous window has expired
                windows.insert(key.to_string(), Window { count: 1, reset_at: now + window });
                Decision::Allowed
            }
        }
    }
}

impl RateLimiter for MemoryRateLimiter {
    fn check(&self, key: &str, limit: u32, window: Duration) -> Decision {
        self.check_at(key, limit, window, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: Duration = Duration::from_secs(60);

    #[test]
    fn test_allows_up_to_limit_then_denies() {
        let limiter = MemoryRateLimiter::new();
        let now = Instant::now();

        for _ in 0..5 {
            assert!(limiter.check_at("session:1.2.3.4", 5, W, now).is_allowed());
        }
        assert!(!limiter.check_at("session:1.2.3.4", 5, W, now).is_allowed());
    }

    #[test]
    fn test_denial_reports_time_until_reset() {
        let limiter = MemoryRateLimiter::new();
        let start = Instant::now();

        assert!(limiter.check_at("setup:ip", 1, W, start).is_allowed());

        let later = start + Duration::from_secs(20);
        match limiter.check_at("setup:ip", 1, W, later) {
            Decision::Denied { retry_after } => assert_eq!(retry_after, Duration::from_secs(40)),
            Decision::Allowed => panic!("expected denial"),
        }
    }

    #[test]
    fn test_window_expiry_resets_counter_to_one() {
        let limiter = MemoryRateLimiter::new();
        let start = Instant::now();

        assert!(limiter.check_at("k", 2, W, start).is_allowed());
        assert!(limiter.check_at("k", 2, W, start).is_allowed());
        assert!(!limiter.check_at("k", 2, W, start).is_allowed());

        // past the absolute boundary: allowed again, counter restarts at 1
        let after = start + W + Duration::from_secs(1);
        assert!(limiter.check_at("k", 2, W, after).is_allowed());
        assert!(limiter.check_at("k", 2, W, after).is_allowed());
        assert!(!limiter.check_at("k", 2, W, after).is_allowed());
    }

    #[test]
    fn test_boundary_is_absolute_from_first_call() {
        let limiter = MemoryRateLimiter::new();
        let start = Instant::now();

        assert!(limiter.check_at("k", 1, W, start).is_allowed());
        // a later call inside the window does not slide the boundary
        assert!(!limiter.check_at("k", 1, W, start + Duration::from_secs(59)).is_allowed());
        assert!(limiter.check_at("k", 1, W, start + Duration::from_secs(61)).is_allowed());
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = MemoryRateLimiter::new();
        let now = Instant::now();

        assert!(limiter.check_at("search:a", 1, W, now).is_allowed());
        assert!(!limiter.check_at("search:a", 1, W, now).is_allowed());
        assert!(limiter.check_at("search:b", 1, W, now).is_allowed());
    }
}
