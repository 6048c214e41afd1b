// ============================
// crates/backend-lib/src/auth/rate_limit.rs
// ============================
//! Rate limiting for authentication attempts.
//!
//! Fixed window per `(client key, route family)`. The window resets lazily
//! on the next access after expiry, so no background sweep is needed for
//! correctness; `sweep` only bounds memory.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Route families that share a rate budget. Register and login both count
/// against `Auth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteFamily {
    Auth,
}

#[derive(Debug)]
struct RateWindow {
    window_start: Instant,
    count: u32,
}

/// Caps requests per client within a window. Counter updates go through
/// the map's entry guard, so concurrent bursts cannot undercount.
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<(String, RouteFamily), RateWindow>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: DashMap::new(),
            window,
            max_requests,
        }
    }

    /// Record a request from `client_key` and report whether it is within
    /// the cap. The `max_requests`-th request in a window is still allowed;
    /// the one after is not.
    pub fn allow(&self, client_key: &str, family: RouteFamily) -> bool {
        let mut entry = self
            .windows
            .entry((client_key.to_string(), family))
            .or_insert_with(|| RateWindow {
                window_start: Instant::now(),
                count: 0,
            });

        if entry.window_start.elapsed() > self.window {
            entry.count = 0;
            entry.window_start = Instant::now();
        }

        if entry.count >= self.max_requests {
            tracing::warn!(client_key, "rate limit exceeded");
            return false;
        }

        entry.count += 1;
        true
    }

    /// Drop windows that have expired. Optional; keeps memory bounded.
    pub fn sweep(&self) {
        self.windows
            .retain(|_, window| window.window_start.elapsed() <= self.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_cap() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);
        assert!(limiter.allow("1.2.3.4", RouteFamily::Auth));
        assert!(limiter.allow("1.2.3.4", RouteFamily::Auth));
        assert!(limiter.allow("1.2.3.4", RouteFamily::Auth));
        assert!(!limiter.allow("1.2.3.4", RouteFamily::Auth));
    }

    #[test]
    fn clients_are_counted_independently() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        assert!(limiter.allow("1.2.3.4", RouteFamily::Auth));
        assert!(limiter.allow("5.6.7.8", RouteFamily::Auth));
        assert!(!limiter.allow("1.2.3.4", RouteFamily::Auth));
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = RateLimiter::new(Duration::from_millis(50), 1);
        assert!(limiter.allow("1.2.3.4", RouteFamily::Auth));
        assert!(!limiter.allow("1.2.3.4", RouteFamily::Auth));

        std::thread::sleep(Duration::from_millis(60));
        assert!(limiter.allow("1.2.3.4", RouteFamily::Auth));
    }

    #[test]
    fn sweep_evicts_only_expired_windows() {
        let limiter = RateLimiter::new(Duration::from_millis(50), 5);
        limiter.allow("old", RouteFamily::Auth);
        std::thread::sleep(Duration::from_millis(60));
        limiter.allow("fresh", RouteFamily::Auth);

        limiter.sweep();
        assert_eq!(limiter.windows.len(), 1);
        assert!(limiter
            .windows
            .contains_key(&("fresh".to_string(), RouteFamily::Auth)));
    }

    #[tokio::test]
    async fn concurrent_bursts_do_not_undercount() {
        use std::sync::Arc;
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(60), 10));
        let mut handles = Vec::new();
        for _ in 0..32 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.allow("1.2.3.4", RouteFamily::Auth)
            }));
        }

        let mut allowed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 10);
    }
}
