//! Sliding-Window Rate Limiter
//!
//! Per-client admission control guarding the scan pipeline. Buckets hold
//! the raw request timestamps inside the trailing window; a periodic
//! cleanup pass bounds the map to active clients and a hard identifier cap
//! protects against spoofed-header growth.

use axum::http::HeaderMap;
use dashmap::DashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Sliding window duration
    pub window: Duration,
    /// Requests admitted per window
    pub max_requests: usize,
    /// How often the full-map cleanup pass runs
    pub cleanup_interval: Duration,
    /// Hard cap on tracked client identifiers
    pub max_tracked_ids: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_requests: 30,
            cleanup_interval: Duration::from_secs(120),
            max_tracked_ids: 10_000,
        }
    }
}

/// In-memory sliding-window limiter. One instance per process, owned by the
/// service state; all access goes through its methods.
pub struct RateLimiter {
    /// Request timestamps per client identifier
    buckets: DashMap<String, Vec<Instant>>,
    last_cleanup: Mutex<Instant>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            last_cleanup: Mutex::new(Instant::now()),
            config,
        }
    }

    /// Check and record a request for `id`. Returns true when the caller
    /// must be rejected with 429.
    pub fn is_rate_limited(&self, id: &str) -> bool {
        self.check(id, Instant::now())
    }

    /// Clock-injected core, used directly by tests.
    pub fn check(&self, id: &str, now: Instant) -> bool {
        self.maybe_cleanup(now);

        // A full map rejects brand-new identifiers outright instead of
        // growing without bound under spoofed headers.
        if !self.buckets.contains_key(id) && self.buckets.len() >= self.config.max_tracked_ids {
            debug!(tracked = self.buckets.len(), "rate limiter at capacity, rejecting new id");
            return true;
        }

        let cutoff = now.checked_sub(self.config.window);
        let mut bucket = self.buckets.entry(id.to_string()).or_default();
        if let Some(cutoff) = cutoff {
            bucket.retain(|t| *t > cutoff);
        }
        bucket.push(now);
        bucket.len() > self.config.max_requests
    }

    /// Drop expired timestamps for every tracked id and remove empty
    /// buckets. Runs at most once per cleanup interval so steady-state work
    /// is proportional to active clients, not historical ones.
    fn maybe_cleanup(&self, now: Instant) {
        {
            let Ok(mut last) = self.last_cleanup.lock() else {
                return;
            };
            if now.duration_since(*last) < self.config.cleanup_interval {
                return;
            }
            *last = now;
        }

        let Some(cutoff) = now.checked_sub(self.config.window) else {
            return;
        };
        let before = self.buckets.len();
        self.buckets.retain(|_, timestamps| {
            timestamps.retain(|t| *t > cutoff);
            !timestamps.is_empty()
        });
        let removed = before - self.buckets.len();
        if removed > 0 {
            debug!(removed, "rate limiter cleanup pass");
        }
    }

    /// Number of tracked identifiers (monitoring only).
    pub fn tracked_ids(&self) -> usize {
        self.buckets.len()
    }

    /// Requests left in the current window for `id` (response-header hint;
    /// stale entries inside the window still count until pruned).
    pub fn remaining(&self, id: &str) -> usize {
        self.buckets
            .get(id)
            .map(|bucket| self.config.max_requests.saturating_sub(bucket.len()))
            .unwrap_or(self.config.max_requests)
    }
}

/// Derive the rate-limit identifier for a request: first forwarded-for
/// entry, else the real-ip header, else a shared "unknown" bucket — all
/// header-less clients share one budget by design.
pub fn client_id(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> RateLimiter {
        RateLimiter::new(RateLimitConfig::default())
    }

    #[test]
    fn test_admits_up_to_limit_then_rejects() {
        let rl = limiter();
        let now = Instant::now();
        for i in 0..30 {
            assert!(!rl.check("1.2.3.4", now), "request {} should be admitted", i + 1);
        }
        assert!(rl.check("1.2.3.4", now), "31st request should be rejected");
    }

    #[test]
    fn test_window_slides() {
        let rl = limiter();
        let base = Instant::now();
        for _ in 0..31 {
            rl.check("1.2.3.4", base);
        }
        assert!(rl.check("1.2.3.4", base));

        // After the window fully elapses, admission resumes
        let later = base + Duration::from_secs(61);
        assert!(!rl.check("1.2.3.4", later));
    }

    #[test]
    fn test_identifiers_are_independent() {
        let rl = limiter();
        let now = Instant::now();
        for _ in 0..30 {
            rl.check("a", now);
        }
        assert!(rl.check("a", now));
        assert!(!rl.check("b", now));
    }

    #[test]
    fn test_id_cap_rejects_new_ids() {
        let rl = RateLimiter::new(RateLimitConfig {
            max_tracked_ids: 100,
            ..RateLimitConfig::default()
        });
        let now = Instant::now();
        for i in 0..100 {
            assert!(!rl.check(&format!("id-{}", i), now));
        }
        assert_eq!(rl.tracked_ids(), 100);
        // Brand-new identifier rejected outright, without a new entry
        assert!(rl.check("fresh", now));
        assert_eq!(rl.tracked_ids(), 100);
        // Existing identifiers still served
        assert!(!rl.check("id-0", now));
    }

    #[test]
    fn test_cleanup_drops_idle_ids() {
        let rl = RateLimiter::new(RateLimitConfig::default());
        let base = Instant::now();
        rl.check("idle", base);
        assert_eq!(rl.tracked_ids(), 1);

        // Cleanup interval elapsed and the idle bucket is out of window
        rl.check("active", base + Duration::from_secs(121));
        assert_eq!(rl.tracked_ids(), 1);
        assert!(rl.buckets.contains_key("active"));
    }

    #[test]
    fn test_client_id_derivation() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "1.2.3.4, 5.6.7.8".parse().unwrap());
        assert_eq!(client_id(&headers), "1.2.3.4");

        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "9.9.9.9".parse().unwrap());
        assert_eq!(client_id(&headers), "9.9.9.9");

        let headers = HeaderMap::new();
        assert_eq!(client_id(&headers), "unknown");
    }
}
