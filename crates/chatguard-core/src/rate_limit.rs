//! Sliding-window message rate limiting.
//!
//! Per-user throttling for chat sends. Each [`RateLimiter`] owns its own
//! state, so independent limiters can be instantiated freely (and tested
//! in isolation) instead of sharing process-wide hidden state.
//!
//! A rejected call does not consume a slot: a caller that retries
//! immediately keeps getting rejected until the window slides forward.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

/// Rate-limiter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum accepted messages per window.
    pub max_messages: usize,
    /// Window length in milliseconds.
    pub window_ms: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_messages: 10,
            window_ms: 60_000,
        }
    }
}

/// Sliding-window rate limiter keyed by user id.
pub struct RateLimiter {
    config: RateLimitConfig,
    /// Accepted-message timestamps (epoch ms) per user, insertion-ordered.
    entries: RwLock<HashMap<String, Vec<i64>>>,
}

impl RateLimiter {
    /// Creates a limiter with the given settings.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a limiter with the default settings (10 messages / 60 s).
    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    /// Returns the settings this limiter was built with.
    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Checks whether `user_id` may send a message now.
    ///
    /// Accepting records the current timestamp; rejecting records nothing.
    pub fn check(&self, user_id: &str) -> bool {
        self.check_at(user_id, Utc::now().timestamp_millis())
    }

    /// Clock-explicit variant of [`check`](Self::check), used by tests and
    /// by callers that batch with an externally sampled clock.
    pub fn check_at(&self, user_id: &str, now_ms: i64) -> bool {
        let mut entries = self.entries.write().unwrap();
        let timestamps = entries.entry(user_id.to_string()).or_default();

        // Prune to the window; the pruned list is kept even on rejection.
        timestamps.retain(|&t| now_ms - t < self.config.window_ms);

        if timestamps.len() >= self.config.max_messages {
            tracing::debug!(user_id, "message rejected by rate limiter");
            return false;
        }
        timestamps.push(now_ms);
        true
    }

    /// Evicts users whose windows have emptied, bounding map growth.
    ///
    /// Call periodically from the host; returns the number of evicted users.
    pub fn prune_stale(&self) -> usize {
        self.prune_stale_at(Utc::now().timestamp_millis())
    }

    /// Clock-explicit variant of [`prune_stale`](Self::prune_stale).
    pub fn prune_stale_at(&self, now_ms: i64) -> usize {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|_, timestamps| {
            timestamps.retain(|&t| now_ms - t < self.config.window_ms);
            !timestamps.is_empty()
        });
        before - entries.len()
    }

    /// Number of users currently holding state.
    pub fn tracked_users(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: usize, window_ms: i64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_messages: max,
            window_ms,
        })
    }

    // ==================== Capacity Tests ====================

    #[test]
    fn accepts_up_to_capacity_then_rejects() {
        let limiter = limiter(3, 1000);
        let results: Vec<bool> = (0..4).map(|i| limiter.check_at("user1", i)).collect();
        assert_eq!(results, vec![true, true, true, false]);
    }

    #[test]
    fn default_config_allows_ten_per_minute() {
        let limiter = RateLimiter::with_defaults();
        for i in 0..10 {
            assert!(limiter.check_at("user1", i));
        }
        assert!(!limiter.check_at("user1", 11));
    }

    #[test]
    fn users_are_independent() {
        let limiter = limiter(1, 1000);
        assert!(limiter.check_at("user1", 0));
        assert!(limiter.check_at("user2", 0));
        assert!(!limiter.check_at("user1", 1));
    }

    // ==================== Sliding Window Tests ====================

    #[test]
    fn window_frees_capacity_one_slot_at_a_time() {
        let limiter = limiter(3, 1000);
        assert!(limiter.check_at("user1", 0));
        assert!(limiter.check_at("user1", 200));
        assert!(limiter.check_at("user1", 400));
        assert!(!limiter.check_at("user1", 999));

        // The earliest accepted call leaves the window at t=1000
        assert!(limiter.check_at("user1", 1000));
        // Full again until the t=200 entry expires
        assert!(!limiter.check_at("user1", 1100));
        assert!(limiter.check_at("user1", 1200));
    }

    #[test]
    fn rejection_does_not_consume_a_slot() {
        let limiter = limiter(2, 1000);
        assert!(limiter.check_at("user1", 0));
        assert!(limiter.check_at("user1", 100));

        // Hammering while full must not extend the rejection horizon
        for t in 200..210 {
            assert!(!limiter.check_at("user1", t));
        }
        // The t=0 slot still frees exactly when its window ends
        assert!(limiter.check_at("user1", 1000));
    }

    #[test]
    fn fresh_window_after_long_idle() {
        let limiter = limiter(2, 1000);
        assert!(limiter.check_at("user1", 0));
        assert!(limiter.check_at("user1", 1));
        assert!(!limiter.check_at("user1", 2));

        assert!(limiter.check_at("user1", 10_000));
        assert!(limiter.check_at("user1", 10_001));
        assert!(!limiter.check_at("user1", 10_002));
    }

    // ==================== Eviction Tests ====================

    #[test]
    fn prune_stale_evicts_idle_users() {
        let limiter = limiter(3, 1000);
        limiter.check_at("user1", 0);
        limiter.check_at("user2", 500);
        assert_eq!(limiter.tracked_users(), 2);

        // user1's window has emptied; user2's has not
        assert_eq!(limiter.prune_stale_at(1200), 1);
        assert_eq!(limiter.tracked_users(), 1);

        assert_eq!(limiter.prune_stale_at(2000), 1);
        assert_eq!(limiter.tracked_users(), 0);
    }

    #[test]
    fn prune_keeps_active_users_intact() {
        let limiter = limiter(2, 1000);
        limiter.check_at("user1", 0);
        limiter.check_at("user1", 900);

        assert_eq!(limiter.prune_stale_at(1100), 0);
        // The t=900 entry still counts toward capacity
        assert!(limiter.check_at("user1", 1150));
        assert!(!limiter.check_at("user1", 1160));
    }

    #[test]
    fn wall_clock_entry_point_works() {
        let limiter = limiter(2, 60_000);
        assert!(limiter.check("user1"));
        assert!(limiter.check("user1"));
        assert!(!limiter.check("user1"));
    }
}
