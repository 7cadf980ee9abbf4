//! Violation tracking and the chat-send gate.
//!
//! Blocked contact-sharing attempts are tracked per user and escalate:
//! a plain warning first, an enhanced warning once the user keeps trying,
//! and a restriction notice after that. [`ChatGate`] composes the rate
//! limiter, the PII detector, and the tracker into the single decision a
//! send pipeline needs per outgoing message.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::pii::{PiiDetection, PiiDetector};
use crate::rate_limit::RateLimiter;

/// Violations at which the enhanced warning starts.
const FLAG_THRESHOLD: usize = 3;
/// Violations at which the account is restricted.
const RESTRICT_THRESHOLD: usize = 5;
/// Window for the "recent violations" count (24 hours).
const RECENT_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

const VIOLATION_WARNING: &str = "Sharing contact information is prohibited. \
     Repeated violations may deactivate your account. \
     Use the platform's secure messaging to communicate.";

const FLAGGED_WARNING: &str = "WARNING: Multiple contact sharing attempts detected. \
     Your account has been flagged for review. \
     Further violations will result in account restriction.";

const RESTRICTION_NOTICE: &str = "Your account has been restricted due to repeated attempts \
     to share contact information. Please contact support to appeal this restriction.";

/// Escalation stage reached after recording a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementLevel {
    /// Standard warning.
    Warned,
    /// Flagged for review; enhanced warning.
    Flagged,
    /// Restricted; the account can no longer send.
    Restricted,
}

impl EnforcementLevel {
    /// The user-facing warning text for this stage.
    pub fn warning_text(&self) -> &'static str {
        match self {
            EnforcementLevel::Warned => VIOLATION_WARNING,
            EnforcementLevel::Flagged => FLAGGED_WARNING,
            EnforcementLevel::Restricted => RESTRICTION_NOTICE,
        }
    }
}

/// A user's violation history at a glance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationSummary {
    pub user_id: String,
    /// All recorded violations.
    pub total: usize,
    /// Violations within the last 24 hours.
    pub recent: usize,
    pub is_restricted: bool,
}

/// In-memory, per-user history of blocked contact-sharing attempts.
pub struct ViolationTracker {
    /// Violation timestamps (epoch ms) per user, insertion-ordered.
    records: RwLock<HashMap<String, Vec<i64>>>,
}

impl ViolationTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Records a violation for `user_id` now and returns the stage reached.
    pub fn record(&self, user_id: &str) -> EnforcementLevel {
        self.record_at(user_id, Utc::now().timestamp_millis())
    }

    /// Clock-explicit variant of [`record`](Self::record).
    pub fn record_at(&self, user_id: &str, now_ms: i64) -> EnforcementLevel {
        let mut records = self.records.write().unwrap();
        let timestamps = records.entry(user_id.to_string()).or_default();
        timestamps.push(now_ms);

        let total = timestamps.len();
        let level = Self::level_for(total);
        match level {
            EnforcementLevel::Restricted => {
                tracing::warn!(user_id, total, "account restricted for contact sharing");
            }
            EnforcementLevel::Flagged => {
                tracing::warn!(user_id, total, "account flagged for contact sharing");
            }
            EnforcementLevel::Warned => {
                tracing::info!(user_id, total, "contact sharing violation recorded");
            }
        }
        level
    }

    /// Summarizes `user_id`'s history as of now.
    pub fn summary(&self, user_id: &str) -> ViolationSummary {
        self.summary_at(user_id, Utc::now().timestamp_millis())
    }

    /// Clock-explicit variant of [`summary`](Self::summary).
    pub fn summary_at(&self, user_id: &str, now_ms: i64) -> ViolationSummary {
        let records = self.records.read().unwrap();
        let timestamps = records.get(user_id).map(Vec::as_slice).unwrap_or(&[]);
        let total = timestamps.len();
        let recent = timestamps
            .iter()
            .filter(|&&t| now_ms - t < RECENT_WINDOW_MS)
            .count();
        ViolationSummary {
            user_id: user_id.to_string(),
            total,
            recent,
            is_restricted: total >= RESTRICT_THRESHOLD,
        }
    }

    /// Whether `user_id` has crossed the restriction threshold.
    pub fn is_restricted(&self, user_id: &str) -> bool {
        let records = self.records.read().unwrap();
        records
            .get(user_id)
            .is_some_and(|t| t.len() >= RESTRICT_THRESHOLD)
    }

    fn level_for(total: usize) -> EnforcementLevel {
        if total >= RESTRICT_THRESHOLD {
            EnforcementLevel::Restricted
        } else if total >= FLAG_THRESHOLD {
            EnforcementLevel::Flagged
        } else {
            EnforcementLevel::Warned
        }
    }
}

impl Default for ViolationTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Decision for one outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateVerdict {
    /// Send the message.
    Allowed,
    /// Too many messages; ask the sender to slow down.
    RateLimited,
    /// Contact information detected; reject the send.
    Blocked {
        detection: PiiDetection,
        /// Escalating user-facing warning.
        warning: String,
        /// True once the sender crossed the restriction threshold.
        restricted: bool,
    },
}

/// Gate applied to every outgoing chat message.
///
/// Order matters: rate limiting runs before detection, so a flooding
/// client cannot farm detector responses, and only genuinely inspected
/// messages can record violations.
pub struct ChatGate {
    detector: PiiDetector,
    limiter: RateLimiter,
    tracker: ViolationTracker,
}

impl ChatGate {
    /// Creates a gate with the default detector and limiter settings.
    pub fn new() -> Self {
        Self::with_components(PiiDetector::new(), RateLimiter::with_defaults())
    }

    /// Creates a gate from customized components.
    pub fn with_components(detector: PiiDetector, limiter: RateLimiter) -> Self {
        Self {
            detector,
            limiter,
            tracker: ViolationTracker::new(),
        }
    }

    /// Decides whether `user_id` may send `message` now.
    pub fn submit(&self, user_id: &str, message: &str) -> GateVerdict {
        self.submit_at(user_id, message, Utc::now().timestamp_millis())
    }

    /// Clock-explicit variant of [`submit`](Self::submit).
    pub fn submit_at(&self, user_id: &str, message: &str, now_ms: i64) -> GateVerdict {
        if !self.limiter.check_at(user_id, now_ms) {
            tracing::info!(user_id, "send rejected: rate limited");
            return GateVerdict::RateLimited;
        }

        let detection = self.detector.inspect(message);
        if detection.is_blocked {
            let level = self.tracker.record_at(user_id, now_ms);
            tracing::warn!(
                user_id,
                kind = ?detection.kind,
                pattern = detection.pattern.as_deref(),
                "send rejected: contact information detected"
            );
            return GateVerdict::Blocked {
                detection,
                warning: level.warning_text().to_string(),
                restricted: level == EnforcementLevel::Restricted,
            };
        }

        GateVerdict::Allowed
    }

    /// The gate's violation tracker, for dashboards.
    pub fn tracker(&self) -> &ViolationTracker {
        &self.tracker
    }
}

impl Default for ChatGate {
    fn default() -> Self {
        Self::new()
    }
}
