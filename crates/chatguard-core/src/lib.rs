//! Chatguard Core - Contact-information detection and moderation for marketplace chat.
//!
//! This crate keeps all negotiation inside the platform's own messaging
//! surface. It provides:
//!
//! - PII detection: disguised phone numbers, emails, external contact
//!   channels (hard block before send), Indonesian + English aware
//! - Content moderation: a non-blocking risk score with a masked copy of
//!   the message, for moderation dashboards and soft warnings
//! - Sliding-window rate limiting for message sends
//! - Violation tracking with escalating enforcement
//!
//! All operations are synchronous and perform no I/O.

pub mod enforcement;
mod error;
pub mod language;
pub mod moderation;
pub mod pii;
pub mod rate_limit;

pub use enforcement::{ChatGate, EnforcementLevel, GateVerdict, ViolationSummary, ViolationTracker};
pub use error::FilterError;
pub use language::{detect_language, Language};
pub use moderation::{
    ContentModerator, DisplaySanitizer, ModerationResult, ModerationTables, RiskLevel,
};
pub use pii::{blocked_message, PhoneDetection, PhoneDetector, PiiDetection, PiiDetector, PiiType};
pub use rate_limit::{RateLimitConfig, RateLimiter};
