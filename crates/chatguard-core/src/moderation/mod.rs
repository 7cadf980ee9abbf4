//! Content moderation for chat messages.
//!
//! Unlike the hard-blocking PII detector, this module produces a soft
//! signal: a cumulative risk score, a violation list, and a masked copy of
//! the message. Moderation dashboards sort and flag messages by it; it
//! never rejects a send on its own.

mod moderator;
mod sanitizer;

pub use moderator::{ContentModerator, ModerationResult, ModerationTables, RiskLevel};
pub use sanitizer::DisplaySanitizer;
