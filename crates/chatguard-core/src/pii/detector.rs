//! Full PII inspection: phone numbers, emails, URLs, and social handles.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::phone::PhoneDetector;

/// Messages shorter than this that mention a contact keyword are assumed to
/// be contact-sharing attempts rather than incidental mentions in prose.
/// Tunable heuristic, not a derived invariant.
const SHORT_MESSAGE_MAX_CHARS: usize = 30;

/// The kind of contact information that was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiType {
    /// A phone number or contact solicitation.
    Phone,
    /// An email address.
    Email,
    /// An external URL, short link, or social handle.
    Url,
}

impl PiiType {
    /// Returns a human-readable name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            PiiType::Phone => "Phone",
            PiiType::Email => "Email",
            PiiType::Url => "URL",
        }
    }
}

/// Result of inspecting a message for contact information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiDetection {
    /// Whether the message must be rejected before sending.
    pub is_blocked: bool,
    /// What kind of contact information matched.
    pub kind: Option<PiiType>,
    /// User-facing reason, present when blocked.
    pub reason: Option<String>,
    /// Short label for the rule that matched.
    pub pattern: Option<String>,
    /// The substring that triggered the match.
    pub excerpt: Option<String>,
}

impl PiiDetection {
    /// Creates a not-blocked result.
    pub fn clean() -> Self {
        Self {
            is_blocked: false,
            kind: None,
            reason: None,
            pattern: None,
            excerpt: None,
        }
    }

    /// Creates a blocked result.
    pub fn blocked(
        kind: PiiType,
        reason: impl Into<String>,
        pattern: impl Into<String>,
        excerpt: impl Into<String>,
    ) -> Self {
        Self {
            is_blocked: true,
            kind: Some(kind),
            reason: Some(reason.into()),
            pattern: Some(pattern.into()),
            excerpt: Some(excerpt.into()),
        }
    }
}

/// Inspects messages for any disallowed contact information.
///
/// Checks run in a fixed order and the first match wins: phone detection,
/// then emails, URLs, `@platform` handles, and finally bare contact
/// keywords in short messages. Longer free text mentioning "admin" in
/// passing is not blocked unless a stronger rule also matches.
pub struct PiiDetector {
    phone: PhoneDetector,
    email: Regex,
    url: Regex,
    handle: Regex,
    short_keywords: Regex,
}

impl PiiDetector {
    /// Creates a detector with the built-in pattern tables.
    pub fn new() -> Self {
        Self::with_phone_detector(PhoneDetector::new())
    }

    /// Creates a detector around a customized [`PhoneDetector`].
    pub fn with_phone_detector(phone: PhoneDetector) -> Self {
        Self {
            phone,
            email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
                .expect("built-in email pattern is valid"),
            url: Regex::new(r"(?i)(?:https?://\S+|www\.\S+|\b(?:wa\.me|t\.me|telegram\.me)/\S+)")
                .expect("built-in url pattern is valid"),
            handle: Regex::new(
                r"(?i)@(?:whatsapp|wa|telegram|line|instagram|tiktok|snapchat|contact|admin)\b",
            )
            .expect("built-in handle pattern is valid"),
            short_keywords: Regex::new(
                r"(?i)\b(?:whatsapp|wa|line|telegram|contact|admin|instagram|tiktok)\b",
            )
            .expect("built-in keyword pattern is valid"),
        }
    }

    /// Inspects `text` for contact information.
    ///
    /// Pure; never fails. Empty or whitespace-only input is never blocked.
    pub fn inspect(&self, text: &str) -> PiiDetection {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return PiiDetection::clean();
        }

        let phone = self.phone.detect(trimmed);
        if phone.is_blocked {
            return PiiDetection::blocked(
                PiiType::Phone,
                phone.reason.unwrap_or_default(),
                phone.pattern.unwrap_or_default(),
                trimmed,
            );
        }

        if let Some(m) = self.email.find(trimmed) {
            return PiiDetection::blocked(
                PiiType::Email,
                "Sharing email addresses is not allowed.",
                "email_address",
                m.as_str(),
            );
        }

        if let Some(m) = self.url.find(trimmed) {
            return PiiDetection::blocked(
                PiiType::Url,
                "Sharing external links is not allowed.",
                "external_url",
                m.as_str(),
            );
        }

        if let Some(m) = self.handle.find(trimmed) {
            return PiiDetection::blocked(
                PiiType::Url,
                "Sharing social media handles is not allowed.",
                "platform_handle",
                m.as_str(),
            );
        }

        // Short messages built around a contact keyword are treated as
        // contact-sharing attempts even without a number or link.
        if trimmed.chars().count() < SHORT_MESSAGE_MAX_CHARS {
            if let Some(m) = self.short_keywords.find(trimmed) {
                return PiiDetection::blocked(
                    PiiType::Url,
                    "Contact-sharing attempt detected.",
                    "short_contact_keyword",
                    m.as_str(),
                );
            }
        }

        PiiDetection::clean()
    }
}

impl Default for PiiDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> PiiDetector {
        PiiDetector::new()
    }

    // ==================== Phone Delegation Tests ====================

    #[test]
    fn phone_block_carries_full_excerpt() {
        let result = detector().inspect("  081234567890  ");
        assert!(result.is_blocked);
        assert_eq!(result.kind, Some(PiiType::Phone));
        assert_eq!(result.excerpt.as_deref(), Some("081234567890"));
    }

    #[test]
    fn phone_block_keeps_inner_reason() {
        let result = detector().inspect("hubungi saya besok");
        assert!(result.is_blocked);
        assert_eq!(result.kind, Some(PiiType::Phone));
        assert!(result.reason.unwrap().contains("not allowed"));
    }

    // ==================== Email Tests ====================

    #[test]
    fn blocks_email_address() {
        let result = detector().inspect("reach me at john.doe@example.com");
        assert!(result.is_blocked);
        assert_eq!(result.kind, Some(PiiType::Email));
        assert_eq!(result.excerpt.as_deref(), Some("john.doe@example.com"));
    }

    // ==================== URL Tests ====================

    #[test]
    fn blocks_www_url() {
        let result = detector().inspect("check this out www.example.com/promo");
        assert!(result.is_blocked);
        assert_eq!(result.kind, Some(PiiType::Url));
        assert_eq!(result.excerpt.as_deref(), Some("www.example.com/promo"));
    }

    #[test]
    fn blocks_http_url() {
        let result = detector().inspect("see https://example.com/deal for details");
        assert!(result.is_blocked);
        assert_eq!(result.kind, Some(PiiType::Url));
    }

    #[test]
    fn blocks_short_link_services() {
        let result = detector().inspect("my channel t.me/someone");
        assert!(result.is_blocked);
        assert_eq!(result.kind, Some(PiiType::Url));
        assert_eq!(result.excerpt.as_deref(), Some("t.me/someone"));
    }

    // ==================== Handle Tests ====================

    #[test]
    fn blocks_platform_handle() {
        let result = detector().inspect("my handle there is @telegram for real");
        assert!(result.is_blocked);
        assert_eq!(result.kind, Some(PiiType::Url));
        assert_eq!(result.pattern.as_deref(), Some("platform_handle"));
    }

    // ==================== Short Keyword Tests ====================

    #[test]
    fn blocks_short_message_with_keyword() {
        let result = detector().inspect("telegram ok?");
        assert!(result.is_blocked);
        assert_eq!(result.kind, Some(PiiType::Url));
        assert_eq!(result.pattern.as_deref(), Some("short_contact_keyword"));
    }

    #[test]
    fn long_prose_with_keyword_is_clean() {
        // 30 chars or more: an incidental mention is not a violation
        let result = detector().inspect("please ask the admin about my booking schedule");
        assert!(!result.is_blocked);
    }

    #[test]
    fn keyword_requires_word_boundary() {
        // "line" inside "online" must not match
        assert!(!detector().inspect("online booking works").is_blocked);
    }

    // ==================== Clean Input Tests ====================

    #[test]
    fn clean_ordinary_message() {
        let result = detector().inspect("see you at the spa tomorrow");
        assert!(!result.is_blocked);
        assert!(result.kind.is_none());
        assert!(result.excerpt.is_none());
    }

    #[test]
    fn empty_and_whitespace_are_clean() {
        assert!(!detector().inspect("").is_blocked);
        assert!(!detector().inspect(" \t\n ").is_blocked);
    }

    #[test]
    fn never_panics_on_arbitrary_input() {
        let inputs = [
            "𝕌𝕟𝕚𝕔𝕠𝕕𝕖 🦀",
            "a@b",
            "@@@@@",
            "....",
            "\u{202e}reversed",
        ];
        for input in inputs {
            let _ = detector().inspect(input);
        }
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn pii_type_serialization() {
        assert_eq!(serde_json::to_string(&PiiType::Phone).unwrap(), "\"phone\"");
        assert_eq!(serde_json::to_string(&PiiType::Email).unwrap(), "\"email\"");
        assert_eq!(serde_json::to_string(&PiiType::Url).unwrap(), "\"url\"");
    }

    #[test]
    fn detection_round_trips() {
        let detection = detector().inspect("reach me at john.doe@example.com");
        let json = serde_json::to_string(&detection).unwrap();
        let back: PiiDetection = serde_json::from_str(&json).unwrap();
        assert_eq!(detection, back);
    }
}
