//! PII and contact-information detection for chat messages.
//!
//! Detects attempts to move a conversation off-platform: phone numbers
//! (including disguised and word-spelled ones), email addresses, external
//! URLs and social handles. A positive detection is a hard block; the
//! calling send pipeline rejects the message and shows the localized
//! explanation from [`blocked_message`].

mod detector;
mod phone;

pub use detector::{PiiDetection, PiiDetector, PiiType};
pub use phone::{PhoneDetection, PhoneDetector};

use crate::language::Language;

/// User-facing explanation shown when a message is blocked.
///
/// Fixed text per language; [`Language::Mixed`] falls back to English.
pub fn blocked_message(language: Language) -> &'static str {
    match language {
        Language::Id => {
            "Berbagi nomor telepon, WhatsApp, atau kontak lain tidak diperbolehkan. \
             Silakan berkomunikasi melalui chat di aplikasi."
        }
        _ => {
            "Sharing phone numbers, WhatsApp, or other contact details is not allowed. \
             Please keep all communication inside the app chat."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocked_message_is_localized() {
        assert!(blocked_message(Language::En).contains("not allowed"));
        assert!(blocked_message(Language::Id).contains("tidak diperbolehkan"));
    }

    #[test]
    fn blocked_message_mixed_falls_back_to_english() {
        assert_eq!(blocked_message(Language::Mixed), blocked_message(Language::En));
    }
}
