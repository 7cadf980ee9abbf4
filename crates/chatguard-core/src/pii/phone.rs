//! Phone-number detection, Indonesian-aware.
//!
//! Catches the ways users disguise a number in chat:
//!
//! - Contact keywords ("whatsapp", "wa", "hubungi saya", "call", ...)
//! - Digit patterns (`+62 8xx`, local `08xx`, grouped `ddd-ddd-dddd`)
//! - Keyword-plus-digits and leetspeak mixes ("nol 812...")
//! - Fully word-spelled numbers ("kosong? no - zero eight one two ...")
//! - Digit runs hidden by arbitrary whitespace ("0 8 1 2 3 4 5 6")
//!
//! Checks run in that order; the first matching rule wins.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Reason attached to contact-keyword blocks.
const CONTACT_KEYWORD_REASON: &str = "Sharing WhatsApp/contact details is not allowed.";

/// Number words mapped to digits, English and Indonesian.
const NUMBER_WORDS: &[(&str, char)] = &[
    ("zero", '0'),
    ("one", '1'),
    ("two", '2'),
    ("three", '3'),
    ("four", '4'),
    ("five", '5'),
    ("six", '6'),
    ("seven", '7'),
    ("eight", '8'),
    ("nine", '9'),
    ("nol", '0'),
    ("satu", '1'),
    ("dua", '2'),
    ("tiga", '3'),
    ("empat", '4'),
    ("lima", '5'),
    ("enam", '6'),
    ("tujuh", '7'),
    ("delapan", '8'),
    ("sembilan", '9'),
];

/// A qualifying digit string is this long after stripping separators.
const MIN_PHONE_DIGITS: usize = 8;
const MAX_PHONE_DIGITS: usize = 15;

/// Digits required near a contact keyword for the mixed-disguise rule.
const MIXED_RULE_MIN_DIGITS: usize = 4;

/// Result of checking a message for a phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneDetection {
    /// Whether the message must be rejected.
    pub is_blocked: bool,
    /// User-facing reason, present when blocked.
    pub reason: Option<String>,
    /// Short label for the rule that matched.
    pub pattern: Option<String>,
}

impl PhoneDetection {
    /// Creates a not-blocked result.
    pub fn clean() -> Self {
        Self {
            is_blocked: false,
            reason: None,
            pattern: None,
        }
    }

    /// Creates a blocked result with the given reason and rule label.
    pub fn blocked(reason: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            is_blocked: true,
            reason: Some(reason.into()),
            pattern: Some(pattern.into()),
        }
    }
}

/// Detects phone numbers and contact solicitation in a single message.
#[derive(Debug)]
pub struct PhoneDetector {
    /// Hard-block contact keywords (rule 1).
    contact_keywords: Regex,
    /// Candidate digit runs with separators (rule 2).
    digit_candidates: Regex,
    /// Weaker keywords that only block alongside digits (rule 3a).
    mixed_keywords: Regex,
    /// Leetspeak zero before an 8-prefixed run (rule 3b).
    leet_prefix: Regex,
    /// Digit runs scanned after whitespace stripping (rule 5).
    digit_runs: Regex,
}

impl PhoneDetector {
    /// Creates a detector with the built-in keyword table.
    pub fn new() -> Self {
        Self::build(
            r"(?i)(?:\b(?:whatsapp|whatapp|whatsap|wa|kontak|telepon|sms|call)\b|\bw\.a\.?|\bcontact\s+me\b|\bhubungi\s+saya\b)",
        )
        .expect("built-in phone patterns are valid")
    }

    /// Creates a detector with a caller-supplied contact-keyword table.
    ///
    /// Each entry is matched case-insensitively as a whole word. Use this to
    /// swap the table per locale or tenant.
    pub fn with_contact_keywords(keywords: &[&str]) -> Result<Self, FilterError> {
        if keywords.is_empty() {
            return Err(FilterError::EmptyTable("contact keywords"));
        }
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        Self::build(&format!(r"(?i)\b(?:{})\b", alternation))
    }

    fn build(contact_pattern: &str) -> Result<Self, FilterError> {
        Ok(Self {
            contact_keywords: Regex::new(contact_pattern)?,
            digit_candidates: Regex::new(r"\+?\d[\d\s().-]{6,}\d")?,
            mixed_keywords: Regex::new(r"(?i)\b(?:number|nomor|nomer|hp|telp|phone)\b")?,
            leet_prefix: Regex::new(r"(?i)\b(?:zero|nol|o|oh)[\s.,-]*8\d{2,}")?,
            digit_runs: Regex::new(r"\d{8,}")?,
        })
    }

    /// Checks `message` for phone numbers or contact solicitation.
    ///
    /// Pure; never fails. Empty input is never blocked.
    pub fn detect(&self, message: &str) -> PhoneDetection {
        if message.trim().is_empty() {
            return PhoneDetection::clean();
        }

        // Rule 1: contact keywords block on their own.
        if self.contact_keywords.is_match(message) {
            return PhoneDetection::blocked(CONTACT_KEYWORD_REASON, "contact_keyword");
        }

        // Rule 2: digit patterns with optional separators.
        for candidate in self.digit_candidates.find_iter(message) {
            if Self::qualifies_as_phone(candidate.as_str()) {
                return PhoneDetection::blocked("Phone number detected.", "phone_digits");
            }
        }

        // Rule 3: mixed disguises.
        let digit_count = message.chars().filter(|c| c.is_ascii_digit()).count();
        if digit_count >= MIXED_RULE_MIN_DIGITS && self.mixed_keywords.is_match(message) {
            return PhoneDetection::blocked(
                "Contact solicitation with digits detected.",
                "keyword_with_digits",
            );
        }
        if self.leet_prefix.is_match(message) {
            return PhoneDetection::blocked("Disguised phone number detected.", "leetspeak_prefix");
        }

        // Rule 4: fully word-spelled digits.
        if Self::longest_spelled_run(message) >= MIN_PHONE_DIGITS {
            return PhoneDetection::blocked(
                "Word-spelled phone number detected.",
                "word_spelled_digits",
            );
        }

        // Rule 5: digits hidden by arbitrary whitespace.
        let stripped: String = message.chars().filter(|c| !c.is_whitespace()).collect();
        for run in self.digit_runs.find_iter(&stripped) {
            if Self::has_phone_prefix(run.as_str()) {
                return PhoneDetection::blocked(
                    "Phone number hidden with spacing detected.",
                    "hidden_digits",
                );
            }
        }

        PhoneDetection::clean()
    }

    /// A candidate qualifies when its digits are 8-15 long and carry an
    /// Indonesian prefix (`0`, `62`, or bare `8`).
    fn qualifies_as_phone(candidate: &str) -> bool {
        let digits: String = candidate.chars().filter(|c| c.is_ascii_digit()).collect();
        (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len())
            && Self::has_phone_prefix(&digits)
    }

    fn has_phone_prefix(digits: &str) -> bool {
        digits.starts_with('0') || digits.starts_with("62") || digits.starts_with('8')
    }

    /// Longest run of consecutive whitespace tokens that spell digits.
    fn longest_spelled_run(message: &str) -> usize {
        let mut longest = 0;
        let mut current = 0;
        for token in message.split_whitespace() {
            let word = token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if NUMBER_WORDS.iter().any(|(w, _)| *w == word) {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }
        longest
    }
}

impl Default for PhoneDetector {
    fn default() -> Self {
        Self::new()
    }
}
