//! Language detection for chat messages.
//!
//! A message's language picks the localized explanation shown when a send
//! is blocked. Detection is a stop-word count, not a real language model:
//! whichever of the Indonesian or English lists appears more often wins.

use serde::{Deserialize, Serialize};

/// The language a message appears to be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Indonesian.
    Id,
    /// English.
    En,
    /// Tie between the two (including no stop words at all).
    Mixed,
}

impl Language {
    /// Returns a human-readable name for this language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Id => "Indonesian",
            Language::En => "English",
            Language::Mixed => "Mixed",
        }
    }
}

/// Common Indonesian stop words.
const INDONESIAN_STOP_WORDS: &[&str] = &[
    "yang", "dan", "di", "ke", "dari", "untuk", "dengan", "saya", "kamu", "ini", "itu", "tidak",
    "ada", "bisa", "sudah", "akan", "mau", "juga", "apa", "terima kasih",
];

/// Common English stop words.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "the", "and", "you", "for", "with", "this", "that", "have", "are", "was", "not", "can",
    "will", "what", "your", "from", "thank", "please", "here", "there",
];

/// Guesses the language of `content` by counting stop-word occurrences.
///
/// Matching is case-insensitive substring containment, so word order does
/// not matter. A tie (including when neither list matches) is [`Language::Mixed`].
pub fn detect_language(content: &str) -> Language {
    let lower = content.to_lowercase();

    let id_count = INDONESIAN_STOP_WORDS
        .iter()
        .filter(|w| lower.contains(*w))
        .count();
    let en_count = ENGLISH_STOP_WORDS
        .iter()
        .filter(|w| lower.contains(*w))
        .count();

    match id_count.cmp(&en_count) {
        std::cmp::Ordering::Greater => Language::Id,
        std::cmp::Ordering::Less => Language::En,
        std::cmp::Ordering::Equal => Language::Mixed,
    }
}
