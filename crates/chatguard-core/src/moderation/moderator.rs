//! Score-based content moderation.
//!
//! Five independent checks run over every message with no short-circuit
//! between them. Contributions are fixed per trigger: +30 per matched
//! profanity word, +25 for spam (once), +20 per matched PII pattern, +15
//! for caps, +10 for punctuation. The score is monotone in the number of
//! triggered categories and is uncapped, so it can exceed 100.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;

const PROFANITY_SCORE: u32 = 30;
const SPAM_SCORE: u32 = 25;
const PII_SCORE: u32 = 20;
const CAPS_SCORE: u32 = 15;
const PUNCTUATION_SCORE: u32 = 10;

/// Uppercase ratio above which a message counts as shouting.
const CAPS_RATIO_THRESHOLD: f64 = 0.6;
/// Messages at or below this length are exempt from the caps check.
const CAPS_MIN_LENGTH: usize = 10;
/// Identical characters repeated this many times count as spam.
const REPEAT_RUN_LENGTH: usize = 5;

/// English and Indonesian profanity, matched as whole words.
const PROFANITY_WORDS: &[&str] = &[
    "anjing", "babi", "bangsat", "kontol", "memek", "ngentot", "jancok", "fuck", "shit", "dick",
    "bitch", "bastard", "asshole",
];

/// Spam phrasing and shapes.
const SPAM_PATTERNS: &[&str] = &[
    r"(?i)\b(?:buy|purchase|sale|discount|offer|deal)\s+(?:now|here|today)\b",
    r"(?i)\b(?:click|visit|check)\s+(?:here|this|link|website|my\s+website)\b",
    r"(?i)\b(?:earn|make)\s+(?:money|cash|\$)",
    r"(?i)(?:https?://|www\.)\S+",
    r"\d{10,}",
];

/// Narrow embedded-PII shapes, masked in the sanitized copy.
const PII_PATTERNS: &[&str] = &[
    r"\b(?:\d{4}[-\s]){3}\d{4}\b",
    r"\b\d{3}-\d{2}-\d{4}\b",
    r"\b\d{16}\b",
    r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
];

/// Ordinal risk classification derived from the cumulative score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Score below 25.
    Low,
    /// Score 25-49.
    Medium,
    /// Score 50-69.
    High,
    /// Score 70 and above.
    Critical,
}

impl RiskLevel {
    /// Derives the risk level from a cumulative score.
    pub fn from_score(score: u32) -> Self {
        match score {
            70.. => RiskLevel::Critical,
            50..=69 => RiskLevel::High,
            25..=49 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    /// Returns a human-readable name for this level.
    pub fn name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

/// Result of moderating a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationResult {
    /// True when the cumulative score stays below the medium threshold.
    pub is_clean: bool,
    /// Cumulative score; uncapped, can exceed 100.
    pub score: u32,
    /// Violations in fixed check order: profanity, spam, PII, caps, punctuation.
    pub violations: Vec<String>,
    /// The message with profanity masked `***` and PII masked `[REDACTED]`.
    pub sanitized_content: String,
    pub has_profanity: bool,
    pub has_spam: bool,
    pub has_pii: bool,
    /// Risk classification derived from the score.
    pub risk_level: RiskLevel,
}

/// Caller-supplied pattern tables, swappable per locale or tenant.
pub struct ModerationTables<'a> {
    /// Whole words, matched case-insensitively.
    pub profanity: &'a [&'a str],
    /// Regular expressions.
    pub spam: &'a [&'a str],
    /// Regular expressions; matches are masked in the sanitized copy.
    pub pii: &'a [&'a str],
}

impl Default for ModerationTables<'_> {
    fn default() -> Self {
        Self {
            profanity: PROFANITY_WORDS,
            spam: SPAM_PATTERNS,
            pii: PII_PATTERNS,
        }
    }
}

/// Scores messages for profanity, spam, embedded PII, caps, and punctuation.
#[derive(Debug)]
pub struct ContentModerator {
    profanity: Vec<Regex>,
    spam: Vec<Regex>,
    pii: Vec<Regex>,
    punctuation: Regex,
}

impl ContentModerator {
    /// Creates a moderator with the built-in tables.
    pub fn new() -> Self {
        Self::with_tables(ModerationTables::default()).expect("built-in moderation tables are valid")
    }

    /// Creates a moderator with caller-supplied tables.
    pub fn with_tables(tables: ModerationTables<'_>) -> Result<Self, FilterError> {
        if tables.profanity.is_empty() {
            return Err(FilterError::EmptyTable("profanity words"));
        }
        let profanity = tables
            .profanity
            .iter()
            .map(|word| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word))))
            .collect::<Result<Vec<_>, _>>()?;
        let spam = tables
            .spam
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let pii = tables
            .pii
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            profanity,
            spam,
            pii,
            punctuation: Regex::new(r"[!?]{3,}")?,
        })
    }

    /// Moderates `content`, returning the score, violations, and masked copy.
    ///
    /// All five checks always run; a category contributes its fixed score at
    /// most once. Pure; never fails.
    pub fn moderate(&self, content: &str) -> ModerationResult {
        let mut score = 0;
        let mut violations = Vec::new();
        let mut sanitized = content.to_string();

        // 1. Profanity: every occurrence of every listed word is masked.
        // Each distinct word contributes its own violation and score.
        let mut has_profanity = false;
        for word in &self.profanity {
            if word.is_match(&sanitized) {
                has_profanity = true;
                violations.push("Inappropriate language detected".to_string());
                score += PROFANITY_SCORE;
                sanitized = word.replace_all(&sanitized, "***").into_owned();
            }
        }

        // 2. Spam: flagged but never rewritten.
        let has_spam = self.spam.iter().any(|p| p.is_match(content))
            || has_repeated_run(content, REPEAT_RUN_LENGTH);
        if has_spam {
            violations.push("Spam pattern detected".to_string());
            score += SPAM_SCORE;
        }

        // 3. Embedded PII: masked in the sanitized copy, scored per pattern.
        let mut has_pii = false;
        for pattern in &self.pii {
            if pattern.is_match(&sanitized) {
                has_pii = true;
                violations.push("Personal information detected".to_string());
                score += PII_SCORE;
                sanitized = pattern.replace_all(&sanitized, "[REDACTED]").into_owned();
            }
        }

        // 4. Excessive capitalization.
        let total_chars = content.chars().count();
        if total_chars > CAPS_MIN_LENGTH {
            let uppercase = content.chars().filter(|c| c.is_uppercase()).count();
            if uppercase as f64 / total_chars as f64 > CAPS_RATIO_THRESHOLD {
                violations.push("Excessive capitalization".to_string());
                score += CAPS_SCORE;
            }
        }

        // 5. Excessive punctuation: counted once regardless of run count.
        if self.punctuation.is_match(content) {
            violations.push("Excessive punctuation".to_string());
            score += PUNCTUATION_SCORE;
        }

        ModerationResult {
            is_clean: score < 25,
            score,
            violations,
            sanitized_content: sanitized,
            has_profanity,
            has_spam,
            has_pii,
            risk_level: RiskLevel::from_score(score),
        }
    }
}

impl Default for ContentModerator {
    fn default() -> Self {
        Self::new()
    }
}

/// True when `content` contains `len` or more identical consecutive chars.
///
/// The regex engine has no backreferences, so this is a run-length scan.
fn has_repeated_run(content: &str, len: usize) -> bool {
    let mut run = 0;
    let mut prev = None;
    for c in content.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            run = 1;
            prev = Some(c);
        }
        if run >= len {
            return true;
        }
    }
    false
}
