//! Chatguard - checks chat messages for contact sharing and risky content.
//!
//! Reads a message from the command line (or lines from stdin) and prints
//! the detection verdict, optionally with the soft moderation score. Used
//! for spot checks and for piping exported chat logs through the filter.

use std::io::{self, BufRead};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatguard_core::{blocked_message, ContentModerator, Language, PiiDetector};

/// Chatguard - contact-information and moderation filter for marketplace chat
#[derive(Parser, Debug)]
#[command(name = "chatguard", version, about)]
struct Args {
    /// Message to check; reads lines from stdin when omitted
    message: Option<String>,

    /// Emit JSON instead of human-readable output
    #[arg(long)]
    json: bool,

    /// Also run the soft moderation scoring
    #[arg(long)]
    moderate: bool,

    /// Language for the blocked-message explanation (en or id)
    #[arg(long, default_value = "en")]
    language: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(args: &Args) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chatguard={}", args.log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn check_message(
    detector: &PiiDetector,
    moderator: &ContentModerator,
    args: &Args,
    language: Language,
    message: &str,
) -> bool {
    let detection = detector.inspect(message);
    let moderation = args.moderate.then(|| moderator.moderate(message));

    if args.json {
        let mut output = serde_json::json!({ "detection": detection });
        if let Some(moderation) = &moderation {
            output["moderation"] = serde_json::json!(moderation);
        }
        println!("{output}");
    } else if detection.is_blocked {
        println!(
            "BLOCKED [{}] {}",
            detection.kind.map(|k| k.name()).unwrap_or("?"),
            detection.reason.as_deref().unwrap_or_default(),
        );
        println!("  {}", blocked_message(language));
        if let Some(excerpt) = &detection.excerpt {
            println!("  matched: {excerpt}");
        }
    } else {
        println!("OK");
    }

    if let (false, Some(moderation)) = (args.json, &moderation) {
        println!(
            "  score: {} ({}), violations: {:?}",
            moderation.score,
            moderation.risk_level.name(),
            moderation.violations,
        );
        if moderation.sanitized_content != message {
            println!("  sanitized: {}", moderation.sanitized_content);
        }
    }

    detection.is_blocked
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(&args);

    let language = match args.language.as_str() {
        "id" => Language::Id,
        _ => Language::En,
    };
    let detector = PiiDetector::new();
    let moderator = ContentModerator::new();

    let mut any_blocked = false;
    match &args.message {
        Some(message) => {
            any_blocked = check_message(&detector, &moderator, &args, language, message);
        }
        None => {
            tracing::debug!("no message argument, reading stdin");
            for line in io::stdin().lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                any_blocked |= check_message(&detector, &moderator, &args, language, &line);
            }
        }
    }

    // Non-zero exit when anything was blocked, for scripting
    Ok(if any_blocked {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
