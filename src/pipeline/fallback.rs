//! Deterministic fallbacks for every pipeline stage. Each stage calls
//! into this module when its model call fails, so a degraded result is
//! always well-formed and never surfaces the upstream error.

use regex::Regex;

use crate::pipeline::classify::Classification;
use crate::pipeline::context::{CompressedContext, Sentiment};
use crate::pipeline::reply::{Reply, Tone};
use crate::store::{Category, Email, Priority, Thread};

/// Reasoning string attached to fallback classifications.
pub const FALLBACK_REASONING: &str =
    "Classified without model assistance; review manually if priority matters.";

/// Estimated response time attached to canned replies.
pub const FALLBACK_RESPONSE_TIME: &str = "within 1 business day";

/// How much of the first message survives into a degraded summary.
const SUMMARY_PREVIEW_CHARS: usize = 200;

/// Best-effort context when the compression call fails: the start of
/// the conversation and neutral, middle-of-the-road scores.
pub fn degraded_context(thread: &Thread) -> CompressedContext {
    let summary = thread
        .emails
        .first()
        .map(|e| e.body.chars().take(SUMMARY_PREVIEW_CHARS).collect())
        .unwrap_or_default();

    CompressedContext {
        summary,
        key_points: Vec::new(),
        decisions: Vec::new(),
        action_items: Vec::new(),
        sentiment: Sentiment::Neutral,
        urgency_score: 0.5,
    }
}

/// Keyword patterns for guessing secondary categories without the
/// model. Primary stays `Other`; these only enrich the result.
fn category_patterns() -> Vec<(Category, Regex)> {
    [
        (
            Category::Meeting,
            r"\b(meeting|calendar|schedule|zoom|teams|call)\b",
        ),
        (
            Category::Finance,
            r"\b(invoice|payment|bill|receipt|transaction|budget|expense)\b",
        ),
        (
            Category::Promotions,
            r"\b(offer|discount|sale|deal|promo|coupon)\b",
        ),
        (
            Category::Support,
            r"\b(support|help|ticket|issue|problem|bug|error)\b",
        ),
    ]
    .into_iter()
    .map(|(category, pattern)| {
        (
            category,
            Regex::new(pattern).expect("category pattern is valid"),
        )
    })
    .collect()
}

/// Base classification when the model is unavailable. The classifier
/// applies its heuristic urgency scoring on top of this, same as it
/// does for model results.
pub fn fallback_classification(email: &Email) -> Classification {
    let text = format!("{} {}", email.subject, email.body).to_lowercase();
    let secondary_categories: Vec<Category> = category_patterns()
        .into_iter()
        .filter(|(_, pattern)| pattern.is_match(&text))
        .map(|(category, _)| category)
        .collect();

    Classification {
        primary_category: Category::Other,
        secondary_categories,
        priority: Priority::Medium,
        priority_score: Priority::Medium.base_score(),
        confidence: 0.5,
        reasoning: FALLBACK_REASONING.to_string(),
    }
}

/// Canned reply for when the generation call fails, keyed by the
/// email's primary category and the requested tone.
pub fn canned_reply(category: Category, tone: Tone) -> Reply {
    let content = match (category, tone) {
        (Category::Meeting, Tone::Professional) => {
            "Thank you for the meeting details. I will review my calendar and confirm my availability shortly."
        }
        (Category::Meeting, Tone::Friendly) => {
            "Thanks for setting this up! Let me check my calendar and I'll confirm a time that works."
        }
        (Category::Meeting, Tone::Concise) => "Received. Will confirm availability shortly.",
        (Category::Finance, Tone::Professional) => {
            "Thank you for the notice. I will review the invoice and arrange payment before the due date."
        }
        (Category::Finance, Tone::Friendly) => {
            "Thanks for the heads up on the payment! I'll take a look at the invoice and get it sorted."
        }
        (Category::Finance, Tone::Concise) => "Noted. Invoice payment will be processed.",
        (Category::Urgent, Tone::Professional) => {
            "Thank you for flagging this. I am treating it as a top priority and will follow up as soon as possible."
        }
        (Category::Urgent, Tone::Friendly) => {
            "Got it, thanks for the urgent flag! I'm on it and will update you as soon as I can."
        }
        (Category::Urgent, Tone::Concise) => "Acknowledged. Prioritizing now.",
        (Category::Personal, Tone::Professional) => {
            "Thank you for your message. I will get back to you soon."
        }
        (Category::Personal, Tone::Friendly) => {
            "Hey, thanks for reaching out! I'll get back to you soon."
        }
        (Category::Personal, Tone::Concise) => "Thanks! Will reply soon.",
        (_, Tone::Professional) => {
            "Thank you for your email. I will review it and respond shortly."
        }
        (_, Tone::Friendly) => "Thanks for your email! I'll take a look and get back to you.",
        (_, Tone::Concise) => "Received. Will respond shortly.",
    };

    Reply {
        content: content.to_string(),
        tone,
        estimated_response_time: FALLBACK_RESPONSE_TIME.to_string(),
        required_actions: Vec::new(),
        suggested_attachments: Vec::new(),
    }
}
