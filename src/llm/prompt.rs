//! Prompt templates for the pipeline stages using Handlebars. Strict
//! mode is on so a template referencing a missing field fails loudly
//! at render time instead of silently producing a broken prompt.

use std::fmt;

use handlebars::{Handlebars, handlebars_helper};

// Natural number sequences when rendering transcripts with `each` and
// `@index` (instead of starting at 0).
handlebars_helper!(inc: |v: i64| format!("{}", v + 1));

#[derive(Debug)]
pub enum Prompt {
    ThreadCompression,
    Classification,
    ReplyGeneration,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const THREAD_COMPRESSION_PROMPT: &str = r#"Analyze this email thread and extract structured information.

THREAD CONTENT:
{{#each emails}}
--- Email {{inc @index}} ---
From: {{sender}}
Subject: {{subject}}
Date: {{timestamp}}
Body: {{body}}

{{/each}}
Respond in this exact JSON format:
{
    "summary": "2-3 sentence overview of the entire conversation",
    "key_points": ["point 1", "point 2", "point 3"],
    "decisions": ["decision 1", "decision 2"],
    "action_items": [
        {"action": "what needs to be done", "owner": "who should do it", "deadline": "when or null"}
    ],
    "sentiment": "positive|negative|neutral",
    "urgency_score": 0.0-1.0
}"#;

const CLASSIFICATION_PROMPT: &str = r#"Classify this email into categories and determine priority.

EMAIL:
Subject: {{subject}}
From: {{sender}}
Body: {{body}}

Categories: Work, Personal, Finance, Promotions, Support, Urgent, Meeting, Follow-up, Other

Respond in this exact JSON format:
{
    "primary_category": "category name",
    "secondary_categories": ["category1", "category2"],
    "priority": "critical|high|medium|low",
    "priority_score": 0.0-1.0,
    "confidence": 0.0-1.0,
    "reasoning": "brief explanation"
}"#;

const REPLY_GENERATION_PROMPT: &str = r#"Draft a reply to this email based on context.

ORIGINAL EMAIL:
Subject: {{subject}}
From: {{sender}}
Body: {{body}}

THREAD CONTEXT:
Summary: {{context.summary}}
Key Points: {{#each context.key_points}}{{this}}; {{/each}}
Decisions: {{#each context.decisions}}{{this}}; {{/each}}
Action Items: {{#each context.action_items}}{{action}}; {{/each}}
Sentiment: {{context.sentiment}}

CLASSIFICATION:
Category: {{category}}
Priority: {{priority}}

TONE: {{tone_description}}

Write a reply that:
1. Acknowledges the email appropriately
2. Addresses key points and open action items
3. Matches the requested tone
4. Is concise but complete
5. Includes clear next steps if needed

Respond in this exact JSON format:
{
    "content": "the reply text",
    "tone": "professional|friendly|concise",
    "estimated_response_time": "how long to respond",
    "required_actions": ["action1", "action2"],
    "suggested_attachments": ["attachment1", "attachment2"]
}"#;

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_helper("inc", Box::new(inc));
    registry
        .register_template_string(&Prompt::ThreadCompression.to_string(), THREAD_COMPRESSION_PROMPT)
        .expect("Failed to register template");
    registry
        .register_template_string(&Prompt::Classification.to_string(), CLASSIFICATION_PROMPT)
        .expect("Failed to register template");
    registry
        .register_template_string(&Prompt::ReplyGeneration.to_string(), REPLY_GENERATION_PROMPT)
        .expect("Failed to register template");
    registry
}
