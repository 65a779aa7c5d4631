use std::env;

/// Default urgency keywords scanned by the classifier's heuristic
/// pre-pass. Case-insensitive substring matches against the subject
/// and body.
pub const DEFAULT_URGENCY_KEYWORDS: &[&str] = &[
    "urgent",
    "asap",
    "immediately",
    "critical",
    "emergency",
    "deadline",
    "action required",
    "overdue",
];

/// Parse a comma-separated keyword list, lowercasing each entry since
/// the classifier matches against lowercased text. An override with no
/// usable entries yields an empty list, which disables the pre-pass.
fn parse_keyword_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm_api_hostname: String,
    pub llm_api_key: String,
    pub llm_model: String,
    /// When false, no upstream calls are made and every pipeline stage
    /// takes its fallback path. Useful for demos without an API key.
    pub llm_enabled: bool,
    /// Upper bound on a single upstream call before the stage falls back.
    pub llm_timeout_secs: u64,
    pub urgency_keywords: Vec<String>,
    /// Added to the priority score when urgency keywords are present
    /// and the model did not already say critical.
    pub urgency_boost: f64,
    /// How close the model's own score must be to a tier boundary for
    /// keyword presence to promote the priority one tier.
    pub tie_break_margin: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let llm_api_hostname = env::var("MAILPILOT_LLM_HOST")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let llm_api_key =
            env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let llm_model =
            env::var("MAILPILOT_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let llm_enabled = env::var("MAILPILOT_LLM_DISABLED").is_err();
        let llm_timeout_secs = env::var("MAILPILOT_LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        let urgency_boost = env::var("MAILPILOT_URGENCY_BOOST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.1);
        let tie_break_margin = env::var("MAILPILOT_TIE_BREAK_MARGIN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.05);
        let urgency_keywords = env::var("MAILPILOT_URGENCY_KEYWORDS")
            .map(|v| parse_keyword_list(&v))
            .unwrap_or_else(|_| {
                DEFAULT_URGENCY_KEYWORDS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        Self {
            llm_api_hostname,
            llm_api_key,
            llm_model,
            llm_enabled,
            llm_timeout_secs,
            urgency_keywords,
            urgency_boost,
            tie_break_margin,
        }
    }
}
