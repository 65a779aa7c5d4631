//! Thread compression: one structured generation call that turns a
//! thread's message history into a `CompressedContext`. Results are
//! cached per thread id and invalidated when the member count changes.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;

use crate::llm::LlmClient;
use crate::llm::prompt::{Prompt, templates};
use crate::pipeline::fallback;
use crate::store::Thread;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn parse(name: &str) -> Sentiment {
        match name.trim().to_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub action: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompressedContext {
    pub summary: String,
    pub key_points: Vec<String>,
    pub decisions: Vec<String>,
    pub action_items: Vec<ActionItem>,
    pub sentiment: Sentiment,
    pub urgency_score: f64,
}

/// The context attached to emails that have no thread. Also what an
/// empty thread would compress to.
impl Default for CompressedContext {
    fn default() -> Self {
        Self {
            summary: String::new(),
            key_points: Vec::new(),
            decisions: Vec::new(),
            action_items: Vec::new(),
            sentiment: Sentiment::Neutral,
            urgency_score: 0.0,
        }
    }
}

/// Wire shape of the model's compression response. Anything that
/// doesn't deserialize into this triggers the fallback.
#[derive(Deserialize)]
struct CompressionResponse {
    summary: String,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    decisions: Vec<String>,
    #[serde(default)]
    action_items: Vec<ActionItem>,
    #[serde(default)]
    sentiment: String,
    #[serde(default = "default_urgency")]
    urgency_score: f64,
}

fn default_urgency() -> f64 {
    0.5
}

pub struct ContextCompressor {
    llm: LlmClient,
    // Keyed by thread id; the usize is the member count the entry was
    // computed against, so appending to a thread invalidates it.
    cache: RwLock<HashMap<String, (usize, CompressedContext)>>,
}

impl ContextCompressor {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Compress a thread, returning the cached result when the
    /// thread's member set is unchanged since the last call.
    pub async fn compress(&self, thread: &Thread) -> CompressedContext {
        {
            let cache = self.cache.read().await;
            if let Some((count, context)) = cache.get(&thread.thread_id)
                && *count == thread.emails.len()
            {
                return context.clone();
            }
        }

        let context = match self.compress_uncached(thread).await {
            Ok(context) => context,
            Err(err) => {
                tracing::warn!(
                    thread_id = %thread.thread_id,
                    "Thread compression failed, using fallback: {}",
                    err
                );
                fallback::degraded_context(thread)
            }
        };

        let mut cache = self.cache.write().await;
        cache.insert(
            thread.thread_id.clone(),
            (thread.emails.len(), context.clone()),
        );

        context
    }

    async fn compress_uncached(&self, thread: &Thread) -> Result<CompressedContext> {
        let transcript: Vec<_> = thread
            .emails
            .iter()
            .map(|e| {
                json!({
                    "sender": e.sender,
                    "subject": e.subject,
                    "timestamp": e.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                    "body": e.body,
                })
            })
            .collect();

        let prompt = templates().render(
            &Prompt::ThreadCompression.to_string(),
            &json!({"emails": transcript}),
        )?;

        let raw = self.llm.generate_json(&prompt, 0.2).await?;
        let response: CompressionResponse = serde_json::from_value(raw)?;

        Ok(CompressedContext {
            summary: response.summary,
            key_points: response.key_points,
            decisions: response.decisions,
            action_items: response.action_items,
            sentiment: Sentiment::parse(&response.sentiment),
            urgency_score: response.urgency_score.clamp(0.0, 1.0),
        })
    }
}
