//! Client for an OpenAI-compatible chat completions API, constrained
//! to structured JSON output. Every failure mode along the way
//! (network error, non-2xx, missing content, malformed JSON) is
//! collapsed into a single `anyhow::Error` since callers treat them
//! all the same: take the stage's fallback path.

pub mod prompt;

use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use serde_json::{Value, json};

use crate::core::AppConfig;

#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    api_hostname: String,
    api_key: String,
    model: String,
    timeout: Duration,
    enabled: bool,
}

impl LlmClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_hostname: config.llm_api_hostname.clone(),
            api_key: config.llm_api_key.clone(),
            model: config.llm_model.clone(),
            timeout: Duration::from_secs(config.llm_timeout_secs),
            enabled: config.llm_enabled,
        }
    }

    /// Issue a single structured generation request and parse the
    /// response content as JSON.
    pub async fn generate_json(&self, prompt: &str, temperature: f64) -> Result<Value> {
        if !self.enabled {
            bail!("LLM provider is disabled");
        }

        let payload = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": temperature,
            "response_format": {"type": "json_object"},
        });

        let url = format!(
            "{}/v1/chat/completions",
            self.api_hostname.trim_end_matches("/")
        );
        let response: Value = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("No message content in completion response: {}", response))?;

        let parsed = serde_json::from_str(content)?;
        Ok(parsed)
    }
}
