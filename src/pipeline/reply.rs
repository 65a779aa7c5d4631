//! Context-aware reply drafting: one structured generation call that
//! references the thread context and classification, degrading to a
//! canned reply keyed by category and tone.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::llm::LlmClient;
use crate::llm::prompt::{Prompt, templates};
use crate::pipeline::classify::Classification;
use crate::pipeline::context::CompressedContext;
use crate::pipeline::fallback;
use crate::store::Email;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Friendly,
    Concise,
}

impl Default for Tone {
    fn default() -> Self {
        Tone::Professional
    }
}

impl Tone {
    /// Absent or unrecognized tones become professional.
    pub fn parse(name: Option<&str>) -> Tone {
        match name.map(|n| n.trim().to_lowercase()).as_deref() {
            Some("friendly") => Tone::Friendly,
            Some("concise") => Tone::Concise,
            _ => Tone::Professional,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Tone::Professional => "Formal, respectful, clear",
            Tone::Friendly => "Warm, approachable, conversational",
            Tone::Concise => "Brief, to-the-point, efficient",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub content: String,
    pub tone: Tone,
    pub estimated_response_time: String,
    pub required_actions: Vec<String>,
    pub suggested_attachments: Vec<String>,
}

/// Wire shape of the model's reply response. The tone comes back as
/// free text and is coerced on the way in.
#[derive(Deserialize)]
struct ReplyResponse {
    content: String,
    #[serde(default)]
    tone: Option<String>,
    #[serde(default = "default_response_time")]
    estimated_response_time: String,
    #[serde(default)]
    required_actions: Vec<String>,
    #[serde(default)]
    suggested_attachments: Vec<String>,
}

fn default_response_time() -> String {
    "5-10 minutes".to_string()
}

pub struct ReplyGenerator {
    llm: LlmClient,
}

impl ReplyGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    pub async fn generate(
        &self,
        email: &Email,
        classification: &Classification,
        context: &CompressedContext,
        tone: Tone,
    ) -> Reply {
        match self.generate_upstream(email, classification, context, tone).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(
                    email_id = %email.id,
                    "Reply generation failed, using canned reply: {}",
                    err
                );
                fallback::canned_reply(classification.primary_category, tone)
            }
        }
    }

    async fn generate_upstream(
        &self,
        email: &Email,
        classification: &Classification,
        context: &CompressedContext,
        tone: Tone,
    ) -> Result<Reply> {
        let prompt = templates().render(
            &Prompt::ReplyGeneration.to_string(),
            &json!({
                "subject": email.subject,
                "sender": email.sender,
                "body": email.body,
                "context": context,
                "category": classification.primary_category.as_str(),
                "priority": classification.priority.as_str(),
                "tone_description": tone.description(),
            }),
        )?;

        let raw = self.llm.generate_json(&prompt, 0.4).await?;
        let response: ReplyResponse = serde_json::from_value(raw)?;

        Ok(Reply {
            content: response.content,
            tone: Tone::parse(response.tone.as_deref()),
            estimated_response_time: response.estimated_response_time,
            required_actions: response.required_actions,
            suggested_attachments: response.suggested_attachments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AppConfig;
    use crate::store::Category;
    use chrono::Utc;

    fn email() -> Email {
        Email {
            id: "e1".to_string(),
            subject: "Q1 Budget Review Meeting".to_string(),
            sender: "finance@company.com".to_string(),
            sender_name: "Finance Team".to_string(),
            recipients: vec!["you@company.com".to_string()],
            body: "Please join the budget review on Friday.".to_string(),
            thread_id: None,
            timestamp: Utc::now(),
            is_read: false,
            category: None,
            priority: None,
        }
    }

    fn classification(category: Category) -> Classification {
        Classification {
            primary_category: category,
            secondary_categories: Vec::new(),
            priority: crate::store::Priority::Medium,
            priority_score: 0.5,
            confidence: 0.8,
            reasoning: "test".to_string(),
        }
    }

    fn generator(hostname: &str, enabled: bool) -> ReplyGenerator {
        ReplyGenerator::new(LlmClient::new(&AppConfig {
            llm_api_hostname: hostname.to_string(),
            llm_api_key: "test-api-key".to_string(),
            llm_enabled: enabled,
            ..AppConfig::default()
        }))
    }

    #[test]
    fn test_tone_parse_defaults_to_professional() {
        assert_eq!(Tone::parse(None), Tone::Professional);
        assert_eq!(Tone::parse(Some("sarcastic")), Tone::Professional);
        assert_eq!(Tone::parse(Some("FRIENDLY")), Tone::Friendly);
        assert_eq!(Tone::parse(Some("concise")), Tone::Concise);
    }

    #[tokio::test]
    async fn it_generates_a_reply() {
        let mut server = mockito::Server::new_async().await;
        let content = serde_json::json!({
            "content": "I will attend the review. See you Friday.",
            "tone": "professional",
            "estimated_response_time": "2 minutes",
            "required_actions": ["Prepare department numbers"],
            "suggested_attachments": [],
        });
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({"choices": [{"message": {"content": content.to_string()}}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let reply = generator(&server.url(), true)
            .generate(
                &email(),
                &classification(Category::Meeting),
                &CompressedContext::default(),
                Tone::Professional,
            )
            .await;

        assert_eq!(reply.content, "I will attend the review. See you Friday.");
        assert_eq!(reply.required_actions, vec!["Prepare department numbers"]);
        assert_eq!(reply.estimated_response_time, "2 minutes");
    }

    #[tokio::test]
    async fn it_falls_back_to_the_canned_reply_by_category() {
        let generator = generator("http://127.0.0.1:1", false);
        let reply = generator
            .generate(
                &email(),
                &classification(Category::Finance),
                &CompressedContext::default(),
                Tone::Professional,
            )
            .await;

        assert_eq!(
            reply,
            fallback::canned_reply(Category::Finance, Tone::Professional)
        );
        assert!(reply.content.contains("invoice"));
    }
}
