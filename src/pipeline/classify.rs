//! Email classification: a heuristic urgency pre-pass over the
//! subject and body plus one structured generation call. Whatever the
//! model returns is coerced into the closed category and priority
//! sets before it leaves this module.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::AppConfig;
use crate::llm::LlmClient;
use crate::llm::prompt::{Prompt, templates};
use crate::pipeline::fallback;
use crate::store::{Category, Email, Priority};

/// Body characters included in the classification prompt.
const BODY_PREVIEW_CHARS: usize = 1000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub primary_category: Category,
    pub secondary_categories: Vec<Category>,
    pub priority: Priority,
    pub priority_score: f64,
    pub confidence: f64,
    pub reasoning: String,
}

/// Wire shape of the model's classification response.
#[derive(Deserialize)]
struct ClassificationResponse {
    primary_category: String,
    #[serde(default)]
    secondary_categories: Vec<String>,
    priority: String,
    #[serde(default = "default_score")]
    priority_score: f64,
    #[serde(default = "default_confidence")]
    confidence: f64,
    #[serde(default)]
    reasoning: String,
}

fn default_score() -> f64 {
    0.5
}

fn default_confidence() -> f64 {
    0.8
}

pub struct Classifier {
    llm: LlmClient,
    keywords: Vec<String>,
    boost: f64,
    tie_break_margin: f64,
}

impl Classifier {
    pub fn new(llm: LlmClient, config: &AppConfig) -> Self {
        Self {
            llm,
            keywords: config.urgency_keywords.clone(),
            boost: config.urgency_boost,
            tie_break_margin: config.tie_break_margin,
        }
    }

    /// Classify a single email. Upstream failure degrades to the
    /// fallback classification; the heuristic urgency scoring applies
    /// either way.
    pub async fn classify(&self, email: &Email) -> Classification {
        let keyword_hit = self.has_urgency_keywords(email);

        let (classification, model_score) = match self.classify_upstream(email).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(
                    email_id = %email.id,
                    "Classification failed, using fallback: {}",
                    err
                );
                (fallback::fallback_classification(email), None)
            }
        };

        self.apply_urgency_scoring(classification, model_score, keyword_hit)
    }

    fn has_urgency_keywords(&self, email: &Email) -> bool {
        let text = format!("{} {}", email.subject, email.body).to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    async fn classify_upstream(&self, email: &Email) -> Result<(Classification, Option<f64>)> {
        let body_preview: String = email.body.chars().take(BODY_PREVIEW_CHARS).collect();
        let prompt = templates().render(
            &Prompt::Classification.to_string(),
            &json!({
                "subject": email.subject,
                "sender": email.sender,
                "body": body_preview,
            }),
        )?;

        let raw = self.llm.generate_json(&prompt, 0.1).await?;
        let response: ClassificationResponse = serde_json::from_value(raw)?;

        let primary = Category::parse(&response.primary_category);
        let mut secondary: Vec<Category> = Vec::new();
        for name in &response.secondary_categories {
            let category = Category::parse(name);
            if category != primary && !secondary.contains(&category) {
                secondary.push(category);
            }
        }

        let priority = Priority::parse(&response.priority);
        let model_score = response.priority_score.clamp(0.0, 1.0);

        Ok((
            Classification {
                primary_category: primary,
                secondary_categories: secondary,
                priority,
                priority_score: priority.base_score(),
                confidence: response.confidence.clamp(0.0, 1.0),
                reasoning: response.reasoning,
            },
            Some(model_score),
        ))
    }

    /// Derive the final priority tier and score. The tier's base score
    /// gets the keyword boost unless the model already said critical;
    /// the tier itself is promoted when the boosted score reaches the
    /// next tier's boundary, or when the model's own score was close
    /// enough to the boundary that keyword presence breaks the tie.
    fn apply_urgency_scoring(
        &self,
        mut classification: Classification,
        model_score: Option<f64>,
        keyword_hit: bool,
    ) -> Classification {
        let mut tier = classification.priority;
        let mut score = tier.base_score();

        if keyword_hit && tier != Priority::Critical {
            score = (score + self.boost).min(1.0);

            if let Some(boundary) = tier.upper_boundary() {
                let boosted_over = score >= boundary;
                let tie_break = model_score
                    .is_some_and(|s| (s - boundary).abs() <= self.tie_break_margin);
                if boosted_over || tie_break {
                    tier = tier.promote();
                }
            }
        }

        classification.priority = tier;
        classification.priority_score = score;
        classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn email(subject: &str, body: &str) -> Email {
        Email {
            id: "e1".to_string(),
            subject: subject.to_string(),
            sender: "alice@example.com".to_string(),
            sender_name: String::new(),
            recipients: Vec::new(),
            body: body.to_string(),
            thread_id: None,
            timestamp: Utc::now(),
            is_read: false,
            category: None,
            priority: None,
        }
    }

    fn config(hostname: &str, enabled: bool) -> AppConfig {
        AppConfig {
            llm_api_hostname: hostname.to_string(),
            llm_api_key: "test-api-key".to_string(),
            llm_enabled: enabled,
            ..AppConfig::default()
        }
    }

    fn classifier(config: &AppConfig) -> Classifier {
        Classifier::new(LlmClient::new(config), config)
    }

    fn completion_body(content: serde_json::Value) -> String {
        json!({"choices": [{"message": {"content": content.to_string()}}]}).to_string()
    }

    #[tokio::test]
    async fn it_coerces_unknown_labels_to_the_closed_set() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(json!({
                "primary_category": "Newsletter",
                "secondary_categories": ["Finance", "Newsletter", "finance"],
                "priority": "someday",
                "priority_score": 0.4,
                "confidence": 0.9,
                "reasoning": "Looks like a mailing list",
            })))
            .create_async()
            .await;

        let classification = classifier(&config(&server.url(), true))
            .classify(&email("Digest", "This week in tech"))
            .await;

        assert_eq!(classification.primary_category, Category::Other);
        // "Newsletter" coerces to Other which duplicates the primary,
        // and the two Finance spellings collapse to one entry
        assert_eq!(classification.secondary_categories, vec![Category::Finance]);
        assert_eq!(classification.priority, Priority::Medium);
        assert_eq!(classification.confidence, 0.9);
    }

    #[tokio::test]
    async fn it_boosts_priority_score_for_urgency_keywords() {
        let config = config("http://127.0.0.1:1", false);
        let classifier = classifier(&config);

        let plain = classifier.classify(&email("Bug report", "Login fails")).await;
        let flagged = classifier
            .classify(&email("URGENT: Bug report", "Login fails"))
            .await;

        assert!(flagged.priority_score >= plain.priority_score);
        assert_eq!(plain.priority, Priority::Medium);
        // Medium base 0.5 + default boost 0.1 reaches the 0.6 boundary
        assert_eq!(flagged.priority, Priority::High);
        assert!(flagged.priority.is_urgent());
    }

    #[tokio::test]
    async fn it_does_not_boost_when_model_says_critical() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(json!({
                "primary_category": "Urgent",
                "secondary_categories": [],
                "priority": "critical",
                "priority_score": 0.95,
                "confidence": 0.9,
                "reasoning": "Production outage",
            })))
            .create_async()
            .await;

        let classification = classifier(&config(&server.url(), true))
            .classify(&email("URGENT: outage", "Production is down"))
            .await;

        assert_eq!(classification.priority, Priority::Critical);
        assert_eq!(classification.priority_score, Priority::Critical.base_score());
    }

    #[tokio::test]
    async fn it_tie_breaks_near_a_boundary_with_keywords_present() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(json!({
                "primary_category": "Work",
                "secondary_categories": [],
                "priority": "medium",
                "priority_score": 0.58,
                "confidence": 0.7,
                "reasoning": "Borderline",
            })))
            .create_async()
            .await;

        // Small boost so only the tie-break can promote the tier
        let mut cfg = config(&server.url(), true);
        cfg.urgency_boost = 0.05;
        let classification = classifier(&cfg)
            .classify(&email("Deadline tomorrow", "Please respond"))
            .await;

        // 0.58 is within 0.05 of the 0.6 medium/high boundary
        assert_eq!(classification.priority, Priority::High);
        assert_eq!(classification.priority_score, 0.55);
    }

    #[tokio::test]
    async fn it_falls_back_when_upstream_is_unavailable() {
        let config = config("http://127.0.0.1:1", false);
        let classification = classifier(&config)
            .classify(&email("Invoice #99", "Payment is due"))
            .await;

        assert_eq!(classification.primary_category, Category::Other);
        assert_eq!(classification.priority, Priority::Medium);
        assert_eq!(classification.confidence, 0.5);
        assert_eq!(classification.reasoning, fallback::FALLBACK_REASONING);
        assert!(classification
            .secondary_categories
            .contains(&Category::Finance));
    }
}
