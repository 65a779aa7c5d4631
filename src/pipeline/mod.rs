//! The processing pipeline: thread compression and classification run
//! concurrently, reply drafting waits on both, and the full result is
//! cached per email id for the lifetime of the process. Upstream
//! failures never escape this module; each stage degrades to its own
//! deterministic fallback.

pub mod classify;
pub mod context;
pub mod fallback;
pub mod reply;

use std::collections::HashMap;
use std::sync::{Arc, RwLock as SyncRwLock};

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::core::AppConfig;
use crate::llm::LlmClient;
use crate::store::{Email, MailStore, Thread};

use classify::{Classification, Classifier};
use context::{CompressedContext, ContextCompressor};
use reply::{Reply, ReplyGenerator, Tone};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessingResult {
    pub email_id: String,
    pub classification: Classification,
    pub context: CompressedContext,
    pub reply: Reply,
}

pub struct Pipeline {
    compressor: ContextCompressor,
    classifier: Classifier,
    reply_generator: ReplyGenerator,
    results: RwLock<HashMap<String, ProcessingResult>>,
    // Per-email-id locks so duplicate concurrent requests serialize
    // behind one pipeline run instead of both hitting the model.
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Pipeline {
    pub fn new(config: &AppConfig) -> Self {
        let llm = LlmClient::new(config);
        Self {
            compressor: ContextCompressor::new(llm.clone()),
            classifier: Classifier::new(llm.clone(), config),
            reply_generator: ReplyGenerator::new(llm),
            results: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Run the full pipeline for an email, or return the cached result
    /// if this email id has been processed before. Classification is
    /// written back onto the stored email.
    pub async fn process(
        &self,
        store: &SyncRwLock<MailStore>,
        email: &Email,
        tone: Tone,
    ) -> ProcessingResult {
        if let Some(cached) = self.results.read().await.get(&email.id) {
            return cached.clone();
        }

        let id_lock = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight
                .entry(email.id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = id_lock.lock().await;

        // A concurrent request for the same id may have finished while
        // we waited on the lock
        if let Some(cached) = self.results.read().await.get(&email.id) {
            return cached.clone();
        }

        let thread = self.thread_of(store, email);
        let (context, classification) = tokio::join!(
            self.compress_or_default(thread.as_ref()),
            self.classifier.classify(email),
        );

        let reply = self
            .reply_generator
            .generate(email, &classification, &context, tone)
            .await;

        store
            .write()
            .expect("mail store lock poisoned")
            .attach_classification(
                &email.id,
                classification.primary_category,
                classification.priority,
            );

        let result = ProcessingResult {
            email_id: email.id.clone(),
            classification,
            context,
            reply,
        };

        self.results
            .write()
            .await
            .insert(email.id.clone(), result.clone());

        result
    }

    /// Draft a reply for a stored email, reusing the cached
    /// classification and context when this email has already been
    /// processed. Does not require (or trigger) a full `process` run.
    /// Returns `None` for unknown email ids.
    pub async fn generate_reply(
        &self,
        store: &SyncRwLock<MailStore>,
        email_id: &str,
        tone: Tone,
    ) -> Option<Reply> {
        let email = store
            .read()
            .expect("mail store lock poisoned")
            .get(email_id)?;

        let cached = self
            .results
            .read()
            .await
            .get(email_id)
            .map(|r| (r.classification.clone(), r.context.clone()));

        let (classification, context) = match cached {
            Some(parts) => parts,
            None => {
                let thread = self.thread_of(store, &email);
                tokio::join!(
                    self.classifier.classify(&email),
                    self.compress_or_default(thread.as_ref()),
                )
            }
        };

        let reply = self
            .reply_generator
            .generate(&email, &classification, &context, tone)
            .await;

        Some(reply)
    }

    pub async fn processed_count(&self) -> usize {
        self.results.read().await.len()
    }

    fn thread_of(&self, store: &SyncRwLock<MailStore>, email: &Email) -> Option<Thread> {
        let thread_id = email.thread_id.as_deref()?;
        store
            .read()
            .expect("mail store lock poisoned")
            .thread_of(thread_id)
    }

    async fn compress_or_default(&self, thread: Option<&Thread>) -> CompressedContext {
        match thread {
            Some(thread) => self.compressor.compress(thread).await,
            // No thread, nothing to compress
            None => CompressedContext::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mockito::Matcher;
    use serde_json::json;

    fn email(id: &str, thread_id: Option<&str>, subject: &str, hour: u32) -> Email {
        Email {
            id: id.to_string(),
            subject: subject.to_string(),
            sender: "alice@example.com".to_string(),
            sender_name: "Alice".to_string(),
            recipients: vec!["you@company.com".to_string()],
            body: "Let's discuss the plan.".to_string(),
            thread_id: thread_id.map(|t| t.to_string()),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 10, hour, 0, 0).unwrap(),
            is_read: false,
            category: None,
            priority: None,
        }
    }

    fn pipeline(hostname: &str, enabled: bool) -> Pipeline {
        Pipeline::new(&AppConfig {
            llm_api_hostname: hostname.to_string(),
            llm_api_key: "test-api-key".to_string(),
            llm_enabled: enabled,
            ..AppConfig::default()
        })
    }

    fn completion_body(content: serde_json::Value) -> String {
        json!({"choices": [{"message": {"content": content.to_string()}}]}).to_string()
    }

    // Each pipeline stage renders a distinct prompt, so mocks key off a
    // phrase unique to that stage's template.
    async fn mock_stage(
        server: &mut mockito::Server,
        phrase: &str,
        content: serde_json::Value,
        hits: usize,
    ) -> mockito::Mock {
        server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::Regex(phrase.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(content))
            .expect(hits)
            .create_async()
            .await
    }

    fn compression_content() -> serde_json::Value {
        json!({
            "summary": "Planning discussion.",
            "key_points": ["Plan needs review"],
            "decisions": [],
            "action_items": [],
            "sentiment": "neutral",
            "urgency_score": 0.3,
        })
    }

    fn classification_content() -> serde_json::Value {
        json!({
            "primary_category": "Work",
            "secondary_categories": [],
            "priority": "medium",
            "priority_score": 0.5,
            "confidence": 0.9,
            "reasoning": "Project planning",
        })
    }

    fn reply_content() -> serde_json::Value {
        json!({
            "content": "Happy to discuss. How about Thursday?",
            "tone": "professional",
            "estimated_response_time": "5 minutes",
            "required_actions": [],
            "suggested_attachments": [],
        })
    }

    #[tokio::test]
    async fn it_skips_the_compressor_for_emails_without_a_thread() {
        let mut server = mockito::Server::new_async().await;
        let compress = mock_stage(&mut server, "Analyze this email thread", compression_content(), 0).await;
        let classify = mock_stage(&mut server, "Classify this email", classification_content(), 1).await;
        let reply = mock_stage(&mut server, "Draft a reply", reply_content(), 1).await;

        let store = SyncRwLock::new(MailStore::new());
        let e = email("e1", None, "Plan", 9);
        store.write().unwrap().upsert(e.clone());

        let pipeline = pipeline(&server.url(), true);
        let result = pipeline.process(&store, &e, Tone::Professional).await;

        assert_eq!(result.context, CompressedContext::default());
        compress.assert_async().await;
        classify.assert_async().await;
        reply.assert_async().await;
    }

    #[tokio::test]
    async fn it_caches_results_per_email_id() {
        let mut server = mockito::Server::new_async().await;
        let classify = mock_stage(&mut server, "Classify this email", classification_content(), 1).await;
        let reply = mock_stage(&mut server, "Draft a reply", reply_content(), 1).await;

        let store = SyncRwLock::new(MailStore::new());
        let e = email("e1", None, "Plan", 9);
        store.write().unwrap().upsert(e.clone());

        let pipeline = pipeline(&server.url(), true);
        let first = pipeline.process(&store, &e, Tone::Professional).await;
        let second = pipeline.process(&store, &e, Tone::Professional).await;

        assert_eq!(first, second);
        assert_eq!(pipeline.processed_count().await, 1);
        classify.assert_async().await;
        reply.assert_async().await;
    }

    #[tokio::test]
    async fn it_deduplicates_concurrent_requests_for_the_same_email() {
        let mut server = mockito::Server::new_async().await;
        let classify = mock_stage(&mut server, "Classify this email", classification_content(), 1).await;
        let reply = mock_stage(&mut server, "Draft a reply", reply_content(), 1).await;

        let store = SyncRwLock::new(MailStore::new());
        let e = email("e1", None, "Plan", 9);
        store.write().unwrap().upsert(e.clone());

        let pipeline = pipeline(&server.url(), true);
        let (first, second) = tokio::join!(
            pipeline.process(&store, &e, Tone::Professional),
            pipeline.process(&store, &e, Tone::Professional),
        );

        assert_eq!(first, second);
        classify.assert_async().await;
        reply.assert_async().await;
    }

    #[tokio::test]
    async fn it_reuses_the_thread_context_across_member_emails() {
        let mut server = mockito::Server::new_async().await;
        let compress = mock_stage(&mut server, "Analyze this email thread", compression_content(), 1).await;
        let classify = mock_stage(&mut server, "Classify this email", classification_content(), 2).await;
        let reply = mock_stage(&mut server, "Draft a reply", reply_content(), 2).await;

        let store = SyncRwLock::new(MailStore::new());
        let e1 = email("e1", Some("thr-1"), "Plan", 9);
        let e2 = email("e2", Some("thr-1"), "Re: Plan", 10);
        {
            let mut s = store.write().unwrap();
            s.upsert(e1.clone());
            s.upsert(e2.clone());
        }

        let pipeline = pipeline(&server.url(), true);
        let first = pipeline.process(&store, &e1, Tone::Professional).await;
        let second = pipeline.process(&store, &e2, Tone::Professional).await;

        // Same member set means byte-identical context with no second
        // compression call
        assert_eq!(first.context, second.context);
        compress.assert_async().await;
        classify.assert_async().await;
        reply.assert_async().await;
    }

    #[tokio::test]
    async fn it_writes_classification_back_onto_the_stored_email() {
        let mut server = mockito::Server::new_async().await;
        let _classify = mock_stage(&mut server, "Classify this email", classification_content(), 1).await;
        let _reply = mock_stage(&mut server, "Draft a reply", reply_content(), 1).await;

        let store = SyncRwLock::new(MailStore::new());
        let e = email("e1", None, "Plan", 9);
        store.write().unwrap().upsert(e.clone());

        let pipeline = pipeline(&server.url(), true);
        pipeline.process(&store, &e, Tone::Professional).await;

        let stored = store.read().unwrap().get("e1").unwrap();
        assert_eq!(stored.category, Some(crate::store::Category::Work));
        assert_eq!(stored.priority, Some(crate::store::Priority::Medium));
    }

    #[tokio::test]
    async fn it_returns_a_well_formed_result_with_the_provider_disabled() {
        let store = SyncRwLock::new(MailStore::new());
        let mut e = email("e1", None, "URGENT: Critical bug in production", 8);
        e.body = "All users unable to login. Please prioritize this fix ASAP.".to_string();
        store.write().unwrap().upsert(e.clone());

        let pipeline = pipeline("http://127.0.0.1:1", false);
        let result = pipeline.process(&store, &e, Tone::Professional).await;

        // Heuristic boost promotes the fallback's medium tier
        assert!(result.classification.priority.is_urgent());
        assert_eq!(
            result.classification.primary_category,
            crate::store::Category::Other
        );
        assert_eq!(result.context, CompressedContext::default());
        assert_eq!(
            result.reply,
            fallback::canned_reply(crate::store::Category::Other, Tone::Professional)
        );
    }

    #[tokio::test]
    async fn it_generates_a_reply_without_a_prior_process_run() {
        let store = SyncRwLock::new(MailStore::new());
        let e = email("e1", None, "Plan", 9);
        store.write().unwrap().upsert(e.clone());

        let pipeline = pipeline("http://127.0.0.1:1", false);
        let reply = pipeline
            .generate_reply(&store, "e1", Tone::Friendly)
            .await
            .unwrap();

        assert_eq!(reply.tone, Tone::Friendly);
        assert_eq!(pipeline.processed_count().await, 0);
    }

    #[tokio::test]
    async fn it_returns_none_for_unknown_reply_targets() {
        let store = SyncRwLock::new(MailStore::new());
        let pipeline = pipeline("http://127.0.0.1:1", false);
        assert!(pipeline
            .generate_reply(&store, "missing", Tone::Professional)
            .await
            .is_none());
    }
}
