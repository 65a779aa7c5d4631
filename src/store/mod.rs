//! In-memory mailbox. Emails are the only owned records; threads are
//! materialized on demand from emails sharing a thread id.

pub mod seed;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of email categories. Anything the model returns outside
/// this set is coerced to `Other` at the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Work,
    Personal,
    Finance,
    Promotions,
    Support,
    Urgent,
    Meeting,
    #[serde(rename = "Follow-up")]
    FollowUp,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Work,
        Category::Personal,
        Category::Finance,
        Category::Promotions,
        Category::Support,
        Category::Urgent,
        Category::Meeting,
        Category::FollowUp,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Finance => "Finance",
            Category::Promotions => "Promotions",
            Category::Support => "Support",
            Category::Urgent => "Urgent",
            Category::Meeting => "Meeting",
            Category::FollowUp => "Follow-up",
            Category::Other => "Other",
        }
    }

    /// Lenient parse for model output and query params. Unknown labels
    /// become `Other`.
    pub fn parse(name: &str) -> Category {
        match name.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "work" => Category::Work,
            "personal" => Category::Personal,
            "finance" => Category::Finance,
            "promotions" => Category::Promotions,
            "support" => Category::Support,
            "urgent" => Category::Urgent,
            "meeting" => Category::Meeting,
            "follow_up" => Category::FollowUp,
            _ => Category::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Unknown labels default to `Medium`, matching the classifier
    /// fallback tier.
    pub fn parse(name: &str) -> Priority {
        match name.trim().to_lowercase().as_str() {
            "critical" => Priority::Critical,
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    /// Base priority score for the tier, before any heuristic boost.
    pub fn base_score(&self) -> f64 {
        match self {
            Priority::Critical => 0.9,
            Priority::High => 0.7,
            Priority::Medium => 0.5,
            Priority::Low => 0.25,
        }
    }

    /// Score threshold that separates this tier from the next tier up,
    /// if there is one.
    pub fn upper_boundary(&self) -> Option<f64> {
        match self {
            Priority::Critical => None,
            Priority::High => Some(0.8),
            Priority::Medium => Some(0.6),
            Priority::Low => Some(0.3),
        }
    }

    pub fn promote(&self) -> Priority {
        match self {
            Priority::Critical | Priority::High => Priority::Critical,
            Priority::Medium => Priority::High,
            Priority::Low => Priority::Medium,
        }
    }

    pub fn is_urgent(&self) -> bool {
        matches!(self, Priority::Critical | Priority::High)
    }
}

fn default_timestamp() -> DateTime<Utc> {
    Utc::now()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    pub subject: String,
    pub sender: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    pub body: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default = "default_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Aggregate view over emails sharing a thread id. Never stored;
/// built by `MailStore::thread_of`.
#[derive(Clone, Debug, Serialize)]
pub struct Thread {
    pub thread_id: String,
    pub subject: String,
    pub emails: Vec<Email>,
    pub participants: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EmailFilter {
    Unread,
    Urgent,
    Category(Category),
}

impl EmailFilter {
    fn matches(&self, email: &Email) -> bool {
        match self {
            EmailFilter::Unread => !email.is_read,
            EmailFilter::Urgent => email.priority.is_some_and(|p| p.is_urgent()),
            EmailFilter::Category(category) => email.category == Some(*category),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MailboxStats {
    pub total: usize,
    pub unread: usize,
    pub urgent: usize,
    pub categories: HashMap<String, usize>,
}

/// The mailbox. Insertion order is the stable listing order.
#[derive(Default)]
pub struct MailStore {
    emails: HashMap<String, Email>,
    order: Vec<String>,
}

impl MailStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Email> {
        self.emails.get(id).cloned()
    }

    pub fn upsert(&mut self, email: Email) {
        if !self.emails.contains_key(&email.id) {
            self.order.push(email.id.clone());
        }
        self.emails.insert(email.id.clone(), email);
    }

    pub fn list(&self, filter: Option<EmailFilter>) -> Vec<Email> {
        self.order
            .iter()
            .filter_map(|id| self.emails.get(id))
            .filter(|e| filter.as_ref().is_none_or(|f| f.matches(e)))
            .cloned()
            .collect()
    }

    pub fn mark_read(&mut self, id: &str) -> Option<Email> {
        let email = self.emails.get_mut(id)?;
        email.is_read = true;
        Some(email.clone())
    }

    /// Write-back of pipeline classification results onto the stored
    /// email. A no-op for unknown ids.
    pub fn attach_classification(&mut self, id: &str, category: Category, priority: Priority) {
        if let Some(email) = self.emails.get_mut(id) {
            email.category = Some(category);
            email.priority = Some(priority);
        }
    }

    /// Materialize the thread for `thread_id` by scanning member
    /// emails. Returns `None` when no email belongs to the thread.
    pub fn thread_of(&self, thread_id: &str) -> Option<Thread> {
        let mut members: Vec<Email> = self
            .order
            .iter()
            .filter_map(|id| self.emails.get(id))
            .filter(|e| e.thread_id.as_deref() == Some(thread_id))
            .cloned()
            .collect();

        if members.is_empty() {
            return None;
        }

        members.sort_by_key(|e| e.timestamp);

        let mut participants: Vec<String> = Vec::new();
        for email in &members {
            for addr in std::iter::once(&email.sender).chain(email.recipients.iter()) {
                if !participants.contains(addr) {
                    participants.push(addr.clone());
                }
            }
        }

        let last_updated = members.last()?.timestamp;

        Some(Thread {
            thread_id: thread_id.to_string(),
            subject: members[0].subject.clone(),
            emails: members,
            participants,
            last_updated,
        })
    }

    pub fn stats(&self) -> MailboxStats {
        let total = self.emails.len();
        let unread = self.emails.values().filter(|e| !e.is_read).count();
        let urgent = self
            .emails
            .values()
            .filter(|e| e.priority.is_some_and(|p| p.is_urgent()))
            .count();

        let mut categories: HashMap<String, usize> = HashMap::new();
        for email in self.emails.values() {
            if let Some(category) = email.category {
                *categories.entry(category.as_str().to_string()).or_insert(0) += 1;
            }
        }

        MailboxStats {
            total,
            unread,
            urgent,
            categories,
        }
    }
}
