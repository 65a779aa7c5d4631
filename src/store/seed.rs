//! Demo mailbox used by the server and the CLI walkthrough when no
//! real mail source is wired up.

use chrono::{TimeZone, Utc};

use super::{Email, MailStore};

/// Build a mailbox seeded with the demo emails.
pub fn demo_mailbox() -> MailStore {
    let mut store = MailStore::new();
    for email in demo_emails() {
        store.upsert(email);
    }
    store
}

pub fn demo_emails() -> Vec<Email> {
    vec![
        Email {
            id: "email-001".to_string(),
            subject: "Project Alpha Launch - Timeline Discussion".to_string(),
            sender: "sarah.chen@company.com".to_string(),
            sender_name: "Sarah Chen".to_string(),
            recipients: vec!["you@company.com".to_string()],
            body: "Hi team,\n\nI wanted to discuss the timeline for Project Alpha. We're \
                   currently scheduled to launch on March 15th, but I'm concerned about the \
                   testing phase.\n\nCan we schedule a meeting this week to review the current \
                   status? I think we need at least 2 more weeks for proper QA.\n\nPlease let \
                   me know your availability.\n\nBest,\nSarah"
                .to_string(),
            thread_id: Some("thread-001".to_string()),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap(),
            is_read: false,
            category: None,
            priority: None,
        },
        Email {
            id: "email-002".to_string(),
            subject: "Invoice #1234 - Payment Due".to_string(),
            sender: "billing@vendor.com".to_string(),
            sender_name: "Vendor Billing".to_string(),
            recipients: vec!["you@company.com".to_string()],
            body: "Dear Customer,\n\nThis is a reminder that Invoice #1234 for $5,000 is due \
                   on February 20th, 2026.\n\nPlease process the payment at your earliest \
                   convenience to avoid late fees.\n\nThank you for your business.\n\nRegards,\n\
                   Billing Department"
                .to_string(),
            thread_id: Some("thread-002".to_string()),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 14, 10, 30, 0).unwrap(),
            is_read: true,
            category: None,
            priority: None,
        },
        Email {
            id: "email-003".to_string(),
            subject: "URGENT: Critical bug in production".to_string(),
            sender: "dev-team@company.com".to_string(),
            sender_name: "Development Team".to_string(),
            recipients: vec!["you@company.com".to_string()],
            body: "URGENT - Action Required\n\nWe've discovered a critical bug in the \
                   authentication module that is affecting user logins. This needs immediate \
                   attention.\n\nError: Null pointer exception in AuthHandler.java\nImpact: \
                   All users unable to login\n\nPlease prioritize this fix ASAP.\n\nThanks"
                .to_string(),
            thread_id: Some("thread-003".to_string()),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 15, 8, 0, 0).unwrap(),
            is_read: false,
            category: None,
            priority: None,
        },
        Email {
            id: "email-004".to_string(),
            subject: "Weekend plans?".to_string(),
            sender: "john.doe@personal.com".to_string(),
            sender_name: "John Doe".to_string(),
            recipients: vec!["you@company.com".to_string()],
            body: "Hey!\n\nAre you free this weekend? A few of us are planning to go hiking \
                   on Saturday morning. Let me know if you want to join!\n\nCheers,\nJohn"
                .to_string(),
            thread_id: Some("thread-004".to_string()),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 14, 18, 0, 0).unwrap(),
            is_read: true,
            category: None,
            priority: None,
        },
        Email {
            id: "email-005".to_string(),
            subject: "Q1 Budget Review Meeting".to_string(),
            sender: "finance@company.com".to_string(),
            sender_name: "Finance Team".to_string(),
            recipients: vec![
                "you@company.com".to_string(),
                "team@company.com".to_string(),
            ],
            body: "Hi everyone,\n\nPlease join us for the Q1 Budget Review meeting scheduled \
                   for:\n\nDate: February 20th, 2026\nTime: 2:00 PM - 3:30 PM\nLocation: \
                   Conference Room A / Zoom\n\nAgenda:\n- Q1 spending review\n- Budget \
                   adjustments\n- Q2 projections\n\nPlease come prepared with your \
                   department's numbers.\n\nBest,\nFinance Team"
                .to_string(),
            thread_id: Some("thread-005".to_string()),
            timestamp: Utc.with_ymd_and_hms(2026, 2, 15, 11, 0, 0).unwrap(),
            is_read: false,
            category: None,
            priority: None,
        },
    ]
}
