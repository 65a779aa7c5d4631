//! Walk the demo mailbox through the full pipeline and print the
//! results. Works without an API key since every stage falls back to
//! deterministic output when the model is unreachable.

use std::sync::RwLock;

use anyhow::Result;

use crate::core::AppConfig;
use crate::pipeline::Pipeline;
use crate::pipeline::reply::Tone;
use crate::store::seed;

pub async fn run(tone: &str) -> Result<()> {
    let config = AppConfig::default();
    let tone = Tone::parse(Some(tone));

    if !config.llm_enabled {
        println!("Note: LLM provider disabled, showing fallback results\n");
    }

    let store = RwLock::new(seed::demo_mailbox());
    let pipeline = Pipeline::new(&config);

    let emails = store.read().expect("mail store lock poisoned").list(None);
    for email in emails {
        let result = pipeline.process(&store, &email, tone).await;

        println!("{}", "=".repeat(60));
        println!("{} (from {})", email.subject, email.sender);
        println!("{}", "=".repeat(60));
        println!(
            "Category: {} | Priority: {} ({:.2})",
            result.classification.primary_category.as_str(),
            result.classification.priority.as_str(),
            result.classification.priority_score,
        );
        if !result.context.summary.is_empty() {
            println!("\nThread summary:\n{}", result.context.summary);
        }
        for point in &result.context.key_points {
            println!("  - {}", point);
        }
        for item in &result.context.action_items {
            println!(
                "  * {} (owner: {})",
                item.action,
                item.owner.as_deref().unwrap_or("TBD")
            );
        }
        println!("\nSuggested reply:\n{}\n", result.reply.content);
    }

    Ok(())
}
