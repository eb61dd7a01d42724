//! Simulates several leads talking to the agent concurrently.
//!
//! Alice completes the whole funnel, Bob declines consent, and Charlie
//! consents and then goes quiet so the follow-up scheduler kicks in.

use rust_lead_agent::classifier::KeywordClassifier;
use rust_lead_agent::config::Config;
use rust_lead_agent::engine::{ConversationEngine, AWAITING_CONSENT};
use rust_lead_agent::lead_store::LeadStore;
use rust_lead_agent::scheduler::{ReminderScheduler, TracingNotifier};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

async fn process_lead(engine: Arc<ConversationEngine>, name: &str) {
    let lead_id = Uuid::new_v4().to_string();
    tracing::info!("New lead: {}, Name: {}", lead_id, name);

    let responses: &[&str] = match name {
        // Full conversation
        "Alice" => &["yes", "30", "usa", "software"],
        // No consent
        "Bob" => &["no"],
        // Unresponsive after consent (exercises follow-up)
        "Charlie" => &["yes"],
        _ => &[],
    };

    match engine.advance(&lead_id, name, "start").await {
        Ok(reply) if reply != AWAITING_CONSENT => {
            tracing::info!("Agent to {}: {}", name, reply);
        }
        Ok(_) => {}
        Err(e) => tracing::error!("Conversation with {} failed: {}", name, e),
    }

    for response in responses {
        tokio::time::sleep(Duration::from_secs(2)).await;
        match engine.advance(&lead_id, name, response).await {
            Ok(reply) => {
                if reply != "secured" && reply != "no_response" && reply != AWAITING_CONSENT {
                    tracing::info!("Agent to {}: {}", name, reply);
                }
            }
            Err(e) => {
                tracing::error!("Conversation with {} failed: {}", name, e);
                return;
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_lead_agent=info,simulate_leads=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store = Arc::new(LeadStore::new(&config.leads_csv_path));
    store.initialize().await?;

    let scheduler = Arc::new(ReminderScheduler::new(
        store.clone(),
        config.follow_up_interval(),
        Arc::new(TracingNotifier),
    ));
    let engine = Arc::new(ConversationEngine::new(
        store,
        scheduler,
        Arc::new(KeywordClassifier),
    ));

    let mut handles = Vec::new();
    for name in ["Alice", "Bob", "Charlie"] {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            process_lead(engine, name).await;
        }));
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    for handle in handles {
        handle.await?;
    }

    // Leave the runtime up long enough for Charlie's follow-ups to fire.
    tokio::time::sleep(Duration::from_secs(2 * config.follow_up_secs)).await;

    Ok(())
}
