mod classifier;
mod config;
mod engine;
mod errors;
mod lead_store;
mod models;
mod scheduler;

use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::classifier::KeywordClassifier;
use crate::config::Config;
use crate::engine::{ConversationEngine, AWAITING_CONSENT};
use crate::lead_store::LeadStore;
use crate::scheduler::{ReminderScheduler, TracingNotifier};

/// Main entry point: an interactive console conversation with one lead.
///
/// Initializes logging, configuration, and the lead store, then reads
/// responses from stdin and feeds them through the conversation engine
/// until the lead is secured or declines.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_lead_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the lead store and its backing CSV
    let store = Arc::new(LeadStore::new(&config.leads_csv_path));
    store.initialize().await?;

    let scheduler = Arc::new(ReminderScheduler::new(
        store.clone(),
        config.follow_up_interval(),
        Arc::new(TracingNotifier),
    ));
    let engine = ConversationEngine::new(store, scheduler, Arc::new(KeywordClassifier));

    let lead_id = Uuid::new_v4().to_string();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    print!("Please provide your name: ");
    stdout.flush()?;
    let mut name = String::new();
    stdin.lock().read_line(&mut name)?;
    let name = name.trim().to_string();

    println!(
        "Agent to {}: Hey {}, thank you for filling out the form. \
         I'd like to gather some information from you. Is that okay?",
        name, name
    );

    loop {
        print!("Your response: ");
        stdout.flush()?;
        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!("\nAgent to {}: Goodbye, {}!", name, name);
            break;
        }

        let reply = engine.advance(&lead_id, &name, input.trim()).await?;
        if reply != AWAITING_CONSENT {
            println!("Agent to {}: {}", name, reply);
        }
        if reply == "secured" || reply == "no_response" {
            break;
        }
    }

    Ok(())
}
