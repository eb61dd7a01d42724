/// Integration tests for the lead store's CSV mirror
/// Covers initialization, upsert merge semantics, missing-file recovery,
/// and writer serialization.
use rust_lead_agent::lead_store::LeadStore;
use rust_lead_agent::models::{LeadRecord, LeadStatus};
use std::sync::Arc;
use tempfile::TempDir;

fn csv_store(dir: &TempDir) -> LeadStore {
    LeadStore::new(dir.path().join("leads.csv"))
}

#[tokio::test]
async fn initialize_writes_header_once() {
    let dir = TempDir::new().unwrap();
    let store = csv_store(&dir);

    store.initialize().await.unwrap();
    store.initialize().await.unwrap();

    let content = std::fs::read_to_string(store.csv_path()).unwrap();
    assert_eq!(content.trim(), "lead_id,name,age,country,interest,status");
}

#[tokio::test]
async fn initialize_preserves_existing_data() {
    let dir = TempDir::new().unwrap();
    let store = csv_store(&dir);
    store.initialize().await.unwrap();
    store
        .upsert("lead-1", "Alice", Some("30"), None, None, LeadStatus::Pending)
        .await
        .unwrap();

    // Re-running initialize must be a no-op on a populated file.
    store.initialize().await.unwrap();

    let rows = store.read_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].age.as_deref(), Some("30"));
}

#[tokio::test]
async fn upsert_appends_then_updates_in_place() {
    let dir = TempDir::new().unwrap();
    let store = csv_store(&dir);
    store.initialize().await.unwrap();

    store
        .upsert("lead-1", "Alice", Some("30"), None, None, LeadStatus::Pending)
        .await
        .unwrap();
    store
        .upsert(
            "lead-1",
            "Alice",
            None,
            Some("usa"),
            None,
            LeadStatus::Pending,
        )
        .await
        .unwrap();
    store
        .upsert(
            "lead-1",
            "Alice",
            None,
            None,
            Some("software"),
            LeadStatus::Secured,
        )
        .await
        .unwrap();

    let rows = store.read_all().await.unwrap();
    assert_eq!(rows.len(), 1, "updates must replace the row, not append");
    let row = &rows[0];
    assert_eq!(row.age.as_deref(), Some("30"));
    assert_eq!(row.country.as_deref(), Some("usa"));
    assert_eq!(row.interest.as_deref(), Some("software"));
    assert_eq!(row.status, LeadStatus::Secured);
}

#[tokio::test]
async fn empty_fields_preserve_existing_values() {
    let dir = TempDir::new().unwrap();
    let store = csv_store(&dir);
    store.initialize().await.unwrap();

    store
        .upsert(
            "lead-1",
            "Alice",
            Some("30"),
            Some("usa"),
            None,
            LeadStatus::Pending,
        )
        .await
        .unwrap();
    // Empty strings behave like omitted fields.
    store
        .upsert(
            "lead-1",
            "Alice",
            Some(""),
            Some(""),
            Some(""),
            LeadStatus::FollowedUp,
        )
        .await
        .unwrap();

    let rows = store.read_all().await.unwrap();
    let row = &rows[0];
    assert_eq!(row.age.as_deref(), Some("30"));
    assert_eq!(row.country.as_deref(), Some("usa"));
    assert!(row.interest.is_none());
    assert_eq!(row.status, LeadStatus::FollowedUp);
}

#[tokio::test]
async fn status_is_always_rewritten() {
    let dir = TempDir::new().unwrap();
    let store = csv_store(&dir);
    store.initialize().await.unwrap();

    store
        .upsert("lead-1", "Alice", None, None, None, LeadStatus::Pending)
        .await
        .unwrap();
    store
        .upsert("lead-1", "Alice", None, None, None, LeadStatus::FollowedUp)
        .await
        .unwrap();

    let rows = store.read_all().await.unwrap();
    assert_eq!(rows[0].status, LeadStatus::FollowedUp);
}

#[tokio::test]
async fn missing_file_is_recreated_on_upsert() {
    let dir = TempDir::new().unwrap();
    let store = csv_store(&dir);
    store.initialize().await.unwrap();
    std::fs::remove_file(store.csv_path()).unwrap();

    store
        .upsert("lead-1", "Alice", Some("30"), None, None, LeadStatus::Pending)
        .await
        .unwrap();

    let rows = store.read_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].lead_id, "lead-1");
}

#[tokio::test]
async fn missing_file_is_recreated_on_read() {
    let dir = TempDir::new().unwrap();
    let store = csv_store(&dir);

    let rows = store.read_all().await.unwrap();
    assert!(rows.is_empty());
    assert!(store.csv_path().exists());
}

#[tokio::test]
async fn answers_with_commas_survive_the_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = csv_store(&dir);
    store.initialize().await.unwrap();

    store
        .upsert(
            "lead-1",
            "Alice",
            None,
            None,
            Some("software, hardware and \"cloud\""),
            LeadStatus::Secured,
        )
        .await
        .unwrap();

    let rows = store.read_all().await.unwrap();
    assert_eq!(
        rows[0].interest.as_deref(),
        Some("software, hardware and \"cloud\"")
    );
}

#[tokio::test]
async fn save_mirrors_the_in_memory_record() {
    let dir = TempDir::new().unwrap();
    let store = csv_store(&dir);
    store.initialize().await.unwrap();

    let mut record = LeadRecord::new("lead-1", "Alice");
    record.age = Some("30".to_string());
    record.status = LeadStatus::FollowedUp;
    store.save(&record).await.unwrap();

    assert_eq!(store.get("lead-1").unwrap().age.as_deref(), Some("30"));
    let rows = store.read_all().await.unwrap();
    assert_eq!(rows[0].age.as_deref(), Some("30"));
    assert_eq!(rows[0].status, LeadStatus::FollowedUp);
}

#[tokio::test]
async fn get_or_create_returns_the_same_record() {
    let dir = TempDir::new().unwrap();
    let store = csv_store(&dir);

    let first = store.get_or_create("lead-1", "Alice");
    let second = store.get_or_create("lead-1", "ignored-name");
    assert_eq!(second.name, "Alice");
    assert_eq!(first.lead_id, second.lead_id);
}

#[tokio::test]
async fn concurrent_upserts_serialize_cleanly() {
    // Writers for distinct leads must not interleave their
    // read-modify-rewrite cycles: every lead ends with exactly one row.
    let dir = TempDir::new().unwrap();
    let store = Arc::new(csv_store(&dir));
    store.initialize().await.unwrap();

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let lead_id = format!("lead-{}", i);
            for round in 0..4 {
                store
                    .upsert(
                        &lead_id,
                        "Lead",
                        Some(&round.to_string()),
                        None,
                        None,
                        LeadStatus::Pending,
                    )
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let rows = store.read_all().await.unwrap();
    assert_eq!(rows.len(), 16);
    for row in rows {
        assert_eq!(row.age.as_deref(), Some("3"));
    }
}
