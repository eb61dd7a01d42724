use crate::errors::AppError;
use crate::models::{LeadRecord, LeadRow, LeadStatus};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex as StdMutex;
use tokio::sync::Mutex;

/// Durable store of lead state: an in-memory map of [`LeadRecord`]s plus a
/// CSV mirror holding one row per lead ever seen.
///
/// The CSV is rewritten whole on every update under an exclusive lock, so
/// no two writers can interleave their read-modify-write cycle. That is
/// O(total leads) per update and acceptable only at small scale; an
/// append-only log with compaction is the upgrade path and out of scope.
pub struct LeadStore {
    csv_path: PathBuf,
    /// Shared lead map; guarded separately from the file so reads never
    /// wait on a file rewrite.
    leads: StdMutex<HashMap<String, LeadRecord>>,
    /// Serializes every read-modify-rewrite cycle on the CSV.
    csv_lock: Mutex<()>,
}

impl LeadStore {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            leads: StdMutex::new(HashMap::new()),
            csv_lock: Mutex::new(()),
        }
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    // ============ CSV Mirror ============

    /// Creates the backing CSV with its header row if it does not exist.
    /// Idempotent; a no-op when the file is already present.
    pub async fn initialize(&self) -> Result<(), AppError> {
        let _guard = self.csv_lock.lock().await;
        create_with_header(&self.csv_path)
    }

    /// Inserts or updates the row for `lead_id`.
    ///
    /// Holds the file lock for the whole read-modify-rewrite cycle.
    /// Non-empty arguments replace the stored values; `None` or empty
    /// arguments preserve whatever the row already holds. `status` is
    /// always written. Appends a new row when `lead_id` is unseen.
    ///
    /// A missing backing file is recovered by re-creating it and treating
    /// the existing state as empty; any other I/O failure propagates.
    pub async fn upsert(
        &self,
        lead_id: &str,
        name: &str,
        age: Option<&str>,
        country: Option<&str>,
        interest: Option<&str>,
        status: LeadStatus,
    ) -> Result<(), AppError> {
        let _guard = self.csv_lock.lock().await;

        let mut rows = read_rows_or_recover(&self.csv_path)?;

        let mut updated = false;
        for row in &mut rows {
            if row.lead_id == lead_id {
                if !name.is_empty() {
                    row.name = name.to_string();
                }
                merge_field(&mut row.age, age);
                merge_field(&mut row.country, country);
                merge_field(&mut row.interest, interest);
                row.status = status;
                updated = true;
                break;
            }
        }

        if !updated {
            rows.push(LeadRow {
                lead_id: lead_id.to_string(),
                name: name.to_string(),
                age: age.filter(|s| !s.is_empty()).map(str::to_string),
                country: country.filter(|s| !s.is_empty()).map(str::to_string),
                interest: interest.filter(|s| !s.is_empty()).map(str::to_string),
                status,
            });
        }

        write_rows(&self.csv_path, &rows)?;
        tracing::debug!("Upserted lead {} with status {}", lead_id, status);
        Ok(())
    }

    /// Reads every row currently in the backing file.
    pub async fn read_all(&self) -> Result<Vec<LeadRow>, AppError> {
        let _guard = self.csv_lock.lock().await;
        read_rows_or_recover(&self.csv_path)
    }

    // ============ In-memory Map ============

    /// Snapshot of the record for `lead_id`, if one exists.
    pub fn get(&self, lead_id: &str) -> Option<LeadRecord> {
        self.lock_leads().get(lead_id).cloned()
    }

    /// Returns the record for `lead_id`, creating a fresh one
    /// (step=Consent, status=Pending) on first contact.
    pub fn get_or_create(&self, lead_id: &str, name: &str) -> LeadRecord {
        self.lock_leads()
            .entry(lead_id.to_string())
            .or_insert_with(|| {
                tracing::info!("New lead {} ({})", lead_id, name);
                LeadRecord::new(lead_id, name)
            })
            .clone()
    }

    /// Stores `record` in the map and mirrors it to the CSV, so the file
    /// reflects the latest known state after every mutation.
    pub async fn save(&self, record: &LeadRecord) -> Result<(), AppError> {
        self.lock_leads()
            .insert(record.lead_id.clone(), record.clone());
        self.upsert(
            &record.lead_id,
            &record.name,
            record.age.as_deref(),
            record.country.as_deref(),
            record.interest.as_deref(),
            record.status,
        )
        .await
    }

    fn lock_leads(&self) -> std::sync::MutexGuard<'_, HashMap<String, LeadRecord>> {
        // A panicked holder cannot leave the map half-mutated (inserts are
        // whole-record), so poisoning is recoverable.
        self.leads.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Replaces `field` when the update carries a non-empty value.
fn merge_field(field: &mut Option<String>, update: Option<&str>) {
    if let Some(value) = update {
        if !value.is_empty() {
            *field = Some(value.to_string());
        }
    }
}

fn create_with_header(path: &Path) -> Result<(), AppError> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => {
            let mut writer = csv::Writer::from_writer(file);
            writer.write_record(["lead_id", "name", "age", "country", "interest", "status"])?;
            writer.flush().map_err(AppError::StorageError)?;
            tracing::info!("Created leads CSV at {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(AppError::StorageError(e)),
    }
}

fn read_rows_or_recover(path: &Path) -> Result<Vec<LeadRow>, AppError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("Leads CSV missing at {}; re-creating", path.display());
            create_with_header(path)?;
            return Ok(Vec::new());
        }
        Err(e) => return Err(AppError::StorageError(e)),
    };

    let mut reader = csv::Reader::from_reader(file);
    let mut rows = Vec::new();
    for row in reader.deserialize::<LeadRow>() {
        rows.push(row?);
    }
    Ok(rows)
}

fn write_rows(path: &Path, rows: &[LeadRow]) -> Result<(), AppError> {
    // The header is written by hand so it survives a rewrite with zero
    // rows; automatic headers only appear alongside a first record.
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(["lead_id", "name", "age", "country", "interest", "status"])?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(AppError::StorageError)?;
    Ok(())
}
