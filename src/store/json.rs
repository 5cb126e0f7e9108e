use super::{MeetingRecord, NewMeetingRecord, RecordId, RecordStore};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

/// Record store backed by a single JSON file.
///
/// Good enough for a local device library: the whole record list is read at
/// open and rewritten on every insert.
pub struct JsonRecordStore {
    path: PathBuf,
    records: Mutex<Vec<MeetingRecord>>,
}

impl JsonRecordStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let records = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            Vec::new()
        };

        info!(
            "Opened record store at {} ({} records)",
            path.display(),
            records.len()
        );

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub async fn records(&self) -> Vec<MeetingRecord> {
        self.records.lock().await.clone()
    }

    fn persist(&self, records: &[MeetingRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for JsonRecordStore {
    async fn create_record(&self, record: NewMeetingRecord) -> Result<RecordId> {
        let mut records = self.records.lock().await;

        if records.iter().any(|r| r.audio_path == record.audio_path) {
            return Err(Error::Persistence {
                audio_path: record.audio_path,
                reason: "a record for this audio path already exists".to_string(),
            });
        }

        let record = record.into_record();
        let id = record.id;
        let audio_path = record.audio_path.clone();
        records.push(record);

        if let Err(e) = self.persist(&records) {
            // Roll back the in-memory insert so a retry can succeed.
            records.pop();
            return Err(Error::Persistence {
                audio_path,
                reason: e.to_string(),
            });
        }

        Ok(id)
    }

    async fn known_audio_paths(&self) -> Result<HashSet<PathBuf>> {
        let records = self.records.lock().await;
        Ok(records.iter().map(|r| r.audio_path.clone()).collect())
    }
}
