use super::{MeetingRecord, NewMeetingRecord, RecordId, RecordStore};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// In-memory record store. Used by tests and for sweeps that should not
/// touch a backing file.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<MeetingRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a record, e.g. to mark an audio path as already persisted.
    pub async fn insert_existing(&self, record: NewMeetingRecord) -> RecordId {
        let record = record.into_record();
        let id = record.id;
        self.records.lock().await.push(record);
        id
    }

    pub async fn records(&self) -> Vec<MeetingRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryRecordStore {
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
        records.push(record);
        Ok(id)
    }

    async fn known_audio_paths(&self) -> Result<HashSet<PathBuf>> {
        let records = self.records.lock().await;
        Ok(records.iter().map(|r| r.audio_path.clone()).collect())
    }
}
