//! Durable meeting-record storage
//!
//! The recorder only needs two things from a store: inserting a finished
//! record and listing which audio paths are already accounted for (the
//! orphan sweep's membership test). Everything else about storage is the
//! collaborator's business.

mod json;
mod memory;

pub use json::JsonRecordStore;
pub use memory::MemoryRecordStore;

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

pub type RecordId = uuid::Uuid;

/// A durable meeting record. `audio_path` identifies at most one record;
/// stores must reject a second insert for the same path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub id: RecordId,
    pub title: String,
    pub transcript: String,
    pub audio_path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub duration_secs: f64,
}

/// Insert payload for a record that does not have an id yet.
#[derive(Debug, Clone)]
pub struct NewMeetingRecord {
    pub title: String,
    pub transcript: String,
    pub audio_path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub duration_secs: f64,
}

impl NewMeetingRecord {
    fn into_record(self) -> MeetingRecord {
        MeetingRecord {
            id: RecordId::new_v4(),
            title: self.title,
            transcript: self.transcript,
            audio_path: self.audio_path,
            created_at: self.created_at,
            duration_secs: self.duration_secs,
        }
    }
}

#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a record and return its generated id.
    async fn create_record(&self, record: NewMeetingRecord) -> Result<RecordId>;

    /// Audio paths already referenced by durable records.
    async fn known_audio_paths(&self) -> Result<HashSet<PathBuf>>;
}
