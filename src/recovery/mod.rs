//! Orphan-recording recovery
//!
//! A persistence failure or abnormal termination can leave a finished audio
//! file on disk with no durable record. This startup sweep reconciles them:
//! any recording-extension file not referenced by an existing record gets a
//! placeholder record with an empty transcript and a timestamp-derived
//! title. Membership is keyed on the audio path, which makes the sweep
//! idempotent.

use crate::audio;
use crate::error::Result;
use crate::store::{NewMeetingRecord, RecordId, RecordStore};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct SweepReport {
    /// Recording files seen on disk.
    pub scanned: usize,
    /// Placeholder records created this run.
    pub recovered: Vec<(RecordId, PathBuf)>,
}

pub struct OrphanSweep {
    store: Arc<dyn RecordStore>,
    directories: Vec<PathBuf>,
    extension: String,
}

impl OrphanSweep {
    pub fn new(store: Arc<dyn RecordStore>, directories: Vec<PathBuf>, extension: String) -> Self {
        Self {
            store,
            directories,
            extension,
        }
    }

    pub async fn run(&self) -> Result<SweepReport> {
        let known = self.store.known_audio_paths().await?;
        let mut report = SweepReport::default();

        for dir in &self.directories {
            if !dir.is_dir() {
                continue;
            }

            let mut entries = tokio::fs::read_dir(dir).await?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();

                let matches_extension = path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case(self.extension.as_str()))
                    .unwrap_or(false);
                if !matches_extension {
                    continue;
                }

                report.scanned += 1;

                if known.contains(&path) {
                    continue;
                }

                // Best-effort probe: an unreadable or damaged file still
                // deserves a record, just with a zero duration.
                let (duration_secs, created_at) = match audio::probe_wav(&path) {
                    Ok(probe) => (probe.duration_secs, probe.created_at),
                    Err(e) => {
                        warn!("Could not probe {}: {}", path.display(), e);
                        (0.0, audio::file_created_at(&path))
                    }
                };

                let record = NewMeetingRecord {
                    title: format!("Recovered recording {}", created_at.format("%Y-%m-%d %H:%M")),
                    transcript: String::new(),
                    audio_path: path.clone(),
                    created_at: Utc::now(),
                    duration_secs,
                };

                let id = self.store.create_record(record).await?;
                info!("Recovered orphan recording {}", path.display());
                report.recovered.push((id, path));
            }
        }

        info!(
            "Orphan sweep complete: {} files scanned, {} recovered",
            report.scanned,
            report.recovered.len()
        );

        Ok(report)
    }
}
