// Integration tests for the orphan-recording sweep.

use chrono::Utc;
use meeting_scribe::{MemoryRecordStore, NewMeetingRecord, OrphanSweep};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write_wav(path: &Path, duration_secs: u64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..(duration_secs * 100) {
        writer.write_sample((i % 64) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn sweep(store: &Arc<MemoryRecordStore>, dir: &TempDir) -> OrphanSweep {
    OrphanSweep::new(
        store.clone(),
        vec![dir.path().to_path_buf()],
        "wav".to_string(),
    )
}

#[tokio::test]
async fn unreferenced_recordings_get_placeholder_records() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryRecordStore::new());

    let known = dir.path().join("known.wav");
    let orphan = dir.path().join("orphan.wav");
    write_wav(&known, 30);
    write_wav(&orphan, 45);
    std::fs::write(dir.path().join("notes.txt"), "not audio").unwrap();

    store
        .insert_existing(NewMeetingRecord {
            title: "Already saved".to_string(),
            transcript: "text".to_string(),
            audio_path: known.clone(),
            created_at: Utc::now(),
            duration_secs: 30.0,
        })
        .await;

    let report = sweep(&store, &dir).run().await.unwrap();

    assert_eq!(report.scanned, 2); // the .txt file is ignored
    assert_eq!(report.recovered.len(), 1);
    assert_eq!(report.recovered[0].1, orphan);

    let records = store.records().await;
    assert_eq!(records.len(), 2);

    let placeholder = records.iter().find(|r| r.audio_path == orphan).unwrap();
    assert!(placeholder.transcript.is_empty());
    assert!(placeholder.title.starts_with("Recovered recording "));
    assert!((placeholder.duration_secs - 45.0).abs() < 0.1);
}

#[tokio::test]
async fn sweeping_twice_creates_nothing_new() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryRecordStore::new());

    write_wav(&dir.path().join("a.wav"), 10);
    write_wav(&dir.path().join("b.wav"), 20);

    let first = sweep(&store, &dir).run().await.unwrap();
    assert_eq!(first.recovered.len(), 2);

    let second = sweep(&store, &dir).run().await.unwrap();
    assert_eq!(second.recovered.len(), 0);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn unreadable_files_are_recovered_with_zero_duration() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryRecordStore::new());

    // Right extension, but not WAV data: the probe fails and the duration
    // is clamped to zero rather than the file being skipped.
    std::fs::write(dir.path().join("damaged.wav"), b"not a riff header").unwrap();

    let report = sweep(&store, &dir).run().await.unwrap();
    assert_eq!(report.recovered.len(), 1);

    let records = store.records().await;
    assert_eq!(records[0].duration_secs, 0.0);
    assert!(records[0].transcript.is_empty());
}

#[tokio::test]
async fn missing_directories_are_skipped() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryRecordStore::new());

    let sweep = OrphanSweep::new(
        store.clone(),
        vec![
            dir.path().join("does-not-exist"),
            dir.path().to_path_buf(),
        ],
        "wav".to_string(),
    );

    let report = sweep.run().await.unwrap();
    assert_eq!(report.scanned, 0);
    assert!(store.is_empty().await);
}
