// Integration tests for the JSON-file record store.

use chrono::Utc;
use meeting_scribe::{Error, JsonRecordStore, NewMeetingRecord, RecordStore};
use std::path::PathBuf;
use tempfile::TempDir;

fn record(path: &str) -> NewMeetingRecord {
    NewMeetingRecord {
        title: "Standup".to_string(),
        transcript: "we talked".to_string(),
        audio_path: PathBuf::from(path),
        created_at: Utc::now(),
        duration_secs: 120.0,
    }
}

#[tokio::test]
async fn records_survive_a_reopen() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("records.json");

    let store = JsonRecordStore::open(&store_path).unwrap();
    let id = store.create_record(record("/tmp/a.wav")).await.unwrap();
    store.create_record(record("/tmp/b.wav")).await.unwrap();

    drop(store);

    let reopened = JsonRecordStore::open(&store_path).unwrap();
    let records = reopened.records().await;
    assert_eq!(records.len(), 2);
    assert!(records.iter().any(|r| r.id == id));

    let known = reopened.known_audio_paths().await.unwrap();
    assert!(known.contains(&PathBuf::from("/tmp/a.wav")));
    assert!(known.contains(&PathBuf::from("/tmp/b.wav")));
}

#[tokio::test]
async fn a_second_record_for_the_same_audio_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = JsonRecordStore::open(dir.path().join("records.json")).unwrap();

    store.create_record(record("/tmp/same.wav")).await.unwrap();
    let err = store.create_record(record("/tmp/same.wav")).await.unwrap_err();

    assert!(matches!(err, Error::Persistence { .. }));
    assert_eq!(store.records().await.len(), 1);
}

#[tokio::test]
async fn opening_a_missing_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonRecordStore::open(dir.path().join("fresh.json")).unwrap();
    assert!(store.known_audio_paths().await.unwrap().is_empty());
}
