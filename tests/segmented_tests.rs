// Integration tests for the segmented transcription fallback.
//
// Fixtures are tiny WAV files written at a low sample rate so a "12 minute"
// recording stays a few kilobytes.

use meeting_scribe::audio::probe_wav;
use meeting_scribe::{BatchRecognizer, Error, SegmentedTranscriber, SegmentedTranscriberConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Mutex;

const SAMPLE_RATE: u32 = 100;

fn write_wav(path: &Path, duration_secs: u64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..(duration_secs * SAMPLE_RATE as u64) {
        writer.write_sample((i % 128) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Batch recognizer that records the duration of every slice it receives
/// and replays scripted results per call.
struct ScriptedRecognizer {
    results: Vec<meeting_scribe::Result<String>>,
    calls: Mutex<Vec<(PathBuf, f64)>>,
}

impl ScriptedRecognizer {
    fn new(results: Vec<meeting_scribe::Result<String>>) -> Self {
        Self {
            results,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl BatchRecognizer for ScriptedRecognizer {
    async fn transcribe_file(&self, path: &Path) -> meeting_scribe::Result<String> {
        let duration = probe_wav(path).unwrap().duration_secs;
        let mut calls = self.calls.lock().await;
        let index = calls.len();
        calls.push((path.to_path_buf(), duration));

        match self.results.get(index) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(_)) => Err(Error::Audio("scripted recognizer failure".to_string())),
            None => Ok(String::new()),
        }
    }
}

fn config(dir: &TempDir) -> SegmentedTranscriberConfig {
    SegmentedTranscriberConfig {
        threshold: Duration::from_secs(300),
        segment_duration: Duration::from_secs(300),
        scratch_dir: dir.path().to_path_buf(),
    }
}

fn remaining_wavs(dir: &Path, source: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path() != source)
        .filter(|e| e.path().extension().map(|x| x == "wav").unwrap_or(false))
        .count()
}

#[tokio::test]
async fn twelve_minutes_split_into_three_segments() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("long-meeting.wav");
    write_wav(&source, 720); // 12 minutes

    let recognizer = Arc::new(ScriptedRecognizer::new(vec![
        Ok("part one".to_string()),
        Ok("part two".to_string()),
        Ok("part three".to_string()),
    ]));
    let transcriber = SegmentedTranscriber::new(recognizer.clone(), config(&dir));

    let text = transcriber.transcribe(&source).await.unwrap();
    assert_eq!(text, "part one\npart two\npart three");

    // 5 + 5 + 2 minutes.
    let calls = recognizer.calls.lock().await;
    assert_eq!(calls.len(), 3);
    assert!((calls[0].1 - 300.0).abs() < 0.1, "got {}", calls[0].1);
    assert!((calls[1].1 - 300.0).abs() < 0.1, "got {}", calls[1].1);
    assert!((calls[2].1 - 120.0).abs() < 0.1, "got {}", calls[2].1);

    // Every temporary slice was deleted.
    assert_eq!(remaining_wavs(dir.path(), &source), 0);
}

#[tokio::test]
async fn short_recordings_are_not_segmented() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("short.wav");
    write_wav(&source, 60);

    let recognizer = Arc::new(ScriptedRecognizer::new(vec![Ok("whole thing".to_string())]));
    let transcriber = SegmentedTranscriber::new(recognizer.clone(), config(&dir));

    let text = transcriber.transcribe(&source).await.unwrap();
    assert_eq!(text, "whole thing");

    let calls = recognizer.calls.lock().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, source);
}

#[tokio::test]
async fn middle_segment_failure_fails_the_whole_operation() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("long-meeting.wav");
    write_wav(&source, 720);

    let recognizer = Arc::new(ScriptedRecognizer::new(vec![
        Ok("part one".to_string()),
        Err(Error::Audio("boom".to_string())),
    ]));
    let transcriber = SegmentedTranscriber::new(recognizer.clone(), config(&dir));

    // No partial 2-of-3 concatenation comes back.
    let err = transcriber.transcribe(&source).await.unwrap_err();
    assert!(matches!(err, Error::Audio(_)));

    let calls = recognizer.calls.lock().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(remaining_wavs(dir.path(), &source), 0);
}

#[tokio::test]
async fn all_empty_segments_are_an_empty_result() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("silent.wav");
    write_wav(&source, 720);

    let recognizer = Arc::new(ScriptedRecognizer::new(vec![
        Ok(String::new()),
        Ok("   ".to_string()),
        Ok(String::new()),
    ]));
    let transcriber = SegmentedTranscriber::new(recognizer, config(&dir));

    let err = transcriber.transcribe(&source).await.unwrap_err();
    assert!(matches!(err, Error::EmptyResult));
}

#[tokio::test]
async fn empty_segments_are_skipped_in_the_join() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("patchy.wav");
    write_wav(&source, 720);

    let recognizer = Arc::new(ScriptedRecognizer::new(vec![
        Ok("spoken".to_string()),
        Ok(String::new()),
        Ok("more speech".to_string()),
    ]));
    let transcriber = SegmentedTranscriber::new(recognizer, config(&dir));

    let text = transcriber.transcribe(&source).await.unwrap();
    assert_eq!(text, "spoken\nmore speech");
}
