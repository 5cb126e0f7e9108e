use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub recording: RecordingConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub segmented: SegmentedConfig,
    #[serde(default)]
    pub reporter: ReporterConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Directory that holds finished recordings
    pub recordings_dir: PathBuf,
    /// File extension for recordings (also the orphan-sweep filter)
    pub extension: String,
    /// JSON record store used by the CLI
    pub records_path: PathBuf,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            recordings_dir: PathBuf::from("recordings"),
            extension: "wav".to_string(),
            records_path: PathBuf::from("recordings/records.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the asynchronous transcription service
    pub base_url: String,
    /// Optional bearer token
    pub api_key: Option<String>,
    /// Model name sent with each submit request
    pub model: String,
    /// Seconds between status polls
    pub poll_interval_secs: u64,
    /// Hard cap on status polls before the job counts as timed out
    pub max_poll_attempts: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/v1".to_string(),
            api_key: None,
            model: "scribe-async-v1".to_string(),
            poll_interval_secs: 3,
            max_poll_attempts: 60, // ~3 minutes at 3s per poll
        }
    }
}

impl RemoteConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SegmentedConfig {
    /// Recordings longer than this are split before batch transcription
    pub threshold_secs: u64,
    /// Duration of each exported segment
    pub segment_secs: u64,
}

impl Default for SegmentedConfig {
    fn default() -> Self {
        Self {
            threshold_secs: 300, // 5 minutes
            segment_secs: 300,
        }
    }
}

impl SegmentedConfig {
    pub fn threshold(&self) -> Duration {
        Duration::from_secs(self.threshold_secs)
    }

    pub fn segment_duration(&self) -> Duration {
        Duration::from_secs(self.segment_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Milliseconds between live-progress snapshots
    pub tick_ms: u64,
    /// Grace period before the progress surface is asked to dismiss
    pub dismiss_grace_secs: u64,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            tick_ms: 500,
            dismiss_grace_secs: 2,
        }
    }
}

impl ReporterConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn dismiss_grace(&self) -> Duration {
        Duration::from_secs(self.dismiss_grace_secs)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
