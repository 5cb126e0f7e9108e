use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meeting_scribe::{
    BatchRecognizer, Config, HttpObjectStore, HttpTranscriptionClient, JsonRecordStore,
    OrphanSweep, RemoteTranscriber, RemoteTranscriberConfig, SegmentedTranscriber,
    SegmentedTranscriberConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "meeting-scribe", version)]
struct Cli {
    /// Config file name, as understood by the config crate
    #[arg(long, default_value = "config/meeting-scribe")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe a finished recording through the remote job pipeline
    Transcribe { file: PathBuf },
    /// Transcribe a long recording in time-bounded segments
    Segmented { file: PathBuf },
    /// Create placeholder records for recordings that have none
    Sweep,
}

fn remote_transcriber(cfg: &Config) -> RemoteTranscriber {
    RemoteTranscriber::new(
        Arc::new(HttpTranscriptionClient::new(&cfg.remote)),
        Arc::new(HttpObjectStore::new(&cfg.remote)),
        RemoteTranscriberConfig {
            model: cfg.remote.model.clone(),
            poll_interval: cfg.remote.poll_interval(),
            max_poll_attempts: cfg.remote.max_poll_attempts,
        },
    )
}

/// Batch recognizer backed by the remote pipeline, so the segmented path
/// can run from the CLI without an on-device recognizer.
struct RemoteBatchRecognizer(RemoteTranscriber);

#[async_trait::async_trait]
impl BatchRecognizer for RemoteBatchRecognizer {
    async fn transcribe_file(&self, path: &Path) -> meeting_scribe::Result<String> {
        self.0
            .transcribe(path, &|_| {}, &CancellationToken::new())
            .await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    match cli.command {
        Command::Transcribe { file } => {
            let transcriber = remote_transcriber(&cfg);
            let text = transcriber
                .transcribe(
                    &file,
                    &|progress| info!("Transcription progress: {:.0}%", progress * 100.0),
                    &CancellationToken::new(),
                )
                .await
                .with_context(|| format!("Failed to transcribe {}", file.display()))?;
            println!("{}", text);
        }

        Command::Segmented { file } => {
            let recognizer = Arc::new(RemoteBatchRecognizer(remote_transcriber(&cfg)));
            let transcriber = SegmentedTranscriber::new(
                recognizer,
                SegmentedTranscriberConfig {
                    threshold: cfg.segmented.threshold(),
                    segment_duration: cfg.segmented.segment_duration(),
                    ..Default::default()
                },
            );
            let text = transcriber
                .transcribe(&file)
                .await
                .with_context(|| format!("Failed to transcribe {}", file.display()))?;
            println!("{}", text);
        }

        Command::Sweep => {
            let records_path = cfg.recording.records_path.to_string_lossy().into_owned();
            let store = Arc::new(
                JsonRecordStore::open(&cfg.recording.records_path)
                    .with_context(|| format!("Failed to open record store at {records_path}"))?,
            );
            let sweep = OrphanSweep::new(
                store,
                vec![cfg.recording.recordings_dir.clone()],
                cfg.recording.extension.clone(),
            );
            let report = sweep.run().await?;
            println!(
                "Scanned {} recordings, recovered {}",
                report.scanned,
                report.recovered.len()
            );
        }
    }

    Ok(())
}
