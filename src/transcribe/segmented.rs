use crate::audio::{self, BatchRecognizer};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SegmentedTranscriberConfig {
    /// Recordings at or under this duration go to the recognizer whole.
    pub threshold: Duration,
    /// Duration of each exported slice.
    pub segment_duration: Duration,
    /// Where slice files are created (and promptly deleted).
    pub scratch_dir: PathBuf,
}

impl Default for SegmentedTranscriberConfig {
    fn default() -> Self {
        Self {
            threshold: Duration::from_secs(300), // 5 minutes
            segment_duration: Duration::from_secs(300),
            scratch_dir: std::env::temp_dir(),
        }
    }
}

/// Fallback for recognizers that reject long single requests.
///
/// Long recordings are split into sequential time-bounded slices, each
/// transcribed via the batch recognizer; non-empty results are joined with
/// newlines. Slice files are deleted the moment their transcription attempt
/// finishes, success or failure, so temporary storage stays bounded.
pub struct SegmentedTranscriber {
    recognizer: Arc<dyn BatchRecognizer>,
    config: SegmentedTranscriberConfig,
}

impl SegmentedTranscriber {
    pub fn new(recognizer: Arc<dyn BatchRecognizer>, config: SegmentedTranscriberConfig) -> Self {
        Self { recognizer, config }
    }

    pub async fn transcribe(&self, path: &Path) -> Result<String> {
        let total_secs = audio::probe_wav(path)?.duration_secs;

        if total_secs <= self.config.threshold.as_secs_f64() {
            let text = self.recognizer.transcribe_file(path).await?;
            return if text.trim().is_empty() {
                Err(Error::EmptyResult)
            } else {
                Ok(text)
            };
        }

        let segment_secs = self.config.segment_duration.as_secs_f64();
        let segment_count = (total_secs / segment_secs).ceil() as usize;

        info!(
            "Segmenting {} ({:.1}s) into {} slices of up to {:.0}s",
            path.display(),
            total_secs,
            segment_count,
            segment_secs
        );

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "recording".to_string());

        let mut parts: Vec<String> = Vec::new();

        for index in 0..segment_count {
            let start = index as f64 * segment_secs;
            let duration = segment_secs.min(total_secs - start);
            let slice_path = self
                .config
                .scratch_dir
                .join(format!("{}-part-{:03}.wav", stem, index));

            let export = {
                let source = path.to_path_buf();
                let dest = slice_path.clone();
                tokio::task::spawn_blocking(move || {
                    audio::export_slice(&source, start, duration, &dest)
                })
                .await
                .map_err(|e| Error::Audio(format!("segment export task failed: {e}")))?
            };

            if let Err(e) = export {
                // A gap in the middle of a meeting is worse than a failed
                // transcription; no partial concatenation.
                remove_slice(&slice_path);
                return Err(e);
            }

            let result = self.recognizer.transcribe_file(&slice_path).await;
            remove_slice(&slice_path);
            let text = result?;

            if !text.trim().is_empty() {
                parts.push(text.trim().to_string());
            }
        }

        if parts.is_empty() {
            return Err(Error::EmptyResult);
        }

        Ok(parts.join("\n"))
    }
}

fn remove_slice(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to delete temp slice {}: {}", path.display(), e);
        }
    }
}
