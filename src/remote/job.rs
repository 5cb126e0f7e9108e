use super::api::{ObjectStore, TaskStatus, TranscriptionApi};
use super::parse;
use crate::error::{Error, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Share of the overall progress budget consumed by the upload.
const UPLOAD_SHARE: f32 = 0.2;

#[derive(Debug, Clone)]
pub struct RemoteTranscriberConfig {
    pub model: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl Default for RemoteTranscriberConfig {
    fn default() -> Self {
        Self {
            model: "scribe-async-v1".to_string(),
            poll_interval: Duration::from_secs(3),
            max_poll_attempts: 60, // ~3 minutes at the default interval
        }
    }
}

/// One remote-orchestrator invocation, mutated by each poll round.
#[derive(Debug, Clone)]
pub struct TranscriptionJob {
    pub remote_url: String,
    pub task_id: String,
    pub status: TaskStatus,
    pub attempt: u32,
}

/// The "high accuracy" path: upload the finished recording, submit an
/// asynchronous job, poll to a terminal state, parse the result, and clean
/// up the temporary upload.
pub struct RemoteTranscriber {
    api: Arc<dyn TranscriptionApi>,
    objects: Arc<dyn ObjectStore>,
    config: RemoteTranscriberConfig,
}

impl RemoteTranscriber {
    pub fn new(
        api: Arc<dyn TranscriptionApi>,
        objects: Arc<dyn ObjectStore>,
        config: RemoteTranscriberConfig,
    ) -> Self {
        Self {
            api,
            objects,
            config,
        }
    }

    /// Transcribe a finished recording file.
    ///
    /// Retry policy belongs to the caller: upload and submit failures are
    /// fatal here, only polling retries (up to the attempt cap). Whatever
    /// the outcome, deletion of the uploaded object is scheduled exactly
    /// once on a detached task and never blocks the result.
    pub async fn transcribe(
        &self,
        file: &Path,
        on_progress: &(dyn Fn(f32) + Send + Sync),
        cancel: &CancellationToken,
    ) -> Result<String> {
        on_progress(0.0);

        let remote_url = self
            .objects
            .upload(file, &|p| on_progress(p * UPLOAD_SHARE))
            .await?;
        on_progress(UPLOAD_SHARE);

        let result = self.run_job(&remote_url, on_progress, cancel).await;

        self.schedule_cleanup(remote_url);

        result
    }

    async fn run_job(
        &self,
        remote_url: &str,
        on_progress: &(dyn Fn(f32) + Send + Sync),
        cancel: &CancellationToken,
    ) -> Result<String> {
        let submit = self.api.submit(remote_url, &self.config.model).await?;
        let task_id = parse::task_id(&submit)?;

        info!("Submitted transcription job {}", task_id);

        let mut job = TranscriptionJob {
            remote_url: remote_url.to_string(),
            task_id,
            status: TaskStatus::Pending,
            attempt: 0,
        };

        // Strictly sequential polls; the attempt cap is authoritative for
        // loop termination regardless of what statuses the service invents.
        while job.attempt < self.config.max_poll_attempts {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Job {} abandoned by caller", job.task_id);
                    return Err(Error::Cancelled);
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            job.attempt += 1;

            let poll = match self.api.poll(&job.task_id).await {
                Ok(poll) => poll,
                Err(e) => {
                    // Transient until the attempt cap says otherwise.
                    warn!(
                        "Poll for job {} failed (attempt {}): {}",
                        job.task_id, job.attempt, e
                    );
                    continue;
                }
            };

            job.status = parse::task_status(&poll);
            debug!(
                "Job {} attempt {}: {:?}",
                job.task_id, job.attempt, job.status
            );

            match job.status {
                TaskStatus::Succeeded => {
                    on_progress(1.0);
                    return parse::extract_transcript(&poll, self.api.as_ref()).await;
                }
                TaskStatus::Failed => {
                    return Err(Error::ServiceFailure(parse::failure_message(&poll)));
                }
                TaskStatus::Pending | TaskStatus::Running | TaskStatus::Unknown => {
                    on_progress(
                        UPLOAD_SHARE
                            + (1.0 - UPLOAD_SHARE) * job.attempt as f32
                                / self.config.max_poll_attempts as f32,
                    );
                }
            }
        }

        Err(Error::Timeout {
            attempts: self.config.max_poll_attempts,
        })
    }

    /// Best-effort deletion of the temp upload. Failure is logged and
    /// swallowed; a successful transcript is never failed over cleanup.
    fn schedule_cleanup(&self, remote_url: String) {
        let objects = Arc::clone(&self.objects);

        tokio::spawn(async move {
            if let Err(e) = objects.delete(&remote_url).await {
                warn!("Failed to delete temp upload {}: {}", remote_url, e);
            } else {
                debug!("Deleted temp upload {}", remote_url);
            }
        });
    }
}
