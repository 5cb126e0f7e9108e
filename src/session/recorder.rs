use super::reporter::{ProgressSnapshot, ProgressSurface, TRANSCRIPT_PLACEHOLDER};
use super::state::{PauseOrigin, RecorderState};
use super::transcript::TranscriptAccumulator;
use crate::audio::{AudioSessionHandle, PermissionGate, RecognizerUpdate};
use crate::error::{Capability, Error, Result};
use crate::store::{NewMeetingRecord, RecordId, RecordStore};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Where session files are created
    pub recordings_dir: PathBuf,
    /// Recording file extension
    pub extension: String,
    /// Live-progress tick interval
    pub tick: Duration,
    /// Grace period before the surface is asked to dismiss
    pub dismiss_grace: Duration,
    /// Whether live transcript text is observable on the surface; some
    /// callers want recording without live text
    pub publish_live_transcript: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            recordings_dir: PathBuf::from("recordings"),
            extension: "wav".to_string(),
            tick: Duration::from_millis(500),
            dismiss_grace: Duration::from_secs(2),
            publish_live_transcript: true,
        }
    }
}

impl RecorderConfig {
    /// Recorder settings drawn from the application config.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            recordings_dir: config.recording.recordings_dir.clone(),
            extension: config.recording.extension.clone(),
            tick: config.reporter.tick(),
            dismiss_grace: config.reporter.dismiss_grace(),
            publish_live_transcript: true,
        }
    }
}

/// Everything stop() hands back, persisted or not. On a persistence failure
/// the audio path travels in the error instead, so the file is never lost
/// track of.
#[derive(Debug, Clone)]
pub struct StoppedRecording {
    pub record_id: RecordId,
    pub audio_path: PathBuf,
    pub duration: Duration,
    pub transcript: String,
}

/// Per-session state, created on start and destroyed on stop or abandonment.
struct SessionData {
    started_at: DateTime<Utc>,
    elapsed: Duration,
    transcript: TranscriptAccumulator,
    audio_path: PathBuf,
    pause_origin: Option<PauseOrigin>,
    /// Bumped on every recognizer restart; a consumer task for an older
    /// stream sees the mismatch and exits instead of writing stale text.
    stream_epoch: u64,
}

struct Inner {
    state: RecorderState,
    handle: Box<dyn AudioSessionHandle>,
    session: Option<SessionData>,
}

/// The recording lifecycle state machine.
///
/// All mutation flows through one `Mutex<Inner>` shared with the
/// recognizer-update consumer and the progress tick, so transitions within a
/// session are totally ordered and `liveTranscript` has a single writer at
/// a time. Collaborators are injected; there is no ambient global state.
#[derive(Clone)]
pub struct Recorder {
    config: Arc<RecorderConfig>,
    permissions: Arc<dyn PermissionGate>,
    surface: Arc<dyn ProgressSurface>,
    store: Option<Arc<dyn RecordStore>>,
    inner: Arc<Mutex<Inner>>,
}

impl Recorder {
    pub fn new(
        config: RecorderConfig,
        handle: Box<dyn AudioSessionHandle>,
        permissions: Arc<dyn PermissionGate>,
        surface: Arc<dyn ProgressSurface>,
        store: Option<Arc<dyn RecordStore>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            permissions,
            surface,
            store,
            inner: Arc::new(Mutex::new(Inner {
                state: RecorderState::Idle,
                handle,
                session: None,
            })),
        }
    }

    /// Start a new recording session.
    ///
    /// Requires both capability grants up front; a denial leaves the machine
    /// idle with no partial side effects (the audio handle is never opened).
    /// Calling start outside idle is a logged no-op.
    pub async fn start(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;

        if inner.state != RecorderState::Idle {
            warn!("start() ignored: recorder is {}", inner.state.name());
            return Ok(());
        }

        for capability in [Capability::Microphone, Capability::SpeechRecognition] {
            if !self.permissions.request(capability).await {
                return Err(Error::CapabilityDenied(capability));
            }
        }

        std::fs::create_dir_all(&self.config.recordings_dir)?;
        let audio_path = self.config.recordings_dir.join(format!(
            "recording-{}.{}",
            Utc::now().format("%Y%m%d-%H%M%S%3f"),
            self.config.extension
        ));

        let updates = inner.handle.start(&audio_path).await?;

        inner.state = RecorderState::Recording;
        inner.session = Some(SessionData {
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            transcript: TranscriptAccumulator::new(),
            audio_path: audio_path.clone(),
            pause_origin: None,
            stream_epoch: 0,
        });
        drop(inner);

        self.spawn_update_consumer(updates, 0);
        self.spawn_reporter();

        self.surface
            .publish(ProgressSnapshot::new(
                TRANSCRIPT_PLACEHOLDER.to_string(),
                Duration::ZERO,
                RecorderState::Recording,
            ))
            .await;

        info!("Recording started: {}", audio_path.display());
        Ok(())
    }

    /// Pause a running session (user-initiated). No-op outside recording.
    pub async fn pause(&self) {
        self.pause_with(PauseOrigin::Manual).await;
    }

    /// Pause with an explicit origin so the matching system signal can later
    /// decide whether auto-resume is allowed.
    pub async fn pause_with(&self, origin: PauseOrigin) {
        let mut inner = self.inner.lock().await;

        if inner.state != RecorderState::Recording {
            debug!("pause() ignored: recorder is {}", inner.state.name());
            return;
        }

        if let Err(e) = inner.handle.pause().await {
            warn!("Failed to suspend audio session: {}", e);
        }

        inner.state = RecorderState::Paused;

        let snapshot = if let Some(session) = inner.session.as_mut() {
            // Retain the in-flight partial verbatim so a resumed recognizer
            // appends to it rather than restarting the transcript.
            session.transcript.commit_live();
            session.pause_origin = Some(origin);
            Some(ProgressSnapshot::new(
                self.surface_text(session),
                session.elapsed,
                RecorderState::Paused,
            ))
        } else {
            None
        };
        drop(inner);

        if let Some(snapshot) = snapshot {
            self.surface.publish(snapshot).await;
        }

        info!("Recording paused ({:?})", origin);
    }

    /// Resume a paused session. No-op outside paused.
    pub async fn resume(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        self.resume_locked(&mut inner).await
    }

    /// Resume only if the current pause was caused by `origin`. This is how
    /// interruption-ended avoids resuming a session the user paused by hand.
    pub async fn resume_if(&self, origin: PauseOrigin) -> Result<()> {
        let mut inner = self.inner.lock().await;

        let origin_matches = inner.state == RecorderState::Paused
            && inner
                .session
                .as_ref()
                .map(|s| s.pause_origin == Some(origin))
                .unwrap_or(false);

        if !origin_matches {
            debug!("Conditional resume ({:?}) skipped", origin);
            return Ok(());
        }

        self.resume_locked(&mut inner).await
    }

    async fn resume_locked(&self, inner: &mut Inner) -> Result<()> {
        if inner.state != RecorderState::Paused {
            debug!("resume() ignored: recorder is {}", inner.state.name());
            return Ok(());
        }

        // A restarted recognizer begins a new partial stream; the retained
        // transcript stays committed and new output is appended to it.
        let updates = inner.handle.resume().await?;

        inner.state = RecorderState::Recording;

        let epoch = match inner.session.as_mut() {
            Some(session) => {
                session.pause_origin = None;
                session.stream_epoch += 1;
                session.stream_epoch
            }
            None => return Ok(()),
        };

        self.spawn_update_consumer(updates, epoch);

        info!("Recording resumed");
        Ok(())
    }

    /// Finalize the session and persist a record exactly once.
    ///
    /// Capture is finalized even when persistence fails; the error then
    /// carries the local audio path so the caller can retry persistence or
    /// leave the file to the orphan sweep.
    pub async fn stop(&self) -> Result<StoppedRecording> {
        let mut inner = self.inner.lock().await;

        if !inner.state.is_active() {
            return Err(Error::InvalidTransition {
                from: inner.state.name(),
                op: "stop",
            });
        }

        if let Err(e) = inner.handle.finalize().await {
            warn!("Failed to finalize audio session cleanly: {}", e);
        }

        inner.state = RecorderState::Stopped;

        let mut session = match inner.session.take() {
            Some(session) => session,
            None => {
                return Err(Error::InvalidTransition {
                    from: "stopped",
                    op: "stop",
                })
            }
        };
        drop(inner);

        session.transcript.commit_live();

        let transcript = session.transcript.snapshot();
        let duration = session.elapsed;
        let audio_path = session.audio_path.clone();

        self.surface
            .publish(ProgressSnapshot::terminal(
                self.surface_text(&session),
                duration,
            ))
            .await;
        self.surface.dismiss(self.config.dismiss_grace).await;

        let record = NewMeetingRecord {
            title: derive_title(session.started_at),
            transcript: transcript.clone(),
            audio_path: audio_path.clone(),
            created_at: Utc::now(),
            duration_secs: duration.as_secs_f64(),
        };

        let record_id = match &self.store {
            Some(store) => match store.create_record(record).await {
                Ok(id) => id,
                Err(e @ Error::Persistence { .. }) => return Err(e),
                Err(e) => {
                    return Err(Error::Persistence {
                        audio_path,
                        reason: e.to_string(),
                    })
                }
            },
            None => {
                return Err(Error::Persistence {
                    audio_path,
                    reason: "no record store configured; audio kept for orphan recovery"
                        .to_string(),
                })
            }
        };

        info!(
            "Recording stopped: {} ({:.1}s, record {})",
            audio_path.display(),
            duration.as_secs_f64(),
            record_id
        );

        Ok(StoppedRecording {
            record_id,
            audio_path,
            duration,
            transcript,
        })
    }

    /// Termination safety net, usable from a process-teardown handler.
    ///
    /// Finalizes the sink synchronously and fires persistence on a detached
    /// task. Never awaits; if persistence cannot even be attempted the file
    /// stays on disk for the orphan sweep.
    pub fn emergency_finalize(&self) {
        let mut inner = match self.inner.try_lock() {
            Ok(inner) => inner,
            Err(_) => {
                warn!("Emergency finalize skipped: a transition is in flight");
                return;
            }
        };

        if !inner.state.is_active() {
            return;
        }

        inner.handle.finalize_blocking();
        inner.state = RecorderState::Stopped;

        let mut session = match inner.session.take() {
            Some(session) => session,
            None => return,
        };
        drop(inner);

        session.transcript.commit_live();

        let record = NewMeetingRecord {
            title: derive_title(session.started_at),
            transcript: session.transcript.snapshot(),
            audio_path: session.audio_path.clone(),
            created_at: Utc::now(),
            duration_secs: session.elapsed.as_secs_f64(),
        };
        let audio_path = session.audio_path;

        match (self.store.clone(), tokio::runtime::Handle::try_current()) {
            (Some(store), Ok(rt)) => {
                rt.spawn(async move {
                    if let Err(e) = store.create_record(record).await {
                        warn!(
                            "Emergency persistence failed for {}: {} (orphan sweep will reconcile)",
                            audio_path.display(),
                            e
                        );
                    }
                });
            }
            _ => {
                warn!(
                    "Recording kept at {} for orphan recovery",
                    audio_path.display()
                );
            }
        }

        info!("Emergency finalize complete");
    }

    pub async fn state(&self) -> RecorderState {
        self.inner.lock().await.state
    }

    pub async fn live_transcript(&self) -> Option<String> {
        let inner = self.inner.lock().await;
        inner.session.as_ref().map(|s| s.transcript.snapshot())
    }

    pub async fn elapsed(&self) -> Duration {
        let inner = self.inner.lock().await;
        inner
            .session
            .as_ref()
            .map(|s| s.elapsed)
            .unwrap_or(Duration::ZERO)
    }

    pub async fn audio_path(&self) -> Option<PathBuf> {
        let inner = self.inner.lock().await;
        inner.session.as_ref().map(|s| s.audio_path.clone())
    }

    fn surface_text(&self, session: &SessionData) -> String {
        if self.config.publish_live_transcript && !session.transcript.is_empty() {
            session.transcript.snapshot()
        } else {
            TRANSCRIPT_PLACEHOLDER.to_string()
        }
    }

    fn spawn_update_consumer(&self, mut updates: mpsc::Receiver<RecognizerUpdate>, epoch: u64) {
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            while let Some(update) = updates.recv().await {
                let mut guard = inner.lock().await;
                let state = guard.state;

                let session = match guard.session.as_mut() {
                    Some(session) => session,
                    None => break,
                };

                if session.stream_epoch != epoch {
                    break;
                }

                if state == RecorderState::Recording {
                    session.transcript.apply(update);
                }
            }

            debug!("Recognizer update stream closed (epoch {})", epoch);
        });
    }

    /// Periodic live-progress tick. Runs for the whole session: it publishes
    /// and accumulates elapsed time while recording, stays quiet while
    /// paused, and exits once the session leaves the active states.
    fn spawn_reporter(&self) {
        let inner = Arc::clone(&self.inner);
        let surface = Arc::clone(&self.surface);
        let config = Arc::clone(&self.config);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval fires immediately; skip the zeroth tick
            interval.tick().await;

            loop {
                interval.tick().await;

                let snapshot = {
                    let mut guard = inner.lock().await;

                    match guard.state {
                        RecorderState::Recording => {
                            let session = match guard.session.as_mut() {
                                Some(session) => session,
                                None => break,
                            };
                            session.elapsed += config.tick;

                            let text = if config.publish_live_transcript
                                && !session.transcript.is_empty()
                            {
                                session.transcript.snapshot()
                            } else {
                                TRANSCRIPT_PLACEHOLDER.to_string()
                            };

                            Some(ProgressSnapshot::new(
                                text,
                                session.elapsed,
                                RecorderState::Recording,
                            ))
                        }
                        RecorderState::Paused => None,
                        RecorderState::Idle | RecorderState::Stopped => break,
                    }
                };

                if let Some(snapshot) = snapshot {
                    surface.publish(snapshot).await;
                }
            }

            debug!("Progress reporter stopped");
        });
    }
}

fn derive_title(started_at: DateTime<Utc>) -> String {
    format!("Meeting {}", started_at.format("%Y-%m-%d %H:%M"))
}
