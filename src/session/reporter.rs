use super::state::RecorderState;
use std::time::Duration;

/// Placeholder shown before the recognizer has produced any text, or when
/// the caller opted out of publishing the live transcript.
pub const TRANSCRIPT_PLACEHOLDER: &str = "Listening…";

/// One live-progress update pushed to the presentation surface.
///
/// Constructed from a [`RecorderState`] so a snapshot claiming to be both
/// recording and paused cannot be expressed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub text: String,
    pub elapsed: Duration,
    pub is_recording: bool,
    pub is_paused: bool,
}

impl ProgressSnapshot {
    pub fn new(text: String, elapsed: Duration, state: RecorderState) -> Self {
        Self {
            text,
            elapsed,
            is_recording: state == RecorderState::Recording,
            is_paused: state == RecorderState::Paused,
        }
    }

    /// The snapshot published once after finalize.
    pub fn terminal(text: String, elapsed: Duration) -> Self {
        Self::new(text, elapsed, RecorderState::Stopped)
    }
}

/// External presentation surface (lock-screen / status-bar style). It renders
/// recording state but never owns it; dismissal timing past the requested
/// grace period is its own concern.
#[async_trait::async_trait]
pub trait ProgressSurface: Send + Sync {
    async fn publish(&self, snapshot: ProgressSnapshot);
    async fn dismiss(&self, after: Duration);
}

/// Surface that drops everything. Handy for headless use and tests.
pub struct NullProgressSurface;

#[async_trait::async_trait]
impl ProgressSurface for NullProgressSurface {
    async fn publish(&self, _snapshot: ProgressSnapshot) {}
    async fn dismiss(&self, _after: Duration) {}
}
