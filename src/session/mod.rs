//! Recording lifecycle
//!
//! This module owns the recording state machine:
//! - `Recorder`: start/pause/resume/stop plus the emergency finalize path
//! - `TranscriptAccumulator`: live transcript across recognizer restarts
//! - progress reporting to an external presentation surface
//! - lifecycle-event handling (backgrounding, interruptions, termination)

mod lifecycle;
mod recorder;
mod reporter;
mod state;
mod transcript;

pub use lifecycle::{spawn_lifecycle_listener, LifecycleEvent};
pub use recorder::{Recorder, RecorderConfig, StoppedRecording};
pub use reporter::{
    NullProgressSurface, ProgressSnapshot, ProgressSurface, TRANSCRIPT_PLACEHOLDER,
};
pub use state::{PauseOrigin, RecorderState};
pub use transcript::TranscriptAccumulator;
