pub mod audio;
pub mod config;
pub mod error;
pub mod recovery;
pub mod remote;
pub mod session;
pub mod store;
pub mod transcribe;

pub use audio::{
    AudioSessionHandle, BatchRecognizer, PermissionGate, RecognizerUpdate,
};
pub use config::Config;
pub use error::{Capability, Error, Result};
pub use recovery::{OrphanSweep, SweepReport};
pub use remote::{
    HttpObjectStore, HttpTranscriptionClient, ObjectStore, RemoteTranscriber,
    RemoteTranscriberConfig, TaskStatus, TranscriptionApi,
};
pub use session::{
    spawn_lifecycle_listener, LifecycleEvent, NullProgressSurface, PauseOrigin, ProgressSnapshot,
    ProgressSurface, Recorder, RecorderConfig, RecorderState, StoppedRecording,
};
pub use store::{JsonRecordStore, MeetingRecord, MemoryRecordStore, NewMeetingRecord, RecordStore};
pub use transcribe::{SegmentedTranscriber, SegmentedTranscriberConfig};
