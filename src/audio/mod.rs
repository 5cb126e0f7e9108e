pub mod capture;
pub mod probe;
pub mod segment;

pub use capture::{AudioSessionHandle, BatchRecognizer, PermissionGate, RecognizerUpdate};
pub use probe::{clamp_duration, file_created_at, probe_wav, AudioProbe};
pub use segment::export_slice;
