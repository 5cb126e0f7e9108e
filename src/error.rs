use std::path::PathBuf;

/// Capability grants required before a recording session may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Microphone,
    SpeechRecognition,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Microphone => write!(f, "microphone"),
            Capability::SpeechRecognition => write!(f, "speech recognition"),
        }
    }
}

/// Error taxonomy for recording and transcription.
///
/// The distinctions matter at call sites: `Protocol` is fatal and surfaced
/// verbatim, `Timeout` means the poll budget ran out, `EmptyResult` means the
/// service succeeded but had nothing to say, and `Persistence` carries the
/// local audio path so the caller can retry or rely on the orphan sweep.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} access denied")]
    CapabilityDenied(Capability),

    #[error("service protocol error: {0}")]
    Protocol(String),

    #[error("transcription failed: {0}")]
    ServiceFailure(String),

    #[error("transcription timed out after {attempts} poll attempts")]
    Timeout { attempts: u32 },

    #[error("transcription job cancelled")]
    Cancelled,

    #[error("transcription produced no text")]
    EmptyResult,

    #[error("failed to persist record for {}: {reason}", audio_path.display())]
    Persistence { audio_path: PathBuf, reason: String },

    #[error("{op} is not valid while {from}")]
    InvalidTransition {
        from: &'static str,
        op: &'static str,
    },

    #[error("audio session error: {0}")]
    Audio(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
