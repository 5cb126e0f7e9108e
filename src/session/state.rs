/// Recording lifecycle states.
///
/// `idle → recording → {paused ⇄ recording} → stopped`; stopped is terminal
/// and the machine is discarded afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Paused,
    Stopped,
}

impl RecorderState {
    pub fn name(self) -> &'static str {
        match self {
            RecorderState::Idle => "idle",
            RecorderState::Recording => "recording",
            RecorderState::Paused => "paused",
            RecorderState::Stopped => "stopped",
        }
    }

    /// Whether a session is in flight (recording or paused).
    pub fn is_active(self) -> bool {
        matches!(self, RecorderState::Recording | RecorderState::Paused)
    }
}

/// Why the machine paused. Only a pause the system caused may be resumed by
/// the matching system signal; a manual pause never auto-resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOrigin {
    /// The user asked to pause.
    Manual,
    /// An audio-route interruption (e.g. an incoming call) forced the pause.
    Interruption,
    /// The process moved to the background.
    Background,
}
