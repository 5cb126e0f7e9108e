use crate::error::{Capability, Result};
use std::path::Path;
use tokio::sync::mpsc;

/// Incremental output from the streaming recognizer.
///
/// A partial update replaces the current in-flight hypothesis; a final
/// update commits a finished utterance. A restarted recognizer begins a new
/// hypothesis stream, so accumulation across restarts lives in
/// [`crate::session::TranscriptAccumulator`], never in the recognizer.
#[derive(Debug, Clone)]
pub struct RecognizerUpdate {
    pub text: String,
    pub partial: bool,
}

/// Capability the microphone and streaming recognizer sit behind.
///
/// `start` opens the sample sink at the given path and runs the streaming
/// recognizer concurrently, delivering updates over the returned channel.
/// `resume` begins a fresh recognizer stream (and a fresh channel).
///
/// Platform implementations own the actual device; the state machine is the
/// sole driver for the lifetime of a session.
#[async_trait::async_trait]
pub trait AudioSessionHandle: Send {
    /// Open the microphone, start writing PCM to `sink`, and start the
    /// streaming recognizer.
    async fn start(&mut self, sink: &Path) -> Result<mpsc::Receiver<RecognizerUpdate>>;

    /// Suspend the sample sink and the recognizer.
    async fn pause(&mut self) -> Result<()>;

    /// Re-open the sink and restart the recognizer with a new update stream.
    async fn resume(&mut self) -> Result<mpsc::Receiver<RecognizerUpdate>>;

    /// Finalize the sink file and tear down the recognizer.
    async fn finalize(&mut self) -> Result<()>;

    /// Synchronous finalize for process-teardown handlers. Must not block on
    /// async work; best-effort beyond flushing the sink.
    fn finalize_blocking(&mut self);
}

/// Permission-prompt collaborator. Prompt UX is external; the recorder only
/// needs the yes/no answer.
#[async_trait::async_trait]
pub trait PermissionGate: Send + Sync {
    async fn request(&self, capability: Capability) -> bool;
}

/// A recognizer that accepts a complete audio file and returns one final
/// transcript. Used by the segmented fallback.
#[async_trait::async_trait]
pub trait BatchRecognizer: Send + Sync {
    async fn transcribe_file(&self, path: &Path) -> Result<String>;
}
