use crate::error::Result;
use std::sync::Arc;
use tracing::warn;

const REFINE_PROMPT: &str =
    "Add punctuation and sensible paragraph breaks to this transcript. \
     Return only the corrected text.";

/// Independent text-completion collaborator used for transcript refinement.
#[async_trait::async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, instruction: &str, input: &str) -> Result<String>;
}

/// Optional punctuation/segmentation cleanup for a raw transcript.
///
/// Refinement is idempotent and strictly best-effort: empty input, a failed
/// call, or an empty completion all hand the original text back unchanged.
/// A valid raw transcript is never discarded over a cleanup failure.
pub struct TranscriptRefiner {
    completion: Arc<dyn TextCompletion>,
}

impl TranscriptRefiner {
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self { completion }
    }

    pub async fn refine(&self, transcript: &str) -> String {
        if transcript.trim().is_empty() {
            return transcript.to_string();
        }

        match self.completion.complete(REFINE_PROMPT, transcript).await {
            Ok(refined) if !refined.trim().is_empty() => refined,
            Ok(_) => transcript.to_string(),
            Err(e) => {
                warn!("Transcript refinement failed, keeping raw text: {}", e);
                transcript.to_string()
            }
        }
    }
}
