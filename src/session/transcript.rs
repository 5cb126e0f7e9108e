use crate::audio::RecognizerUpdate;

/// Accumulates streaming-recognizer output across recognizer restarts.
///
/// A streaming recognizer replaces its in-flight hypothesis with every
/// partial update and starts a brand-new hypothesis stream after a restart.
/// Pausing commits the last partial verbatim, so resuming appends instead of
/// overwriting. This lives in an explicit object rather than closure state
/// so the append-across-restart rule is enforced in one place.
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    committed: String,
    live: String,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, update: RecognizerUpdate) {
        if update.partial {
            self.live = update.text;
        } else {
            self.push_committed(&update.text);
            self.live.clear();
        }
    }

    /// Commit the in-flight partial so a restarted stream appends after it.
    pub fn commit_live(&mut self) {
        if !self.live.is_empty() {
            let live = std::mem::take(&mut self.live);
            self.push_committed(&live);
        }
    }

    pub fn snapshot(&self) -> String {
        if self.live.is_empty() {
            return self.committed.clone();
        }
        if self.committed.is_empty() {
            return self.live.clone();
        }
        format!("{} {}", self.committed, self.live)
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty() && self.live.is_empty()
    }

    fn push_committed(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.committed.is_empty() {
            self.committed.push(' ');
        }
        self.committed.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(text: &str) -> RecognizerUpdate {
        RecognizerUpdate {
            text: text.to_string(),
            partial: true,
        }
    }

    fn finished(text: &str) -> RecognizerUpdate {
        RecognizerUpdate {
            text: text.to_string(),
            partial: false,
        }
    }

    #[test]
    fn partial_updates_replace_each_other() {
        let mut acc = TranscriptAccumulator::new();
        acc.apply(partial("hel"));
        acc.apply(partial("hello"));
        assert_eq!(acc.snapshot(), "hello");
    }

    #[test]
    fn committed_text_survives_a_new_stream() {
        let mut acc = TranscriptAccumulator::new();
        acc.apply(partial("hello wor"));
        acc.commit_live();

        // New recognizer stream after resume starts from scratch.
        acc.apply(partial("and"));
        acc.apply(partial("and then"));
        assert_eq!(acc.snapshot(), "hello wor and then");
    }

    #[test]
    fn final_updates_append() {
        let mut acc = TranscriptAccumulator::new();
        acc.apply(finished("first utterance."));
        acc.apply(partial("second"));
        acc.apply(finished("second utterance."));
        assert_eq!(acc.snapshot(), "first utterance. second utterance.");
    }

    #[test]
    fn commit_live_is_idempotent() {
        let mut acc = TranscriptAccumulator::new();
        acc.apply(partial("once"));
        acc.commit_live();
        acc.commit_live();
        assert_eq!(acc.snapshot(), "once");
    }
}
