use serde::{Deserialize, Serialize};

use crate::reference::Reference;
use crate::scoring::{score_with, Score, ScoringConfig};
use crate::word::{RawWord, Word};

/// One result pushed by the streaming recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionEvent {
    pub transcript: String,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub words: Vec<RawWord>,
}

/// Everything recognized during one recording attempt.
///
/// Final results are appended and never rewritten; interim text is only kept
/// for display until the next result replaces it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSession {
    transcript: String,
    interim: String,
    words: Vec<Word>,
    final_events: usize,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new attempt.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.interim.clear();
        self.words.clear();
        self.final_events = 0;
    }

    pub fn apply(&mut self, event: &RecognitionEvent) {
        if event.is_final {
            self.transcript.push_str(&event.transcript);
            self.transcript.push(' ');
            self.words.extend(event.words.iter().map(RawWord::to_word));
            self.interim.clear();
            self.final_events += 1;
            log::debug!(
                "final result #{} added {} words",
                self.final_events,
                event.words.len()
            );
        } else {
            self.interim.clone_from(&event.transcript);
        }
    }

    /// Final transcript followed by whatever is still being recognized.
    pub fn display_text(&self) -> String {
        format!("{}{}", self.transcript, self.interim)
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn final_events(&self) -> usize {
        self.final_events
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Score the accumulated words; called once the attempt is over.
    pub fn score(&self, reference: &Reference, config: &ScoringConfig) -> Score {
        score_with(&self.words, reference, config)
    }
}
