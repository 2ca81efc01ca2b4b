use serde::{Deserialize, Serialize};

use crate::normalize::tokenize;
use crate::word::{to_words, RawWord, Word};

pub const DEFAULT_DURATION_SECS: u32 = 15;
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Reference known only as text; tokenized once when built.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainReference {
    text: String,
    tokens: Vec<String>,
}

impl PlainReference {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = tokenize(&text);
        Self { text, tokens }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Reference with per-word timing, words already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedReference {
    text: String,
    words: Vec<Word>,
}

impl TimedReference {
    pub fn new(text: impl Into<String>, words: Vec<Word>) -> Self {
        Self {
            text: text.into(),
            words,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

/// What the scorer compares against. Which variant applies is settled at
/// load time, so scoring never inspects the shape of the input again.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    Plain(PlainReference),
    Timed(TimedReference),
}

impl Reference {
    pub fn plain(text: impl Into<String>) -> Self {
        Reference::Plain(PlainReference::new(text))
    }

    pub fn timed(text: impl Into<String>, words: Vec<Word>) -> Self {
        Reference::Timed(TimedReference::new(text, words))
    }

    pub fn text(&self) -> &str {
        match self {
            Reference::Plain(plain) => plain.text(),
            Reference::Timed(timed) => timed.text(),
        }
    }

    pub fn is_timed(&self) -> bool {
        matches!(self, Reference::Timed(_))
    }
}

/// A reference plus the metadata only the recording side cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub reference: Reference,
    pub duration_secs: u32,
    pub language: String,
}

impl Transcript {
    pub fn new(reference: Reference) -> Self {
        Self {
            reference,
            duration_secs: DEFAULT_DURATION_SECS,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        self.reference.text()
    }
}

/// Structured transcript as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<RawWord>>,
    #[serde(default, alias = "time", skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
    #[serde(default, alias = "languageTag", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Either legacy plain text or a structured record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranscriptSource {
    Text(String),
    Record(TranscriptRecord),
}

impl From<TranscriptRecord> for Transcript {
    fn from(record: TranscriptRecord) -> Self {
        let reference = match record.words {
            Some(raw) => Reference::timed(record.text, to_words(&raw)),
            None => Reference::plain(record.text),
        };

        Transcript {
            reference,
            duration_secs: record.duration_secs.unwrap_or(DEFAULT_DURATION_SECS),
            language: record
                .language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        }
    }
}

impl From<TranscriptSource> for Transcript {
    fn from(source: TranscriptSource) -> Self {
        match source {
            TranscriptSource::Text(text) => Transcript::new(Reference::plain(text)),
            TranscriptSource::Record(record) => record.into(),
        }
    }
}
