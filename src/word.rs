use serde::{Deserialize, Serialize};

use crate::normalize::{normalize, parse_offset_seconds};

/// A normalized, timestamped token from either side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    text: String,
    pub start_time: f64,
    pub end_time: f64,
    /// Only recognized words carry one; `None` counts as 0 when aggregated.
    pub confidence: Option<f64>,
}

impl Word {
    pub fn new(text: &str, start_time: f64, end_time: f64) -> Self {
        Self {
            text: normalize(text),
            start_time,
            end_time,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn confidence_or_zero(&self) -> f64 {
        self.confidence.unwrap_or(0.0)
    }
}

/// Anything the aligner can compare by normalized token.
pub trait Token {
    fn token(&self) -> &str;
}

impl Token for Word {
    fn token(&self) -> &str {
        &self.text
    }
}

impl Token for String {
    fn token(&self) -> &str {
        self
    }
}

impl Token for &str {
    fn token(&self) -> &str {
        self
    }
}

/// A time offset as delivered on the wire: seconds, or text like `"1.120s"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawOffset {
    Seconds(f64),
    Text(String),
}

impl RawOffset {
    pub fn seconds(&self) -> f64 {
        match self {
            RawOffset::Seconds(secs) if secs.is_finite() => *secs,
            RawOffset::Seconds(_) => 0.0,
            RawOffset::Text(text) => parse_offset_seconds(Some(text)),
        }
    }
}

/// Word shape produced by the recognizer and stored in song catalogs.
///
/// Recognizer events use `startTime`/`endTime` in seconds; catalog entries
/// use `startOffset`/`endOffset` strings. Both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWord {
    #[serde(alias = "text")]
    pub word: String,
    #[serde(default, alias = "startOffset", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<RawOffset>,
    #[serde(default, alias = "endOffset", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<RawOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl RawWord {
    pub fn to_word(&self) -> Word {
        Word {
            text: normalize(&self.word),
            start_time: self.start_time.as_ref().map_or(0.0, RawOffset::seconds),
            end_time: self.end_time.as_ref().map_or(0.0, RawOffset::seconds),
            confidence: self.confidence,
        }
    }
}

impl From<&RawWord> for Word {
    fn from(raw: &RawWord) -> Self {
        raw.to_word()
    }
}

pub fn to_words(raw: &[RawWord]) -> Vec<Word> {
    raw.iter().map(RawWord::to_word).collect()
}
