//! Alignment-based scoring of a sung or spoken attempt.
//!
//! Two strategies share the greedy aligner: [`score_timed`] when the
//! reference carries per-word timing, [`score_rhythm`] when only its text is
//! known. [`score`] picks between them from the reference variant.

mod rhythm;
mod timed;

use serde::{Deserialize, Serialize};

use crate::reference::Reference;
use crate::util::to_points;
use crate::word::Word;

pub use rhythm::score_rhythm;
pub use timed::score_timed;

/// Weights and scale constants for both strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub accuracy_weight: f64,
    pub confidence_weight: f64,
    /// Weight of the timing or rhythm sub-score.
    pub cadence_weight: f64,
    /// Average start-time error at which the timing score reaches 0.
    pub timing_tolerance_secs: f64,
    /// Pause standard deviation at which the rhythm score reaches 0.
    pub rhythm_spread_secs: f64,
    /// Rhythm score when the attempt has exactly one pause.
    pub single_pause_rhythm: f64,
}

impl ScoringConfig {
    pub const ACCURACY_WEIGHT: f64 = 0.5;
    pub const CONFIDENCE_WEIGHT: f64 = 0.3;
    pub const CADENCE_WEIGHT: f64 = 0.2;
    pub const TIMING_TOLERANCE_SECS: f64 = 1.0;
    pub const RHYTHM_SPREAD_SECS: f64 = 0.5;
    pub const SINGLE_PAUSE_RHYTHM: f64 = 80.0;

    fn overall(&self, accuracy: f64, confidence: f64, cadence: f64) -> f64 {
        (self.accuracy_weight * accuracy
            + self.confidence_weight * confidence
            + self.cadence_weight * cadence)
            .min(100.0)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            accuracy_weight: Self::ACCURACY_WEIGHT,
            confidence_weight: Self::CONFIDENCE_WEIGHT,
            cadence_weight: Self::CADENCE_WEIGHT,
            timing_tolerance_secs: Self::TIMING_TOLERANCE_SECS,
            rhythm_spread_secs: Self::RHYTHM_SPREAD_SECS,
            single_pause_rhythm: Self::SINGLE_PAUSE_RHYTHM,
        }
    }
}

/// The third sub-score; which one depends on the strategy that ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    #[serde(rename = "timingScore")]
    Timing(u8),
    #[serde(rename = "rhythmScore")]
    Rhythm(u8),
}

impl Cadence {
    pub fn points(&self) -> u8 {
        match self {
            Cadence::Timing(points) | Cadence::Rhythm(points) => *points,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Cadence::Timing(_) => "Timing",
            Cadence::Rhythm(_) => "Rhythm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    #[serde(rename = "overallScore")]
    pub overall: u8,
    #[serde(rename = "accuracyScore")]
    pub accuracy: u8,
    #[serde(rename = "confidenceScore")]
    pub confidence: u8,
    #[serde(flatten)]
    pub cadence: Cadence,
}

impl Score {
    pub(crate) fn zero(cadence: fn(u8) -> Cadence) -> Self {
        Self {
            overall: 0,
            accuracy: 0,
            confidence: 0,
            cadence: cadence(0),
        }
    }
}

/// Unrounded sub-scores; rounding happens once, after the weighted sum.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawScore {
    accuracy: f64,
    confidence: f64,
    cadence: f64,
}

impl RawScore {
    pub(crate) fn finish(self, config: &ScoringConfig, cadence: fn(u8) -> Cadence) -> Score {
        let overall = config.overall(self.accuracy, self.confidence, self.cadence);
        let score = Score {
            overall: to_points(overall),
            accuracy: to_points(self.accuracy),
            confidence: to_points(self.confidence),
            cadence: cadence(to_points(self.cadence)),
        };
        log::debug!(
            "accuracy {:.2}, confidence {:.2}, cadence {:.2} -> {score:?}",
            self.accuracy,
            self.confidence,
            self.cadence
        );
        score
    }
}

/// Percentage of reference words matched, and mean confidence of the matches.
pub(crate) fn accuracy_and_confidence(
    matches: usize,
    reference_len: usize,
    confidence_sum: f64,
) -> (f64, f64) {
    let accuracy = 100.0 * matches as f64 / reference_len as f64;
    let confidence = if matches > 0 {
        100.0 * confidence_sum / matches as f64
    } else {
        0.0
    };
    (accuracy, confidence)
}

/// Score with the default tuning.
pub fn score(user_words: &[Word], reference: &Reference) -> Score {
    score_with(user_words, reference, &ScoringConfig::default())
}

pub fn score_with(user_words: &[Word], reference: &Reference, config: &ScoringConfig) -> Score {
    match reference {
        Reference::Timed(timed) => score_timed(user_words, timed.words(), config),
        Reference::Plain(plain) => score_rhythm(user_words, plain.tokens(), config),
    }
}
