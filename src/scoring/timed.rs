use super::{accuracy_and_confidence, Cadence, RawScore, Score, ScoringConfig};
use crate::align::align;
use crate::word::Word;

/// Start times re-based on the first word of the sequence, so a late or
/// early recording start does not count as a timing error.
fn relative_starts(words: &[Word]) -> Vec<f64> {
    let origin = words.first().map_or(0.0, |w| w.start_time);
    words.iter().map(|w| w.start_time - origin).collect()
}

/// Score against a reference with per-word timing.
pub fn score_timed(user_words: &[Word], reference_words: &[Word], config: &ScoringConfig) -> Score {
    if user_words.is_empty() || reference_words.is_empty() {
        return Score::zero(Cadence::Timing);
    }

    let user_starts = relative_starts(user_words);
    let reference_starts = relative_starts(reference_words);
    let alignment = align(user_words, reference_words);
    let matches = alignment.matches();

    let (confidence_sum, timing_error_sum) =
        alignment
            .pairs
            .iter()
            .fold((0.0, 0.0), |(confidence, error), pair| {
                let user = &user_words[pair.user_index];
                let drift =
                    (user_starts[pair.user_index] - reference_starts[pair.reference_index]).abs();
                (confidence + user.confidence_or_zero(), error + drift)
            });

    let (accuracy, confidence) =
        accuracy_and_confidence(matches, reference_words.len(), confidence_sum);

    let timing = if matches > 0 {
        let avg_timing_error = timing_error_sum / matches as f64;
        (100.0 * (1.0 - avg_timing_error / config.timing_tolerance_secs)).max(0.0)
    } else {
        0.0
    };

    RawScore {
        accuracy,
        confidence,
        cadence: timing,
    }
    .finish(config, Cadence::Timing)
}
