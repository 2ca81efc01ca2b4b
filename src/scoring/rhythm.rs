use itertools::Itertools;

use super::{accuracy_and_confidence, Cadence, RawScore, Score, ScoringConfig};
use crate::align::align;
use crate::util::std_dev;
use crate::word::Word;

/// Gaps the singer actually left between consecutive words.
///
/// Overlapping or touching words (non-positive gaps) are dropped, not clamped.
pub(crate) fn pause_durations(user_words: &[Word]) -> Vec<f64> {
    user_words
        .iter()
        .tuple_windows()
        .map(|(previous, current)| current.start_time - previous.end_time)
        .filter(|pause| *pause > 0.0)
        .collect()
}

fn rhythm_points(pauses: &[f64], config: &ScoringConfig) -> f64 {
    match pauses.len() {
        0 => 0.0,
        1 => config.single_pause_rhythm,
        _ => {
            let spread = std_dev(pauses).unwrap_or_default();
            (100.0 * (1.0 - spread / config.rhythm_spread_secs)).max(0.0)
        }
    }
}

/// Score against plain reference text, using pause consistency in place of timing.
pub fn score_rhythm<R: AsRef<str>>(
    user_words: &[Word],
    reference_tokens: &[R],
    config: &ScoringConfig,
) -> Score {
    if user_words.is_empty() || reference_tokens.is_empty() {
        return Score::zero(Cadence::Rhythm);
    }

    let tokens: Vec<&str> = reference_tokens.iter().map(AsRef::as_ref).collect();
    let alignment = align(user_words, &tokens);
    let confidence_sum: f64 = alignment
        .pairs
        .iter()
        .map(|pair| user_words[pair.user_index].confidence_or_zero())
        .sum();

    let (accuracy, confidence) =
        accuracy_and_confidence(alignment.matches(), tokens.len(), confidence_sum);
    let pauses = pause_durations(user_words);
    log::debug!("pauses between sung words: {pauses:?}");

    RawScore {
        accuracy,
        confidence,
        cadence: rhythm_points(&pauses, config),
    }
    .finish(config, Cadence::Rhythm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::tokenize;

    fn word(text: &str, confidence: f64, start: f64, end: f64) -> Word {
        Word::new(text, start, end).with_confidence(confidence)
    }

    #[test]
    fn test_rhythm_fallback_scenario() {
        let reference = tokenize("a b c");
        let user = vec![
            word("a", 1.0, 0.0, 0.5),
            word("x", 0.5, 1.0, 1.5),
            word("c", 0.8, 2.0, 2.5),
        ];
        let score = score_rhythm(&user, &reference, &ScoringConfig::default());

        assert_eq!(score.accuracy, 67);
        assert_eq!(score.confidence, 90);
        assert_eq!(score.cadence, Cadence::Rhythm(100));
        // weighted from unrounded sub-scores: 33.33 + 27 + 20 = 80.33
        assert_eq!(score.overall, 80);
    }

    #[test]
    fn test_pause_durations_ignore_overlaps() {
        let user = vec![
            word("a", 1.0, 0.0, 0.5),
            word("b", 1.0, 0.4, 0.9),
            word("c", 1.0, 0.9, 1.2),
            word("d", 1.0, 1.5, 1.8),
        ];
        let pauses = pause_durations(&user);

        assert_eq!(pauses.len(), 1);
        assert!((pauses[0] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_single_pause_scores_fixed_rhythm() {
        let reference = tokenize("a b");
        let user = vec![word("a", 1.0, 0.0, 0.5), word("b", 1.0, 0.7, 1.0)];
        let score = score_rhythm(&user, &reference, &ScoringConfig::default());

        assert_eq!(score.cadence, Cadence::Rhythm(80));
        assert_eq!(score.overall, 96);
    }

    #[test]
    fn test_no_pauses_scores_zero_rhythm() {
        let reference = tokenize("a b");
        let user = vec![word("a", 1.0, 0.0, 0.5), word("b", 1.0, 0.5, 1.0)];
        let score = score_rhythm(&user, &reference, &ScoringConfig::default());

        assert_eq!(score.cadence, Cadence::Rhythm(0));
        assert_eq!(score.overall, 80);
    }

    #[test]
    fn test_uneven_pauses_lower_rhythm() {
        // pauses 0.1 and 0.5: std dev 0.2 -> 100 * (1 - 0.4) = 60
        let reference = tokenize("a b c");
        let user = vec![
            word("a", 1.0, 0.0, 0.5),
            word("b", 1.0, 0.6, 1.0),
            word("c", 1.0, 1.5, 2.0),
        ];
        let score = score_rhythm(&user, &reference, &ScoringConfig::default());

        assert_eq!(score.cadence, Cadence::Rhythm(60));
    }

    #[test]
    fn test_wildly_uneven_pauses_floor_at_zero() {
        let reference = tokenize("a b c");
        let user = vec![
            word("a", 1.0, 0.0, 0.5),
            word("b", 1.0, 0.6, 1.0),
            word("c", 1.0, 4.0, 4.5),
        ];
        let score = score_rhythm(&user, &reference, &ScoringConfig::default());

        assert_eq!(score.cadence, Cadence::Rhythm(0));
    }

    #[test]
    fn test_repeated_refrain_words() {
        let reference = tokenize("'Cause the players gonna play (play, play, play, play)");
        let user = vec![
            word("play", 0.9, 0.0, 0.3),
            word("play", 0.9, 0.5, 0.8),
            word("play", 0.9, 1.0, 1.3),
        ];
        let score = score_rhythm(&user, &reference, &ScoringConfig::default());

        // 3 of 9 reference tokens
        assert_eq!(score.accuracy, 33);
        assert_eq!(score.confidence, 90);
        assert_eq!(score.cadence, Cadence::Rhythm(100));
    }

    #[test]
    fn test_empty_inputs() {
        let reference = tokenize("a b");
        let empty_tokens: Vec<String> = Vec::new();
        let user = vec![word("a", 1.0, 0.0, 0.5)];

        assert_eq!(
            score_rhythm(&[], &reference, &ScoringConfig::default()),
            Score::zero(Cadence::Rhythm)
        );
        assert_eq!(
            score_rhythm(&user, &empty_tokens, &ScoringConfig::default()),
            Score::zero(Cadence::Rhythm)
        );
    }
}
