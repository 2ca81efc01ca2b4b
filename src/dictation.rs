//! The "listen and type" mini-game: a phrase is played back, the player
//! types what they heard, and the answer is scored on edit distance and
//! response time.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{RefrainError, Result};
use crate::util::to_points;

static PHRASES_JSON: &str = include_str!("phrases.json");

const MAX_ACCURACY: f64 = 80.0;
const PENALTY_PER_EDIT: f64 = 5.0;
const MAX_TIME_BONUS: f64 = 20.0;
const BONUS_LOSS_PER_SEC: f64 = 2.0;

#[derive(Debug, Clone, Deserialize)]
pub struct PhraseBank {
    pub name: String,
    pub phrases: Vec<String>,
}

impl PhraseBank {
    pub fn builtin() -> Result<Self> {
        serde_json::from_str(PHRASES_JSON).map_err(|e| RefrainError::json("parsing phrase bank", e))
    }

    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.phrases.choose(rng).map(String::as_str)
    }
}

/// Case-insensitive character edit distance.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DictationScore {
    pub distance: usize,
    pub accuracy: u8,
    pub time_bonus: u8,
    pub total: u8,
}

impl DictationScore {
    pub fn compute(phrase: &str, answer: &str, response_secs: f64) -> Self {
        let distance = levenshtein(answer, phrase);
        let accuracy = (MAX_ACCURACY - distance as f64 * PENALTY_PER_EDIT).max(0.0);
        // an unknown response time earns no bonus
        let time_bonus = if response_secs.is_finite() {
            (MAX_TIME_BONUS - response_secs.max(0.0) * BONUS_LOSS_PER_SEC).max(0.0)
        } else {
            0.0
        };

        let accuracy = to_points(accuracy);
        let time_bonus = to_points(time_bonus);
        Self {
            distance,
            accuracy,
            time_bonus,
            total: accuracy + time_bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn test_levenshtein_ignores_case() {
        assert_eq!(levenshtein("Hello World", "hello world"), 0);
    }

    #[test]
    fn test_perfect_instant_answer() {
        let score = DictationScore::compute("Hello world", "hello world", 0.0);
        assert_eq!(score.distance, 0);
        assert_eq!(score.accuracy, 80);
        assert_eq!(score.time_bonus, 20);
        assert_eq!(score.total, 100);
    }

    #[test]
    fn test_typos_and_slow_answer() {
        // two edits, 4.2s: 80 - 10 = 70, 20 - 8.4 = 11.6
        let score = DictationScore::compute("Good morning", "God mornin", 4.2);
        assert_eq!(score.distance, 2);
        assert_eq!(score.accuracy, 70);
        assert_eq!(score.time_bonus, 12);
        assert_eq!(score.total, 82);
    }

    #[test]
    fn test_floors_at_zero() {
        let score = DictationScore::compute("The sky is blue", "completely unrelated answer", 60.0);
        assert_eq!(score.accuracy, 0);
        assert_eq!(score.time_bonus, 0);
        assert_eq!(score.total, 0);
    }

    #[test]
    fn test_unknown_response_time_earns_no_bonus() {
        for secs in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let score = DictationScore::compute("Hello world", "hello world", secs);
            assert_eq!(score.accuracy, 80);
            assert_eq!(score.time_bonus, 0);
            assert_eq!(score.total, 80);
        }
    }

    #[test]
    fn test_builtin_phrase_bank() {
        let bank = PhraseBank::builtin().unwrap();
        assert!(bank.phrases.contains(&"Hello world".to_string()));

        let mut rng = StdRng::seed_from_u64(7);
        let phrase = bank.random(&mut rng).unwrap();
        assert!(bank.phrases.iter().any(|p| p == phrase));
    }

    #[test]
    fn test_empty_phrase_bank() {
        let bank = PhraseBank {
            name: "empty".to_string(),
            phrases: vec![],
        };
        assert!(bank.random(&mut rand::thread_rng()).is_none());
    }
}
