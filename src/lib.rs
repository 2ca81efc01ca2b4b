// Library surface: the scoring core plus the collaborators the CLI wires together.
pub mod align;
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod dictation;
pub mod error;
pub mod leaderboard;
pub mod normalize;
pub mod reference;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod util;
pub mod word;

pub use error::RefrainError;
pub use normalize::{normalize, parse_offset_seconds};
pub use reference::{Reference, Transcript};
pub use scoring::{score, score_with, Cadence, Score, ScoringConfig};
pub use word::{RawWord, Word};
