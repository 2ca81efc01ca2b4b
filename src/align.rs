use crate::word::Token;

/// One user word bound to one reference word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedPair {
    pub user_index: usize,
    pub reference_index: usize,
}

/// Result of [`align`]: matched pairs in user-sequence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    pub pairs: Vec<MatchedPair>,
}

impl Alignment {
    pub fn matches(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Order-preserving greedy match of user tokens against reference tokens.
///
/// A single cursor walks the reference. Each user word binds to the first
/// equal reference token at or after the cursor, which then moves past it.
/// Reference words skipped over can never be matched afterwards, and a
/// user word with no match leaves the cursor where it was.
pub fn align<U: Token, R: Token>(user: &[U], reference: &[R]) -> Alignment {
    let mut pairs = Vec::new();
    let mut ref_index = 0;

    for (user_index, user_word) in user.iter().enumerate() {
        let found = reference[ref_index..]
            .iter()
            .position(|candidate| candidate.token() == user_word.token());

        if let Some(offset) = found {
            let reference_index = ref_index + offset;
            pairs.push(MatchedPair {
                user_index,
                reference_index,
            });
            ref_index = reference_index + 1;
        }
    }

    log::debug!(
        "aligned {} of {} user words against {} reference words",
        pairs.len(),
        user.len(),
        reference.len()
    );

    Alignment { pairs }
}
