//! Final ordering and the single-token merge step

use crate::phrase::candidates::{Candidate, LengthControl};
use crate::types::{Phrase, WeightedToken};
use rustc_hash::FxHashSet;

/// Order by score descending (discovery order on ties), keep `top_k` and
/// assign 1-based ranks
pub fn rank(mut candidates: Vec<Candidate>, top_k: usize) -> Vec<Phrase> {
    candidates.sort_by(Candidate::stable_cmp);
    candidates.truncate(top_k);
    candidates
        .into_iter()
        .enumerate()
        .map(|(i, c)| c.into_phrase(i + 1))
        .collect()
}

/// Add weighted single tokens that no kept phrase covers
///
/// Each distinct token with a positive weight that is not a substring of any
/// phrase in `kept` becomes a candidate scored `weight * factor(1)`. Merged
/// tokens are discovered after every phrase, in document order, starting at
/// `next_discovery`.
pub fn merge_unmatched_tokens(
    kept: &mut Vec<Candidate>,
    weighted: &[Vec<WeightedToken>],
    length_control: &LengthControl,
    next_discovery: usize,
) -> usize {
    let phrase_texts: Vec<String> = kept.iter().map(|c| c.text.clone()).collect();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut discovery = next_discovery;
    let mut merged = 0;

    for (sentence_idx, sentence) in weighted.iter().enumerate() {
        for (offset, token) in sentence.iter().enumerate() {
            if token.weight <= 0.0 || !seen.insert(token.text()) {
                continue;
            }
            if phrase_texts.iter().any(|p| p.contains(token.text())) {
                continue;
            }

            kept.push(Candidate {
                text: token.text().to_string(),
                tokens: vec![token.clone()],
                sentence_idx,
                start: offset,
                score: token.weight * length_control.factor(1),
                discovery,
            });
            discovery += 1;
            merged += 1;
        }
    }

    merged
}
