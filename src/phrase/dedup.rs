//! Redundancy filtering
//!
//! Longest candidates are considered first. A candidate is dropped when it
//! shares at least half of the smaller distinct-token set with a phrase that
//! was already accepted:
//!
//! ```text
//! |tokens(a) ∩ tokens(b)| >= min(|tokens(a)|, |tokens(b)|) / 2
//! ```
//!
//! Overlap is measured on token surfaces, not on positions, so two phrases
//! from different sentences can still block each other.

use crate::phrase::candidates::Candidate;
use rustc_hash::FxHashSet;

/// A candidate removed by redundancy filtering
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedCandidate {
    pub text: String,
    pub score: f64,
    /// The accepted phrase it overlapped with
    pub blocked_by: String,
    /// Number of distinct tokens the two share
    pub shared: usize,
}

/// Overlap test between two distinct-token sets of the given sizes
#[inline]
pub fn is_redundant(shared: usize, len_a: usize, len_b: usize) -> bool {
    shared as f64 >= len_a.min(len_b) as f64 / 2.0
}

/// Drop redundant candidates
///
/// Returns the survivors ordered by length descending (discovery order among
/// equal lengths).
pub fn deduplicate(candidates: Vec<Candidate>) -> Vec<Candidate> {
    deduplicate_with_diagnostics(candidates).0
}

/// Like [`deduplicate`], also reporting what was dropped and why
pub fn deduplicate_with_diagnostics(
    mut candidates: Vec<Candidate>,
) -> (Vec<Candidate>, Vec<DroppedCandidate>) {
    candidates.sort_by(|a, b| b.len().cmp(&a.len()).then(a.discovery.cmp(&b.discovery)));

    let sets: Vec<FxHashSet<&str>> = candidates.iter().map(Candidate::token_set).collect();
    let mut accepted: Vec<usize> = Vec::new();
    let mut dropped = Vec::new();
    let mut keep = vec![false; candidates.len()];

    for (i, set) in sets.iter().enumerate() {
        let blocker = accepted.iter().find_map(|&k| {
            let shared = set.intersection(&sets[k]).count();
            is_redundant(shared, set.len(), sets[k].len()).then_some((k, shared))
        });

        match blocker {
            Some((k, shared)) => dropped.push(DroppedCandidate {
                text: candidates[i].text.clone(),
                score: candidates[i].score,
                blocked_by: candidates[k].text.clone(),
                shared,
            }),
            None => {
                accepted.push(i);
                keep[i] = true;
            }
        }
    }

    let kept = candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(c, keep)| keep.then_some(c))
        .collect();

    (kept, dropped)
}
