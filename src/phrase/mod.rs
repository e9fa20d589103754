//! Phrase extraction components
//!
//! Token weighting, candidate span generation, redundancy filtering and
//! ranking, tied together by the [`extraction::PhraseExtractor`].

pub mod candidates;
pub mod dedup;
pub mod extraction;
pub mod ranking;
pub mod weighting;
