//! Candidate phrase generation
//!
//! Enumerates every contiguous span of every sentence (bounded by the maximum
//! phrase length), rejects spans that fail the admissibility filters and
//! scores the rest as `sum(weights) * length_factor(len)`.
//!
//! Filters, in order:
//! 1. span length within the configured maximum
//! 2. at most `func_word_num` function-word tokens
//! 3. no function word at either boundary
//! 4. no verb or adverb as the last token
//! 5. no stop word at either boundary
//! 6. at most `stop_word_num` stop-word tokens
//!
//! Spans that pass but carry no weight at all are dropped as well.
//! Candidates are keyed by their concatenated surface; the first span that
//! produces a string wins.

use crate::errors::{PhraseError, Result};
use crate::nlp::stopwords::StopwordFilter;
use crate::types::{
    ExtractorConfig, Phrase, PosTagSet, SingletonPolicy, WeightedToken, MAX_PHRASE_LENGTH,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// Length control
// ============================================================================

/// Per-length score multipliers
///
/// `factors[n - 1]` applies to spans of `n` tokens; longer spans use
/// `fallback`. The default favours 2 to 6 token phrases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthControl {
    pub factors: Vec<f64>,
    pub fallback: f64,
}

impl Default for LengthControl {
    fn default() -> Self {
        Self {
            factors: vec![
                1.0, 5.6, 1.1, 2.0, 0.7, 0.9, 0.48, 0.43, 0.24, 0.15, 0.07, 0.05,
            ],
            fallback: 0.01,
        }
    }
}

impl LengthControl {
    pub fn new(factors: Vec<f64>, fallback: f64) -> Self {
        Self { factors, fallback }
    }

    /// A flat table: every length scores with factor 1
    pub fn uniform() -> Self {
        Self {
            factors: Vec::new(),
            fallback: 1.0,
        }
    }

    /// Multiplier for a span of `len` tokens
    #[inline]
    pub fn factor(&self, len: usize) -> f64 {
        len.checked_sub(1)
            .and_then(|idx| self.factors.get(idx))
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn validate(&self) -> Result<()> {
        let bad = self
            .factors
            .iter()
            .chain(std::iter::once(&self.fallback))
            .find(|f| !f.is_finite() || **f < 0.0);
        match bad {
            Some(f) => Err(PhraseError::invalid_config(format!(
                "length-control factors must be finite and non-negative, got {f}"
            ))),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Candidates
// ============================================================================

/// A scored span from one sentence
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Concatenated surface form
    pub text: String,
    /// The span's tokens, in order
    pub tokens: Vec<WeightedToken>,
    /// Sentence the span was found in
    pub sentence_idx: usize,
    /// Token offset of the span start within the sentence
    pub start: usize,
    pub score: f64,
    /// Order in which the candidate was discovered
    pub discovery: usize,
}

impl Candidate {
    /// Span length in tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Exclusive end offset within the sentence
    pub fn end(&self) -> usize {
        self.start + self.tokens.len()
    }

    /// Distinct token surfaces of the span
    pub fn token_set(&self) -> FxHashSet<&str> {
        self.tokens.iter().map(WeightedToken::text).collect()
    }

    /// Ranking order: score descending, then discovery ascending
    pub fn stable_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.discovery.cmp(&other.discovery))
    }

    /// Materialize the output phrase
    pub fn into_phrase(self, rank: usize) -> Phrase {
        let end = self.end();
        Phrase {
            text: self.text,
            score: self.score,
            tokens: self.tokens.into_iter().map(|t| t.token.text).collect(),
            sentence_idx: self.sentence_idx,
            start: self.start,
            end,
            rank,
        }
    }
}

/// Why a span was not admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    TooLong,
    TooManyFunctionWords,
    FunctionWordBoundary,
    PredicateEnding,
    StopWordBoundary,
    TooManyStopWords,
    NoWeight,
}

impl Rejection {
    pub const ALL: [Rejection; 7] = [
        Rejection::TooLong,
        Rejection::TooManyFunctionWords,
        Rejection::FunctionWordBoundary,
        Rejection::PredicateEnding,
        Rejection::StopWordBoundary,
        Rejection::TooManyStopWords,
        Rejection::NoWeight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::TooLong => "too_long",
            Rejection::TooManyFunctionWords => "too_many_function_words",
            Rejection::FunctionWordBoundary => "function_word_boundary",
            Rejection::PredicateEnding => "predicate_ending",
            Rejection::StopWordBoundary => "stop_word_boundary",
            Rejection::TooManyStopWords => "too_many_stop_words",
            Rejection::NoWeight => "no_weight",
        }
    }
}

/// Counters collected while generating candidates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Spans examined
    pub considered: usize,
    /// Admitted spans whose string was already taken
    pub duplicates: usize,
    rejected: [usize; 7],
}

impl GenerationStats {
    fn reject(&mut self, reason: Rejection) {
        self.rejected[reason as usize] += 1;
    }

    /// Number of spans rejected for `reason`
    pub fn rejected(&self, reason: Rejection) -> usize {
        self.rejected[reason as usize]
    }

    pub fn total_rejected(&self) -> usize {
        self.rejected.iter().sum()
    }
}

/// Insertion-ordered candidates keyed by surface string
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    entries: Vec<Candidate>,
    index: FxHashMap<String, usize>,
    stats: GenerationStats,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the surface is already present; first occurrence wins
    ///
    /// The candidate's `discovery` is set to its insertion position.
    pub fn insert(&mut self, mut candidate: Candidate) -> bool {
        if self.index.contains_key(&candidate.text) {
            return false;
        }
        candidate.discovery = self.entries.len();
        self.index.insert(candidate.text.clone(), self.entries.len());
        self.entries.push(candidate);
        true
    }

    pub fn contains(&self, text: &str) -> bool {
        self.index.contains_key(text)
    }

    pub fn get(&self, text: &str) -> Option<&Candidate> {
        self.index.get(text).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidates in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.text.as_str())
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Candidates in discovery order
    pub fn into_vec(self) -> Vec<Candidate> {
        self.entries
    }
}

// ============================================================================
// Generator
// ============================================================================

/// Per-call filter thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterLimits {
    /// Maximum function-word tokens in a span
    pub func_word_num: usize,
    /// Maximum stop-word tokens in a span
    pub stop_word_num: usize,
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            func_word_num: 1,
            stop_word_num: 0,
        }
    }
}

/// Per-sentence token flags with prefix counts for O(1) span checks
struct SentenceFlags {
    function: Vec<bool>,
    stop: Vec<bool>,
    function_prefix: Vec<usize>,
    stop_prefix: Vec<usize>,
}

impl SentenceFlags {
    fn new(
        sentence: &[WeightedToken],
        exception_pos: PosTagSet,
        stopwords: &StopwordFilter,
    ) -> Self {
        let function: Vec<bool> = sentence
            .iter()
            .map(|t| exception_pos.contains(t.pos()))
            .collect();
        let stop: Vec<bool> = sentence
            .iter()
            .map(|t| stopwords.is_stopword(t.text()))
            .collect();

        Self {
            function_prefix: prefix_counts(&function),
            stop_prefix: prefix_counts(&stop),
            function,
            stop,
        }
    }

    fn function_count(&self, start: usize, end: usize) -> usize {
        self.function_prefix[end] - self.function_prefix[start]
    }

    fn stop_count(&self, start: usize, end: usize) -> usize {
        self.stop_prefix[end] - self.stop_prefix[start]
    }
}

fn prefix_counts(flags: &[bool]) -> Vec<usize> {
    let mut prefix = Vec::with_capacity(flags.len() + 1);
    prefix.push(0);
    let mut running = 0;
    for &flag in flags {
        running += usize::from(flag);
        prefix.push(running);
    }
    prefix
}

/// Enumerates and scores candidate spans
#[derive(Debug, Clone)]
pub struct CandidateGenerator<'a> {
    config: &'a ExtractorConfig,
    stopwords: &'a StopwordFilter,
    limits: FilterLimits,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(
        config: &'a ExtractorConfig,
        stopwords: &'a StopwordFilter,
        limits: FilterLimits,
    ) -> Self {
        Self {
            config,
            stopwords,
            limits,
        }
    }

    fn max_len(&self) -> usize {
        self.config.max_phrase_length.min(MAX_PHRASE_LENGTH)
    }

    fn min_len(&self) -> usize {
        match self.config.singleton_policy {
            SingletonPolicy::Enumerate => 1,
            SingletonPolicy::MergeUnmatched => 2,
        }
    }

    /// Generate the candidates of a document, start-major within each sentence
    pub fn generate(&self, sentences: &[Vec<WeightedToken>]) -> CandidateSet {
        let mut set = CandidateSet::new();
        let max_len = self.max_len();
        let min_len = self.min_len();

        for (sentence_idx, sentence) in sentences.iter().enumerate() {
            let flags = SentenceFlags::new(sentence, self.config.exception_pos, self.stopwords);

            for start in 0..sentence.len() {
                let longest = max_len.min(sentence.len() - start);
                for len in min_len..=longest {
                    set.stats.considered += 1;
                    let end = start + len;
                    let span = &sentence[start..end];

                    if let Err(reason) = self.check_span(span, &flags, start, end) {
                        set.stats.reject(reason);
                        continue;
                    }

                    let weight_sum: f64 = span.iter().map(|t| t.weight).sum();
                    if weight_sum <= 0.0 {
                        set.stats.reject(Rejection::NoWeight);
                        continue;
                    }

                    let text: String = span.iter().map(WeightedToken::text).collect();
                    if set.contains(&text) {
                        set.stats.duplicates += 1;
                        continue;
                    }

                    set.insert(Candidate {
                        text,
                        tokens: span.to_vec(),
                        sentence_idx,
                        start,
                        score: weight_sum * self.config.length_control.factor(len),
                        discovery: 0,
                    });
                }
            }
        }

        set
    }

    /// Apply the admissibility filters in order
    fn check_span(
        &self,
        span: &[WeightedToken],
        flags: &SentenceFlags,
        start: usize,
        end: usize,
    ) -> std::result::Result<(), Rejection> {
        let last = end - 1;

        if span.len() > self.max_len() {
            return Err(Rejection::TooLong);
        }
        if flags.function_count(start, end) > self.limits.func_word_num {
            return Err(Rejection::TooManyFunctionWords);
        }
        if flags.function[start] || flags.function[last] {
            return Err(Rejection::FunctionWordBoundary);
        }
        if span[span.len() - 1].pos().is_verb_or_adverb() {
            return Err(Rejection::PredicateEnding);
        }
        if flags.stop[start] || flags.stop[last] {
            return Err(Rejection::StopWordBoundary);
        }
        if flags.stop_count(start, end) > self.limits.stop_word_num {
            return Err(Rejection::TooManyStopWords);
        }
        Ok(())
    }
}
