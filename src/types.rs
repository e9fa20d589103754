//! Core types for rapid_phrases
//!
//! This module defines the data structures shared by every stage: POS tags and
//! tag sets, tokens, weighted tokens, output phrases and configuration.

use crate::errors::{PhraseError, Result};
use crate::phrase::candidates::LengthControl;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hard cap on phrase length in tokens. Bounds the per-sentence enumeration.
pub const MAX_PHRASE_LENGTH: usize = 20;

// ============================================================================
// POS tags
// ============================================================================

/// Part-of-speech tags (jieba / ICTCLAS tag set)
///
/// Fine-grained sub-tags produced by taggers (`nrfg`, `vg`, `uj`, ...) are
/// folded into their parent category by [`PosTag::from_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosTag {
    #[serde(rename = "n")]
    Noun,
    #[serde(rename = "nr")]
    PersonName,
    #[serde(rename = "ns")]
    PlaceName,
    #[serde(rename = "nt")]
    Organization,
    #[serde(rename = "nz")]
    OtherProperNoun,
    #[serde(rename = "v")]
    Verb,
    #[serde(rename = "vd")]
    AdverbialVerb,
    #[serde(rename = "vn")]
    NominalVerb,
    #[serde(rename = "a")]
    Adjective,
    #[serde(rename = "ad")]
    AdverbialAdjective,
    #[serde(rename = "an")]
    NominalAdjective,
    #[serde(rename = "d")]
    Adverb,
    #[serde(rename = "r")]
    Pronoun,
    #[serde(rename = "m")]
    Numeral,
    #[serde(rename = "q")]
    Quantifier,
    #[serde(rename = "p")]
    Preposition,
    #[serde(rename = "c")]
    Conjunction,
    #[serde(rename = "u")]
    Auxiliary,
    #[serde(rename = "y")]
    ModalParticle,
    #[serde(rename = "e")]
    Interjection,
    #[serde(rename = "o")]
    Onomatopoeia,
    #[serde(rename = "w")]
    Punctuation,
    #[serde(rename = "t")]
    Time,
    #[serde(rename = "f")]
    Locative,
    #[serde(rename = "s")]
    Place,
    #[serde(rename = "i")]
    Idiom,
    #[serde(rename = "j")]
    Abbreviation,
    #[serde(rename = "l")]
    FixedExpression,
    #[serde(rename = "h")]
    Prefix,
    #[serde(rename = "k")]
    Suffix,
    #[serde(rename = "b")]
    Distinguishing,
    #[serde(rename = "z")]
    Status,
    #[serde(rename = "eng")]
    English,
    #[serde(rename = "x")]
    Unknown,
}

impl PosTag {
    /// Every tag, in declaration order
    pub const ALL: [PosTag; 34] = [
        PosTag::Noun,
        PosTag::PersonName,
        PosTag::PlaceName,
        PosTag::Organization,
        PosTag::OtherProperNoun,
        PosTag::Verb,
        PosTag::AdverbialVerb,
        PosTag::NominalVerb,
        PosTag::Adjective,
        PosTag::AdverbialAdjective,
        PosTag::NominalAdjective,
        PosTag::Adverb,
        PosTag::Pronoun,
        PosTag::Numeral,
        PosTag::Quantifier,
        PosTag::Preposition,
        PosTag::Conjunction,
        PosTag::Auxiliary,
        PosTag::ModalParticle,
        PosTag::Interjection,
        PosTag::Onomatopoeia,
        PosTag::Punctuation,
        PosTag::Time,
        PosTag::Locative,
        PosTag::Place,
        PosTag::Idiom,
        PosTag::Abbreviation,
        PosTag::FixedExpression,
        PosTag::Prefix,
        PosTag::Suffix,
        PosTag::Distinguishing,
        PosTag::Status,
        PosTag::English,
        PosTag::Unknown,
    ];

    /// Parse a tagger-produced tag string
    ///
    /// Exact two-letter categories are matched first, then the tag falls back
    /// to the category of its leading letter. Anything unrecognised is
    /// [`PosTag::Unknown`].
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        match tag.as_str() {
            "eng" => return PosTag::English,
            "vd" => return PosTag::AdverbialVerb,
            "vn" => return PosTag::NominalVerb,
            "ad" => return PosTag::AdverbialAdjective,
            "an" => return PosTag::NominalAdjective,
            "nz" => return PosTag::OtherProperNoun,
            _ => {}
        }
        if tag.starts_with("nr") {
            return PosTag::PersonName;
        }
        if tag.starts_with("ns") {
            return PosTag::PlaceName;
        }
        if tag.starts_with("nt") {
            return PosTag::Organization;
        }

        match tag.chars().next() {
            Some('n') => PosTag::Noun,
            Some('v') => PosTag::Verb,
            Some('a') => PosTag::Adjective,
            Some('d') => PosTag::Adverb,
            Some('r') => PosTag::Pronoun,
            Some('m') => PosTag::Numeral,
            Some('q') => PosTag::Quantifier,
            Some('p') => PosTag::Preposition,
            Some('c') => PosTag::Conjunction,
            Some('u') => PosTag::Auxiliary,
            Some('y') => PosTag::ModalParticle,
            Some('e') => PosTag::Interjection,
            Some('o') => PosTag::Onomatopoeia,
            Some('w') => PosTag::Punctuation,
            Some('t') => PosTag::Time,
            Some('f') => PosTag::Locative,
            Some('s') => PosTag::Place,
            Some('i') => PosTag::Idiom,
            Some('j') => PosTag::Abbreviation,
            Some('l') => PosTag::FixedExpression,
            Some('h') => PosTag::Prefix,
            Some('k') => PosTag::Suffix,
            Some('b') => PosTag::Distinguishing,
            Some('z') => PosTag::Status,
            _ => PosTag::Unknown,
        }
    }

    /// The canonical tag string for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            PosTag::Noun => "n",
            PosTag::PersonName => "nr",
            PosTag::PlaceName => "ns",
            PosTag::Organization => "nt",
            PosTag::OtherProperNoun => "nz",
            PosTag::Verb => "v",
            PosTag::AdverbialVerb => "vd",
            PosTag::NominalVerb => "vn",
            PosTag::Adjective => "a",
            PosTag::AdverbialAdjective => "ad",
            PosTag::NominalAdjective => "an",
            PosTag::Adverb => "d",
            PosTag::Pronoun => "r",
            PosTag::Numeral => "m",
            PosTag::Quantifier => "q",
            PosTag::Preposition => "p",
            PosTag::Conjunction => "c",
            PosTag::Auxiliary => "u",
            PosTag::ModalParticle => "y",
            PosTag::Interjection => "e",
            PosTag::Onomatopoeia => "o",
            PosTag::Punctuation => "w",
            PosTag::Time => "t",
            PosTag::Locative => "f",
            PosTag::Place => "s",
            PosTag::Idiom => "i",
            PosTag::Abbreviation => "j",
            PosTag::FixedExpression => "l",
            PosTag::Prefix => "h",
            PosTag::Suffix => "k",
            PosTag::Distinguishing => "b",
            PosTag::Status => "z",
            PosTag::English => "eng",
            PosTag::Unknown => "x",
        }
    }

    /// Tags a phrase must not end on. The nominal verb `vn` is not included.
    pub fn is_verb_or_adverb(&self) -> bool {
        matches!(self, PosTag::Verb | PosTag::AdverbialVerb | PosTag::Adverb)
    }

    fn bit(self) -> u64 {
        1u64 << (self as u8)
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// POS tag sets
// ============================================================================

/// A finite set of [`PosTag`]s stored as a bitmask
///
/// Serializes as a list of tag strings (`["n", "nr", ...]`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<PosTag>", into = "Vec<PosTag>")]
pub struct PosTagSet(u64);

impl PosTagSet {
    /// The empty set
    pub const fn empty() -> Self {
        PosTagSet(0)
    }

    /// Build a set from a slice of tags
    pub fn from_tags(tags: &[PosTag]) -> Self {
        tags.iter().fold(Self::empty(), |set, &tag| set.with(tag))
    }

    /// Content-word tags admitted for weighting:
    /// `a, ad, an, d, ns, n, nt, nz, vn, v, nr`
    pub fn content_words() -> Self {
        Self::from_tags(&[
            PosTag::Adjective,
            PosTag::AdverbialAdjective,
            PosTag::NominalAdjective,
            PosTag::Adverb,
            PosTag::PlaceName,
            PosTag::Noun,
            PosTag::Organization,
            PosTag::OtherProperNoun,
            PosTag::NominalVerb,
            PosTag::Verb,
            PosTag::PersonName,
        ])
    }

    /// Function-word and punctuation tags restricted inside phrases:
    /// `u, p, c, y, e, o, w, x`
    pub fn function_words() -> Self {
        Self::from_tags(&[
            PosTag::Auxiliary,
            PosTag::Preposition,
            PosTag::Conjunction,
            PosTag::ModalParticle,
            PosTag::Interjection,
            PosTag::Onomatopoeia,
            PosTag::Punctuation,
            PosTag::Unknown,
        ])
    }

    /// Return a copy of the set with `tag` added
    pub fn with(self, tag: PosTag) -> Self {
        PosTagSet(self.0 | tag.bit())
    }

    /// Return a copy of the set with `tag` removed
    pub fn without(self, tag: PosTag) -> Self {
        PosTagSet(self.0 & !tag.bit())
    }

    /// Membership test
    #[inline]
    pub fn contains(&self, tag: PosTag) -> bool {
        self.0 & tag.bit() != 0
    }

    /// Tags present in both sets
    pub fn intersection(&self, other: &PosTagSet) -> PosTagSet {
        PosTagSet(self.0 & other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the tags in declaration order
    pub fn iter(&self) -> impl Iterator<Item = PosTag> {
        let set = *self;
        PosTag::ALL.into_iter().filter(move |tag| set.contains(*tag))
    }
}

impl From<Vec<PosTag>> for PosTagSet {
    fn from(tags: Vec<PosTag>) -> Self {
        Self::from_tags(&tags)
    }
}

impl From<PosTagSet> for Vec<PosTag> {
    fn from(set: PosTagSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Debug for PosTagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|t| t.as_str())).finish()
    }
}

// ============================================================================
// Tokens
// ============================================================================

/// A tagged token from the input text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The surface form
    pub text: String,
    /// Part-of-speech tag assigned by the tagger
    pub pos: PosTag,
    /// Sentence index this token belongs to
    pub sentence_idx: usize,
    /// Token offset within its sentence
    pub offset: usize,
    /// Token index within the document
    pub token_idx: usize,
}

impl Token {
    /// Create a new token
    pub fn new(
        text: impl Into<String>,
        pos: PosTag,
        sentence_idx: usize,
        offset: usize,
        token_idx: usize,
    ) -> Self {
        Self {
            text: text.into(),
            pos,
            sentence_idx,
            offset,
            token_idx,
        }
    }
}

/// A token paired with its document-level weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedToken {
    pub token: Token,
    /// Non-negative weight; 0 for non-content or stop-word tokens
    pub weight: f64,
}

impl WeightedToken {
    pub fn new(token: Token, weight: f64) -> Self {
        Self { token, weight }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.token.text
    }

    #[inline]
    pub fn pos(&self) -> PosTag {
        self.token.pos
    }
}

// ============================================================================
// Output
// ============================================================================

/// An extracted key phrase with its score and location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    /// Concatenated surface form
    pub text: String,
    /// Length-controlled score
    pub score: f64,
    /// Constituent token surfaces, in order
    pub tokens: Vec<String>,
    /// Sentence the phrase was first found in
    pub sentence_idx: usize,
    /// Token offset range `[start, end)` within that sentence
    pub start: usize,
    pub end: usize,
    /// The rank (1-indexed, based on score)
    pub rank: usize,
}

impl Phrase {
    /// Number of tokens in the phrase
    pub fn token_len(&self) -> usize {
        self.tokens.len()
    }
}

/// Formatted extraction result: phrases alone or paired with their scores
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KeyPhrases {
    Plain(Vec<String>),
    Weighted(Vec<(String, f64)>),
}

impl KeyPhrases {
    /// Format ranked phrases, keeping scores only when requested
    pub fn from_phrases(phrases: Vec<Phrase>, with_weight: bool) -> Self {
        if with_weight {
            KeyPhrases::Weighted(phrases.into_iter().map(|p| (p.text, p.score)).collect())
        } else {
            KeyPhrases::Plain(phrases.into_iter().map(|p| p.text).collect())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            KeyPhrases::Plain(v) => v.len(),
            KeyPhrases::Weighted(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Phrase texts in rank order
    pub fn texts(&self) -> Vec<&str> {
        match self {
            KeyPhrases::Plain(v) => v.iter().map(String::as_str).collect(),
            KeyPhrases::Weighted(v) => v.iter().map(|(t, _)| t.as_str()).collect(),
        }
    }
}

// ============================================================================
// Singleton policy
// ============================================================================

/// How single tokens compete with multi-token phrases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingletonPolicy {
    /// Length-1 spans are ordinary candidates under the same filters
    #[default]
    Enumerate,
    /// Only multi-token spans are enumerated; weighted tokens not contained in
    /// any surviving phrase are merged back before ranking
    MergeUnmatched,
}

// ============================================================================
// Configuration
// ============================================================================

/// Per-instance extractor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum phrase length in tokens (at most [`MAX_PHRASE_LENGTH`])
    pub max_phrase_length: usize,
    /// Tags admitted as content words for weighting
    pub content_pos: PosTagSet,
    /// Function-word / punctuation tags restricted inside phrases
    pub exception_pos: PosTagSet,
    /// Per-length score multipliers
    pub length_control: LengthControl,
    /// Whether single tokens are enumerated or merged after dedup
    pub singleton_policy: SingletonPolicy,
    /// Keep non-zero weights only for the N best distinct tokens
    pub top_k_features: Option<usize>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_phrase_length: MAX_PHRASE_LENGTH,
            content_pos: PosTagSet::content_words(),
            exception_pos: PosTagSet::function_words(),
            length_control: LengthControl::default(),
            singleton_policy: SingletonPolicy::Enumerate,
            top_k_features: None,
        }
    }
}

impl ExtractorConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON config; omitted fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ExtractorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_phrase_length == 0 {
            return Err(PhraseError::invalid_config("max_phrase_length must be > 0"));
        }

        if self.max_phrase_length > MAX_PHRASE_LENGTH {
            return Err(PhraseError::invalid_config(format!(
                "max_phrase_length must be <= {}, got {}",
                MAX_PHRASE_LENGTH, self.max_phrase_length
            )));
        }

        let overlap = self.content_pos.intersection(&self.exception_pos);
        if !overlap.is_empty() {
            return Err(PhraseError::invalid_config(format!(
                "content_pos and exception_pos overlap on {:?}",
                overlap
            )));
        }

        self.length_control.validate()?;

        if self.top_k_features == Some(0) {
            return Err(PhraseError::invalid_config("top_k_features must be >= 1"));
        }

        Ok(())
    }

    /// Builder method: set maximum phrase length
    pub fn with_max_phrase_length(mut self, max_phrase_length: usize) -> Self {
        self.max_phrase_length = max_phrase_length;
        self
    }

    /// Builder method: replace the admitted content-word tags
    pub fn with_content_pos(mut self, tags: PosTagSet) -> Self {
        self.content_pos = tags;
        self
    }

    /// Builder method: replace the function-word tags
    pub fn with_exception_pos(mut self, tags: PosTagSet) -> Self {
        self.exception_pos = tags;
        self
    }

    /// Builder method: set the length-control table
    pub fn with_length_control(mut self, length_control: LengthControl) -> Self {
        self.length_control = length_control;
        self
    }

    /// Builder method: set the singleton policy
    pub fn with_singleton_policy(mut self, policy: SingletonPolicy) -> Self {
        self.singleton_policy = policy;
        self
    }

    /// Builder method: cap the number of weighted distinct tokens
    pub fn with_top_k_features(mut self, top_k_features: usize) -> Self {
        self.top_k_features = Some(top_k_features);
        self
    }
}

/// Per-call extraction options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Number of phrases to return (>= 1)
    pub top_k: usize,
    /// Return `(phrase, score)` pairs instead of bare phrases
    pub with_weight: bool,
    /// Maximum number of function-word tokens inside a phrase
    pub func_word_num: usize,
    /// Maximum number of stop-word tokens inside a phrase
    pub stop_word_num: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            with_weight: true,
            func_word_num: 1,
            stop_word_num: 0,
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(PhraseError::invalid_options("top_k must be >= 1"));
        }
        Ok(())
    }

    /// Builder method: set top K
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Builder method: include scores in the output
    pub fn with_weight(mut self, with_weight: bool) -> Self {
        self.with_weight = with_weight;
        self
    }

    /// Builder method: set the function-word allowance
    pub fn with_func_word_num(mut self, func_word_num: usize) -> Self {
        self.func_word_num = func_word_num;
        self
    }

    /// Builder method: set the stop-word allowance
    pub fn with_stop_word_num(mut self, stop_word_num: usize) -> Self {
        self.stop_word_num = stop_word_num;
        self
    }
}
