//! # rapid_phrases
//!
//! Key-phrase extraction for Chinese text.
//!
//! Keyword extractors return disconnected single tokens. This crate
//! recombines adjacent weighted tokens into multi-word phrases, scores them
//! with a length prior, and prunes phrases that repeat what a longer one
//! already says.
//!
//! Tokenization, tagging and sentence splitting are pluggable collaborators
//! ([`Tagger`], [`SentenceSplitter`]). Out of the box, text is segmented and
//! tagged by `jieba-rs` through [`JiebaTagger`]; [`LexiconTagger`] covers
//! closed vocabularies. The stop-word list and IDF table are loaded once into
//! [`LexicalResources`] and shared read-only.
//!
//! ## Example
//!
//! With a fixed vocabulary, so the segmentation is fully determined:
//!
//! ```
//! use std::sync::Arc;
//! use rapid_phrases::{
//!     ExtractOptions, IdfTable, LexicalResources, LexiconTagger, PhraseExtractor,
//!     StopwordFilter,
//! };
//!
//! let resources = Arc::new(LexicalResources::new(
//!     StopwordFilter::from_list(&["的"]),
//!     IdfTable::from_entries([("巴黎圣母院", 12.0), ("火灾", 8.0)]).unwrap(),
//! ));
//! let tagger = LexiconTagger::from_entries([
//!     ("巴黎圣母院", "ns"),
//!     ("的", "uj"),
//!     ("火灾", "n"),
//! ]);
//! let extractor = PhraseExtractor::with_tagger(resources, tagger).unwrap();
//!
//! let phrases = extractor
//!     .extract("巴黎圣母院的火灾。", &ExtractOptions::default().with_top_k(3))
//!     .unwrap();
//! assert!(!phrases.is_empty());
//! ```
//!
//! [`PhraseExtractor::from_resources`] builds the jieba-backed default.

pub mod errors;
pub mod nlp;
pub mod phrase;
pub mod pipeline;
pub mod resources;
pub mod types;

pub use errors::{CollaboratorError, PhraseError, Result};
pub use nlp::idf::IdfTable;
pub use nlp::segmenter::{PunctuationSplitter, SentenceSplitter};
pub use nlp::stopwords::StopwordFilter;
pub use nlp::tagger::{JiebaTagger, LexiconTagger, TagResult, Tagger};
pub use phrase::candidates::{
    Candidate, CandidateGenerator, CandidateSet, FilterLimits, LengthControl, Rejection,
};
pub use phrase::dedup::{deduplicate, deduplicate_with_diagnostics, DroppedCandidate};
pub use phrase::extraction::PhraseExtractor;
pub use phrase::ranking::{merge_unmatched_tokens, rank};
pub use phrase::weighting::{WeightTable, Weighting};
pub use pipeline::observer::{NoopObserver, PipelineObserver, StageReport, StageTimingObserver};
pub use resources::LexicalResources;
pub use types::{
    ExtractOptions, ExtractorConfig, KeyPhrases, Phrase, PosTag, PosTagSet, SingletonPolicy, Token,
    WeightedToken, MAX_PHRASE_LENGTH,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
