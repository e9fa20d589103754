//! Error types for rapid_phrases
//!
//! Resource loading is the only place the crate can fail on its own. Everything
//! downstream of the token weights is a pure transformation; collaborator
//! failures (tagger, sentence splitter) are carried through untouched.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by external collaborators.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PhraseError>;

/// Errors produced while building an extractor or running an extraction
#[derive(Debug, Error)]
pub enum PhraseError {
    /// A resource file could not be opened or read
    #[error("failed to read {resource} from {}: {source}", path.display())]
    ResourceIo {
        resource: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A resource stream failed mid-read (no path available)
    #[error("failed to read {resource}: {source}")]
    ResourceRead {
        resource: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A line of the IDF table could not be parsed
    #[error("malformed IDF entry on line {line}: {message}")]
    MalformedIdf { line: usize, message: String },

    /// A tagger dictionary could not be loaded
    #[error("failed to load tagger dictionary: {0}")]
    Dictionary(#[source] jieba_rs::Error),

    /// The IDF table contained no entries, so no median fallback exists
    #[error("IDF table is empty")]
    EmptyIdfTable,

    /// Extractor configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Per-call options failed validation
    #[error("invalid extraction options: {0}")]
    InvalidOptions(String),

    /// The configuration JSON could not be parsed
    #[error("invalid configuration JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),

    /// The sentence splitter reported a failure
    #[error("sentence splitter failed: {0}")]
    Splitter(#[source] CollaboratorError),

    /// The tagger reported a failure for a sentence
    #[error("tagger failed on sentence {sentence_idx}: {source}")]
    Tagger {
        sentence_idx: usize,
        #[source]
        source: CollaboratorError,
    },
}

impl PhraseError {
    /// Build an [`PhraseError::InvalidConfig`] from any message
    pub fn invalid_config(message: impl Into<String>) -> Self {
        PhraseError::InvalidConfig(message.into())
    }

    /// Build an [`PhraseError::InvalidOptions`] from any message
    pub fn invalid_options(message: impl Into<String>) -> Self {
        PhraseError::InvalidOptions(message.into())
    }

    /// Build an [`PhraseError::MalformedIdf`] for a 1-based line number
    pub fn malformed_idf(line: usize, message: impl Into<String>) -> Self {
        PhraseError::MalformedIdf {
            line,
            message: message.into(),
        }
    }

    /// Returns `true` for errors raised while loading lexical resources
    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            PhraseError::ResourceIo { .. }
                | PhraseError::ResourceRead { .. }
                | PhraseError::MalformedIdf { .. }
                | PhraseError::EmptyIdfTable
                | PhraseError::Dictionary(_)
        )
    }
}
