//! Natural Language Processing components
//!
//! Lexical resources (stop words, IDF) and the collaborator boundaries for
//! sentence splitting and tagging.

pub mod idf;
pub mod segmenter;
pub mod stopwords;
pub mod tagger;
