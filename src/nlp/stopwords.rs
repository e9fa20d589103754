//! Stopword filtering
//!
//! Stop words are loaded once from a plain word list (whitespace or newline
//! separated) and are read-only afterwards. A small built-in Chinese list is
//! available for callers that do not ship a resource file.

use crate::errors::{PhraseError, Result};
use rustc_hash::FxHashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A filter for recognising stop words
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    /// Set of stopwords (lowercase unless case-sensitive)
    stopwords: FxHashSet<String>,
    /// Whether the filter is case-sensitive
    case_sensitive: bool,
}

impl StopwordFilter {
    /// Create an empty stopword filter (no filtering)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a stopword filter from a custom list
    pub fn from_list(words: &[&str]) -> Self {
        let stopwords: FxHashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
        Self {
            stopwords,
            case_sensitive: false,
        }
    }

    /// Parse a stop-word list from a reader
    ///
    /// Every whitespace-separated word is a stop word, so both one-per-line
    /// files and space-separated lists are accepted. An empty list is valid.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut content = String::new();
        BufReader::new(reader)
            .read_to_string(&mut content)
            .map_err(|source| PhraseError::ResourceRead {
                resource: "stop-word list",
                source,
            })?;

        let stopwords: FxHashSet<String> =
            content.split_whitespace().map(|w| w.to_lowercase()).collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(count = stopwords.len(), "loaded stop-word list");

        Ok(Self {
            stopwords,
            case_sensitive: false,
        })
    }

    /// Load a stop-word list from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PhraseError::ResourceIo {
            resource: "stop-word list",
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Common Chinese stopwords
    pub fn chinese() -> Self {
        Self::from_list(&[
            "的", "是", "在", "有", "和", "与", "或", "不", "了", "也", "就", "都", "而", "及",
            "这", "那", "个", "为", "以", "等", "但", "被", "给", "让", "把", "从", "到", "对",
            "将", "于", "能", "会", "可", "要", "很", "还", "更", "最", "只", "已", "又", "再",
            "之", "其", "此", "着", "过", "吗", "呢", "吧", "啊", "我", "你", "他", "她", "它",
            "我们", "你们", "他们", "这个", "那个", "一个", "没有", "因为", "所以", "如果",
        ])
    }

    /// Set case sensitivity
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Add additional stopwords to the filter
    pub fn add_stopwords(&mut self, words: &[&str]) {
        for word in words {
            self.stopwords.insert(word.to_lowercase());
        }
    }

    /// Remove stopwords from the filter
    pub fn remove_stopwords(&mut self, words: &[&str]) {
        for word in words {
            self.stopwords.remove(&word.to_lowercase());
        }
    }

    /// Check if a word is a stopword
    pub fn is_stopword(&self, word: &str) -> bool {
        // CJK text has no case; skip the allocation when nothing would change
        if self.case_sensitive || !word.chars().any(char::is_uppercase) {
            self.stopwords.contains(word)
        } else {
            self.stopwords.contains(&word.to_lowercase())
        }
    }

    /// Get the number of stopwords in the filter
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Check if the filter is empty
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
