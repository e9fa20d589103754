//! Tokenization and part-of-speech tagging
//!
//! The extractor consumes `(token, tag)` pairs through the [`Tagger`] trait.
//! Tags are jieba / ICTCLAS strings and are parsed with
//! [`PosTag::from_tag`](crate::types::PosTag::from_tag) by the extractor.
//!
//! - [`JiebaTagger`]: `jieba-rs` segmentation and tagging over its bundled
//!   dictionary (optionally extended or replaced). The default.
//! - [`LexiconTagger`]: forward maximum matching over a fixed word list.
//!   Output depends only on the given entries, which makes it the tagger of
//!   choice for fixtures and closed vocabularies.

use crate::errors::{CollaboratorError, PhraseError, Result};
use jieba_rs::Jieba;
use rustc_hash::FxHashMap;
use std::fmt;
use std::io::BufRead;
use std::sync::Arc;

/// Ordered `(token, tag)` pairs, or the tagger's own failure
pub type TagResult = std::result::Result<Vec<(String, String)>, CollaboratorError>;

/// Segments a sentence into tagged tokens
pub trait Tagger {
    /// Return the ordered `(token, tag)` pairs of `sentence`
    fn tag(&self, sentence: &str) -> TagResult;
}

impl<F> Tagger for F
where
    F: Fn(&str) -> TagResult,
{
    fn tag(&self, sentence: &str) -> TagResult {
        self(sentence)
    }
}

/// Tagger backed by [`jieba_rs::Jieba`]
///
/// Every character of the sentence ends up in exactly one token, whitespace
/// and punctuation included (both tagged `x`). The dictionary sits behind an
/// `Arc`, so clones share it.
#[derive(Clone)]
pub struct JiebaTagger {
    jieba: Arc<Jieba>,
    hmm: bool,
}

impl JiebaTagger {
    /// Bundled dictionary, HMM discovery of unknown words enabled
    pub fn new() -> Self {
        Self::from_jieba(Jieba::new())
    }

    /// Wrap an already configured segmenter
    pub fn from_jieba(jieba: Jieba) -> Self {
        Self {
            jieba: Arc::new(jieba),
            hmm: true,
        }
    }

    /// Replace the bundled dictionary (`word freq [tag]` per line)
    pub fn with_dict(mut dict: impl BufRead) -> Result<Self> {
        let jieba = Jieba::with_dict(&mut dict).map_err(PhraseError::Dictionary)?;
        Ok(Self::from_jieba(jieba))
    }

    /// Bundled dictionary extended with user entries (`word freq [tag]`)
    pub fn with_user_dict(mut dict: impl BufRead) -> Result<Self> {
        let mut jieba = Jieba::new();
        jieba.load_dict(&mut dict).map_err(PhraseError::Dictionary)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("loaded user dictionary on top of the bundled one");

        Ok(Self::from_jieba(jieba))
    }

    /// Toggle HMM discovery of out-of-vocabulary words
    pub fn with_hmm(mut self, hmm: bool) -> Self {
        self.hmm = hmm;
        self
    }

    pub fn hmm(&self) -> bool {
        self.hmm
    }

    /// Segment and tag `sentence`
    pub fn tag_sentence(&self, sentence: &str) -> Vec<(String, String)> {
        self.jieba
            .tag(sentence, self.hmm)
            .into_iter()
            .map(|t| (t.word.to_string(), t.tag.to_string()))
            .collect()
    }
}

impl Default for JiebaTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for JiebaTagger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiebaTagger")
            .field("hmm", &self.hmm)
            .finish_non_exhaustive()
    }
}

impl Tagger for JiebaTagger {
    fn tag(&self, sentence: &str) -> TagResult {
        Ok(self.tag_sentence(sentence))
    }
}

/// Forward-maximum-matching tagger over a word → tag lexicon
///
/// Characters not covered by the lexicon fall back to:
/// - runs of ASCII digits → `m`
/// - runs of ASCII letters → `eng`
/// - punctuation → `w`
/// - runs of whitespace → `x`
/// - anything else → single-character `x`
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    lexicon: FxHashMap<String, String>,
    /// Longest lexicon entry, in chars
    max_word_chars: usize,
}

impl LexiconTagger {
    /// Create a tagger with an empty lexicon
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tagger from `(word, tag)` pairs
    pub fn from_entries<I, W, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (W, T)>,
        W: Into<String>,
        T: Into<String>,
    {
        let mut tagger = Self::new();
        for (word, tag) in entries {
            tagger.insert(word, tag);
        }
        tagger
    }

    /// Add or replace a lexicon entry. Empty words are ignored.
    pub fn insert(&mut self, word: impl Into<String>, tag: impl Into<String>) {
        let word = word.into();
        let chars = word.chars().count();
        if chars == 0 {
            return;
        }
        self.max_word_chars = self.max_word_chars.max(chars);
        self.lexicon.insert(word, tag.into());
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    /// Segment and tag `sentence`
    pub fn tag_sentence(&self, sentence: &str) -> Vec<(String, String)> {
        // Byte offset of every char boundary, including the end of the string
        let bounds: Vec<usize> = sentence
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(sentence.len()))
            .collect();
        let num_chars = bounds.len() - 1;

        let mut tagged = Vec::new();
        let mut i = 0;

        while i < num_chars {
            let c = sentence[bounds[i]..].chars().next().unwrap_or_default();

            if let Some((len, tag)) = self.longest_match(sentence, &bounds, i) {
                tagged.push((sentence[bounds[i]..bounds[i + len]].to_string(), tag.to_string()));
                i += len;
                continue;
            }

            let (len, tag) = if c.is_whitespace() {
                (run_length(sentence, &bounds, i, char::is_whitespace), "x")
            } else if c.is_ascii_digit() {
                (run_length(sentence, &bounds, i, |ch| ch.is_ascii_digit()), "m")
            } else if c.is_ascii_alphabetic() {
                (run_length(sentence, &bounds, i, |ch| ch.is_ascii_alphabetic()), "eng")
            } else if is_punctuation(c) {
                (1, "w")
            } else {
                (1, "x")
            };
            tagged.push((sentence[bounds[i]..bounds[i + len]].to_string(), tag.to_string()));
            i += len;
        }

        tagged
    }

    fn longest_match<'a>(
        &'a self,
        sentence: &str,
        bounds: &[usize],
        start: usize,
    ) -> Option<(usize, &'a str)> {
        let available = bounds.len() - 1 - start;
        let longest = self.max_word_chars.min(available);

        (1..=longest).rev().find_map(|len| {
            let word = &sentence[bounds[start]..bounds[start + len]];
            self.lexicon.get(word).map(|tag| (len, tag.as_str()))
        })
    }
}

impl Tagger for LexiconTagger {
    fn tag(&self, sentence: &str) -> TagResult {
        Ok(self.tag_sentence(sentence))
    }
}

fn run_length(
    sentence: &str,
    bounds: &[usize],
    start: usize,
    pred: impl Fn(char) -> bool,
) -> usize {
    sentence[bounds[start]..]
        .chars()
        .take_while(|&ch| pred(ch))
        .count()
}

/// ASCII punctuation plus the CJK and full-width punctuation blocks
fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{2010}'..='\u{206F}'
                | '\u{3000}'..='\u{303F}'
                | '\u{FF01}'..='\u{FF0F}'
                | '\u{FF1A}'..='\u{FF20}'
                | '\u{FF3B}'..='\u{FF40}'
                | '\u{FF5B}'..='\u{FF65}'
        )
}
