//! Sentence segmentation
//!
//! The extractor consumes sentences through the [`SentenceSplitter`] trait.
//! [`PunctuationSplitter`] is the default implementation; closures of the
//! matching signature also implement the trait.

use crate::errors::CollaboratorError;

/// Splits raw text into sentences
///
/// # Contract
///
/// - Deterministic: the same text always yields the same sentences.
/// - A trailing segment without a terminator is still returned.
/// - Errors are surfaced to the caller of the extractor unchanged.
pub trait SentenceSplitter {
    fn split(&self, text: &str) -> Result<Vec<String>, CollaboratorError>;
}

impl<F> SentenceSplitter for F
where
    F: Fn(&str) -> Result<Vec<String>, CollaboratorError>,
{
    fn split(&self, text: &str) -> Result<Vec<String>, CollaboratorError> {
        self(text)
    }
}

const DEFAULT_TERMINATORS: &[char] = &['。', '！', '？', '!', '?', '；', ';', '…', '\n'];

/// Closing marks that stay attached to the sentence they end
const CLOSERS: &[char] = &['”', '’', '」', '』', '）', ')', '"', '\'', '】', '》'];

/// Punctuation-delimited sentence splitter
///
/// A sentence ends after a terminator. Runs of terminators (`！！`, `……`) and
/// closing quotes or brackets right after them stay with the sentence.
/// Whitespace-only segments are skipped and each sentence is trimmed.
#[derive(Debug, Clone)]
pub struct PunctuationSplitter {
    terminators: Vec<char>,
}

impl Default for PunctuationSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl PunctuationSplitter {
    /// Create a splitter with the default terminators `。！？!?；;…` and newline
    pub fn new() -> Self {
        Self {
            terminators: DEFAULT_TERMINATORS.to_vec(),
        }
    }

    /// Create a splitter with custom terminators
    pub fn with_terminators(terminators: &[char]) -> Self {
        Self {
            terminators: terminators.to_vec(),
        }
    }

    fn is_terminator(&self, c: char) -> bool {
        self.terminators.contains(&c)
    }

    /// Split `text` into trimmed, non-empty sentences
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            current.push(c);
            if !self.is_terminator(c) {
                continue;
            }

            while let Some(&next) = chars.peek() {
                if self.is_terminator(next) || CLOSERS.contains(&next) {
                    current.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            push_trimmed(&mut sentences, &mut current);
        }
        push_trimmed(&mut sentences, &mut current);

        sentences
    }
}

impl SentenceSplitter for PunctuationSplitter {
    fn split(&self, text: &str) -> Result<Vec<String>, CollaboratorError> {
        Ok(self.split_sentences(text))
    }
}

fn push_trimmed(sentences: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}
