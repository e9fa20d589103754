//! Inverse document frequency table
//!
//! Parsed from lines of `token <whitespace> idf`. The median of all values is
//! computed once at construction and serves as the fallback for tokens that
//! are not in the vocabulary.

use crate::errors::{PhraseError, Result};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Immutable IDF lookup with a median fallback
#[derive(Debug, Clone)]
pub struct IdfTable {
    values: FxHashMap<String, f64>,
    median: f64,
}

impl IdfTable {
    /// Build a table from `(token, idf)` pairs
    ///
    /// Values must be finite and strictly positive. Later duplicates overwrite
    /// earlier ones. Fails on an empty input since no median exists.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut values = FxHashMap::default();
        for (idx, (token, value)) in entries.into_iter().enumerate() {
            let token = token.into();
            check_value(idx + 1, &token, value)?;
            values.insert(token, value);
        }
        Self::with_values(values)
    }

    /// Parse an IDF table from a reader
    ///
    /// Blank lines are skipped. Every other line must hold exactly a token and
    /// a float; anything else aborts with [`PhraseError::MalformedIdf`].
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut values = FxHashMap::default();

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|source| PhraseError::ResourceRead {
                resource: "IDF table",
                source,
            })?;

            let mut fields = line.split_whitespace();
            let Some(token) = fields.next() else {
                continue;
            };
            let raw = fields
                .next()
                .ok_or_else(|| PhraseError::malformed_idf(line_no, "missing IDF value"))?;
            if fields.next().is_some() {
                return Err(PhraseError::malformed_idf(
                    line_no,
                    "expected exactly `token value`",
                ));
            }

            let value: f64 = raw.parse().map_err(|_| {
                PhraseError::malformed_idf(line_no, format!("`{raw}` is not a number"))
            })?;
            check_value(line_no, token, value)?;
            values.insert(token.to_string(), value);
        }

        Self::with_values(values)
    }

    /// Load an IDF table from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PhraseError::ResourceIo {
            resource: "IDF table",
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    fn with_values(values: FxHashMap<String, f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(PhraseError::EmptyIdfTable);
        }

        let mut sorted: Vec<f64> = values.values().copied().collect();
        sorted.sort_by(f64::total_cmp);
        let median = sorted[sorted.len() / 2];

        #[cfg(feature = "tracing")]
        tracing::debug!(entries = values.len(), median, "loaded IDF table");

        Ok(Self { values, median })
    }

    /// IDF of `token`, or the median for out-of-vocabulary tokens
    #[inline]
    pub fn idf(&self, token: &str) -> f64 {
        self.values.get(token).copied().unwrap_or(self.median)
    }

    /// IDF of `token` only if it is in the vocabulary
    pub fn get(&self, token: &str) -> Option<f64> {
        self.values.get(token).copied()
    }

    /// The out-of-vocabulary fallback
    pub fn median(&self) -> f64 {
        self.median
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn check_value(line: usize, token: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PhraseError::malformed_idf(
            line,
            format!("IDF for `{token}` must be positive and finite, got {value}"),
        ));
    }
    Ok(())
}
