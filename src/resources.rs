//! Read-only lexical resources shared by every extraction
//!
//! Built once at startup and injected into the extractor. Share across
//! threads with an `Arc`; nothing here is mutated after construction.

use crate::errors::Result;
use crate::nlp::idf::IdfTable;
use crate::nlp::stopwords::StopwordFilter;
use std::io::{BufRead, Read};
use std::path::Path;

/// Stop-word set and IDF table
#[derive(Debug, Clone)]
pub struct LexicalResources {
    stopwords: StopwordFilter,
    idf: IdfTable,
}

impl LexicalResources {
    /// Bundle already-built resources
    pub fn new(stopwords: StopwordFilter, idf: IdfTable) -> Self {
        Self { stopwords, idf }
    }

    /// Parse both resources from readers
    pub fn from_readers(stopwords: impl Read, idf: impl BufRead) -> Result<Self> {
        Ok(Self {
            stopwords: StopwordFilter::from_reader(stopwords)?,
            idf: IdfTable::from_reader(idf)?,
        })
    }

    /// Load both resources from files. Any failure aborts construction.
    pub fn from_paths(stopwords: impl AsRef<Path>, idf: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            stopwords: StopwordFilter::from_path(stopwords)?,
            idf: IdfTable::from_path(idf)?,
        })
    }

    pub fn stopwords(&self) -> &StopwordFilter {
        &self.stopwords
    }

    pub fn idf(&self) -> &IdfTable {
        &self.idf
    }
}
