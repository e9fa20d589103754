//! Extraction pipeline plumbing
//!
//! Stage names, per-stage reports and the observer hooks the extractor
//! notifies while it runs.

pub mod observer;
