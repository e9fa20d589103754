//! Pipeline observer: hooks for logging, profiling, and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. Use them to time stages, capture intermediate artifacts or
//! emit structured telemetry.

use crate::phrase::candidates::{Candidate, CandidateSet};
use crate::phrase::dedup::DroppedCandidate;
use crate::types::{Phrase, Token, WeightedToken};
use std::time::{Duration, Instant};

// ============================================================================
// Stage names
// ============================================================================

pub const STAGE_SEGMENT: &str = "segment";
pub const STAGE_WEIGHT: &str = "weight";
pub const STAGE_CANDIDATES: &str = "candidates";
pub const STAGE_DEDUP: &str = "dedup";
pub const STAGE_RANK: &str = "rank";

/// All stages in execution order
pub const STAGES: [&str; 5] = [
    STAGE_SEGMENT,
    STAGE_WEIGHT,
    STAGE_CANDIDATES,
    STAGE_DEDUP,
    STAGE_RANK,
];

// ============================================================================
// Stage reports
// ============================================================================

/// Monotonic stopwatch for a single stage
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    started: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// What a stage did: elapsed time plus optional item counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageReport {
    elapsed: Duration,
    input_items: Option<usize>,
    output_items: Option<usize>,
}

impl StageReport {
    /// A report carrying only the elapsed time
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Items the stage consumed (tokens, candidates, ...)
    pub fn input_items(&self) -> Option<usize> {
        self.input_items
    }

    /// Items the stage produced
    pub fn output_items(&self) -> Option<usize> {
        self.output_items
    }
}

/// Fluent construction of a [`StageReport`] with counts
#[derive(Debug, Clone, Copy)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: StageReport::new(elapsed),
        }
    }

    pub fn input_items(mut self, n: usize) -> Self {
        self.report.input_items = Some(n);
        self
    }

    pub fn output_items(mut self, n: usize) -> Self {
        self.report.output_items = Some(n);
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

// ============================================================================
// Observer trait
// ============================================================================

/// Callbacks at stage boundaries and on intermediate artifacts
///
/// Every method has an empty default, so implementors override only what
/// they need.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// Tagged tokens, one vector per sentence
    fn on_sentences(&mut self, _sentences: &[Vec<Token>]) {}

    /// Weighted tokens, one vector per sentence
    fn on_weights(&mut self, _weighted: &[Vec<WeightedToken>]) {}

    fn on_candidates(&mut self, _candidates: &CandidateSet) {}

    /// Survivors and rejects of redundancy filtering
    fn on_dedup(&mut self, _kept: &[Candidate], _dropped: &[DroppedCandidate]) {}

    /// Final ranked phrases
    fn on_phrases(&mut self, _phrases: &[Phrase]) {}
}

/// Ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Records the report of every completed stage, in order
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    /// Report of `stage`, if it completed
    pub fn report(&self, stage: &str) -> Option<&StageReport> {
        self.reports
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, r)| r)
    }

    pub fn total_elapsed(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, *report));
    }
}
