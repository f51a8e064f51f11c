//! Processing statistics for single soundings and batches
//!
//! [`ProcessingStats`] follows one sounding through the pipeline;
//! [`BatchStats`] tallies outcomes over many files.

use super::depth::DepthSource;
use crate::app::models::Rejection;
use std::collections::BTreeMap;

/// Row accounting for one processed sounding
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessingStats {
    /// Rows handed over by the reader
    pub input_rows: usize,
    /// Rows dropped for a missing value in any channel
    pub incomplete_rows_removed: usize,
    /// Rows dropped for repeating a penetration length
    pub duplicate_rows_removed: usize,
    /// Rows synthesized above the first measurement
    pub synthetic_rows_added: usize,
    /// Negative tip, friction and friction ratio values set to zero
    pub values_clamped: usize,
    /// Rows in the canonical record
    pub output_rows: usize,
    pub depth_source: Option<DepthSource>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of measured rows that survived cleaning
    pub fn retention_rate(&self) -> f64 {
        if self.input_rows == 0 {
            return 0.0;
        }
        let kept = self
            .input_rows
            .saturating_sub(self.incomplete_rows_removed + self.duplicate_rows_removed);
        (kept as f64 / self.input_rows as f64) * 100.0
    }
}

/// Outcome tallies over a batch of files
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchStats {
    pub total_files: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Files that could not be read at all
    pub failed: usize,
    /// Rejection counts keyed by reason
    pub rejection_reasons: BTreeMap<String, usize>,
    pub error_messages: Vec<String>,
    pub total_samples: usize,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&mut self, samples: usize) {
        self.total_files += 1;
        self.accepted += 1;
        self.total_samples += samples;
    }

    pub fn record_rejected(&mut self, rejection: &Rejection) {
        self.total_files += 1;
        self.rejected += 1;
        *self
            .rejection_reasons
            .entry(rejection.reason.to_string())
            .or_insert(0) += 1;
    }

    pub fn record_failure(&mut self, message: String) {
        self.total_files += 1;
        self.failed += 1;
        self.error_messages.push(message);
    }

    /// Percentage of files accepted
    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            100.0
        } else {
            (self.accepted as f64 / self.total_files as f64) * 100.0
        }
    }

    /// True when no file failed outright
    pub fn is_successful(&self) -> bool {
        self.failed == 0
    }

    /// One line summary
    pub fn summary(&self) -> String {
        format!(
            "{} files: {} accepted, {} rejected, {} failed ({:.1}% accepted)",
            self.total_files,
            self.accepted,
            self.rejected,
            self.failed,
            self.success_rate()
        )
    }
}
