//! Parsing statistics and result structures for GEF processing

use crate::app::models::Sounding;

/// Parsing result with the scratch sounding and statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub sounding: Sounding,
    pub stats: ParseStats,
}

/// Simple parsing statistics
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    /// Non-blank data rows encountered
    pub total_rows: usize,

    /// Rows removed because a field held its void value
    pub sentinel_rows_removed: usize,

    /// Samples clamped from negative to zero
    pub negatives_clamped: usize,

    /// Fields resolved to a column
    pub fields_resolved: usize,

    /// Optional fields absent from the file
    pub fields_missing: Vec<String>,
}

impl ParseStats {
    pub fn new() -> Self {
        Self {
            total_rows: 0,
            sentinel_rows_removed: 0,
            negatives_clamped: 0,
            fields_resolved: 0,
            fields_missing: Vec::new(),
        }
    }

    /// Rows kept after void removal
    pub fn rows_kept(&self) -> usize {
        self.total_rows.saturating_sub(self.sentinel_rows_removed)
    }

    /// Kept rows as a percentage of all rows
    pub fn retention_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.rows_kept() as f64 / self.total_rows as f64) * 100.0
        }
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}
