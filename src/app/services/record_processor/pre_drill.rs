//! Synthetic samples for the pre-drilled top of a sounding
//!
//! When the top of a hole was excavated before the cone was pushed, the
//! sounding has no samples for that section. The padder fills it with
//! synthetic rows so the record starts at the surface.

use crate::app::models::{Channel, SampleTable};
use crate::config::PreDrillConfig;
use crate::constants::MAX_SYNTHETIC_ROWS_PER_SAMPLE;
use crate::{Error, Result};
use tracing::{debug, warn};

/// What the padder changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaddingSummary {
    /// Rows synthesized for the pre-drilled section
    pub synthetic_rows: usize,
    /// Depth was shifted to start at zero
    pub shifted: bool,
    /// A surface row was added by [`fill_missing_top`]
    pub top_row_added: bool,
}

impl PaddingSummary {
    pub fn rows_added(&self) -> usize {
        self.synthetic_rows + usize::from(self.top_row_added)
    }
}

/// Pads the pre-drilled section of a sample table
#[derive(Debug, Clone)]
pub struct PreDrillPadder {
    average_samples: usize,
}

impl PreDrillPadder {
    pub fn new(config: &PreDrillConfig) -> Self {
        Self {
            average_samples: config.average_samples.max(1),
        }
    }

    /// Pad `samples` for a pre-drilled depth
    ///
    /// The table must hold a complete `Depth` column. Synthetic rows are placed
    /// at the median sample spacing from the surface down to `pre_drill`, and the
    /// real samples are moved to follow them.
    pub fn pad(&self, pre_drill: f64, samples: &mut SampleTable) -> Result<PaddingSummary> {
        let depth = depth_column(samples)?;
        let mut summary = PaddingSummary::default();
        let Some(&first_depth) = depth.first() else {
            return Ok(summary);
        };

        if !pre_drill.is_finite() {
            warn!("Ignoring non-finite pre-drill depth {}", pre_drill);
        } else if pre_drill > 0.0 {
            let spacing = median_spacing(&depth);
            let limit = depth.len() * MAX_SYNTHETIC_ROWS_PER_SAMPLE;
            if !(spacing.is_finite() && spacing > 0.0) {
                warn!(
                    "Cannot pad pre-drill of {} m, sample spacing is {}",
                    pre_drill, spacing
                );
            } else if (pre_drill / spacing).ceil() > limit as f64 {
                warn!(
                    "Cannot pad pre-drill of {} m at {} m spacing, more than {} rows needed",
                    pre_drill, spacing, limit
                );
            } else {
                let count = (pre_drill / spacing).ceil() as usize;
                self.prepend_synthetic(samples, &depth, count, spacing)?;
                summary.synthetic_rows = count;
                debug!(
                    "Added {} synthetic rows for {} m pre-drill at {} m spacing",
                    count, pre_drill, spacing
                );
            }
        } else if pre_drill == 0.0 {
            let shifted: Vec<f64> = depth.iter().map(|d| d - first_depth).collect();
            samples.insert_values(Channel::Depth, shifted)?;
            summary.shifted = true;
        } else {
            warn!("Ignoring negative pre-drill depth {}", pre_drill);
        }

        summary.top_row_added = fill_missing_top(samples, self.average_samples)?;
        Ok(summary)
    }

    fn prepend_synthetic(
        &self,
        samples: &mut SampleTable,
        depth: &[f64],
        count: usize,
        spacing: f64,
    ) -> Result<()> {
        let synthetic: Vec<f64> = (0..count).map(|i| i as f64 * spacing).collect();
        let last_synthetic = synthetic.last().copied().unwrap_or(0.0);
        let first_depth = depth[0];
        let averages = self.average_samples;

        samples.prepend_rows(count, |channel, column| match channel {
            Channel::PenetrationLength | Channel::Depth => {
                synthetic.iter().copied().map(Some).collect()
            }
            Channel::Tip | Channel::Friction | Channel::FrictionRatio => {
                vec![leading_mean(column, averages); count]
            }
            Channel::PorePressureU1 | Channel::PorePressureU2 | Channel::PorePressureU3 => {
                let first = column.first().copied().flatten().unwrap_or(0.0);
                (0..count)
                    .map(|i| Some(i as f64 * first / count as f64))
                    .collect()
            }
            Channel::InclinationResultant => vec![None; count],
        })?;

        let mut padded = synthetic;
        padded.extend(
            depth
                .iter()
                .map(|d| last_synthetic + spacing + (d - first_depth)),
        );
        samples.insert_values(Channel::Depth, padded)
    }
}

/// Prepend a surface row when the first depth is below zero depth
///
/// The row sits at depth and penetration length zero; every other channel gets
/// the mean of its first `average_samples` values. Returns whether a row was added.
pub fn fill_missing_top(samples: &mut SampleTable, average_samples: usize) -> Result<bool> {
    let depth = depth_column(samples)?;
    match depth.first() {
        Some(first) if *first > 0.0 => {}
        _ => return Ok(false),
    }

    let averages = average_samples.max(1);
    samples.prepend_rows(1, |channel, column| match channel {
        Channel::PenetrationLength | Channel::Depth => vec![Some(0.0)],
        _ => vec![leading_mean(column, averages)],
    })?;
    debug!("Added surface row above first depth {}", depth[0]);
    Ok(true)
}

fn depth_column(samples: &SampleTable) -> Result<Vec<f64>> {
    samples
        .values(Channel::Depth)
        .ok_or_else(|| Error::data_validation("Pre-drill padding needs a depth column"))
}

/// Mean of the present values among the first `count` samples
fn leading_mean(column: &[Option<f64>], count: usize) -> Option<f64> {
    let present: Vec<f64> = column.iter().take(count).flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

/// Median of successive depth differences; NaN for fewer than two samples
pub fn median_spacing(depth: &[f64]) -> f64 {
    let mut diffs: Vec<f64> = depth.windows(2).map(|w| w[1] - w[0]).collect();
    if diffs.is_empty() {
        return f64::NAN;
    }
    diffs.sort_by(f64::total_cmp);
    let mid = diffs.len() / 2;
    if diffs.len() % 2 == 0 {
        (diffs[mid - 1] + diffs[mid]) / 2.0
    } else {
        diffs[mid]
    }
}
