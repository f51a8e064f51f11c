//! Vertical depth reconstruction
//!
//! A sounding delivers penetration length along the rod. The vertical depth is
//! taken from a measured depth column when it is usable, otherwise derived from
//! the resultant inclination, otherwise the penetration length is used as is.

use crate::app::models::{Channel, SampleTable};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Where the reconstructed depth came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthSource {
    Measured,
    Inclination,
    PenetrationLength,
}

impl fmt::Display for DepthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthSource::Measured => write!(f, "measured depth"),
            DepthSource::Inclination => write!(f, "inclination corrected"),
            DepthSource::PenetrationLength => write!(f, "penetration length"),
        }
    }
}

/// Reconstructs vertical depth from the channels of a sample table
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthReconstructor;

impl DepthReconstructor {
    pub fn new() -> Self {
        Self
    }

    /// Compute depth for every row of `samples`
    ///
    /// # Arguments
    ///
    /// * `samples` - Sample table holding at least a penetration length column
    ///
    /// # Returns
    ///
    /// The depth column and the source it was derived from
    pub fn reconstruct(&self, samples: &SampleTable) -> Result<(Vec<f64>, DepthSource)> {
        let penetration_length = samples
            .values(Channel::PenetrationLength)
            .ok_or_else(|| Error::data_validation("No penetration length to derive depth from"))?;

        if let Some(depth) = usable(samples.get(Channel::Depth)) {
            debug!("Using measured depth");
            return Ok((depth, DepthSource::Measured));
        }

        if let Some(inclination) = usable(samples.get(Channel::InclinationResultant)) {
            debug!("Correcting penetration length for inclination");
            return Ok((
                inclination_corrected(&penetration_length, &inclination),
                DepthSource::Inclination,
            ));
        }

        Ok((penetration_length, DepthSource::PenetrationLength))
    }
}

/// Depth from penetration length and resultant inclination in degrees
///
/// Each penetration increment is projected on the vertical using the
/// inclination at the start of the increment.
pub fn inclination_corrected(penetration_length: &[f64], inclination: &[f64]) -> Vec<f64> {
    let Some(&start) = penetration_length.first() else {
        return Vec::new();
    };

    let mut depth = Vec::with_capacity(penetration_length.len());
    depth.push(start);
    let mut current = start;
    for (window, angle) in penetration_length.windows(2).zip(inclination) {
        current += (window[1] - window[0]) * angle.to_radians().cos();
        depth.push(current);
    }
    depth
}

/// A column is usable when every sample is present, finite and non-zero
fn usable(column: Option<&[Option<f64>]>) -> Option<Vec<f64>> {
    let column = column?;
    if column.is_empty() {
        return None;
    }
    column
        .iter()
        .map(|value| value.filter(|v| v.is_finite() && *v != 0.0))
        .collect()
}
