//! Quality gate for soundings
//!
//! Each check either passes or produces a [`Rejection`]. Rejections are values:
//! a sounding that fails a check is unusable, not unreadable.

use crate::app::models::{Channel, Rejection, RejectionReason, SampleTable};
use crate::config::QualityControlConfig;
use tracing::debug;

/// Threshold checks applied by the record processor
#[derive(Debug, Clone)]
pub struct QualityGate {
    config: QualityControlConfig,
}

impl QualityGate {
    pub fn new(config: QualityControlConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QualityControlConfig {
        &self.config
    }

    /// Reject a sounding without samples
    pub fn check_not_empty(&self, record_id: &str, samples: &SampleTable) -> Result<(), Rejection> {
        if samples.is_empty() {
            return Err(Rejection::new(record_id, RejectionReason::Empty));
        }
        Ok(())
    }

    /// Reject a sounding whose primary channels contain only zeros
    pub fn check_not_all_zero(
        &self,
        record_id: &str,
        samples: &SampleTable,
    ) -> Result<(), Rejection> {
        for channel in Channel::PRIMARY {
            if let Some(values) = samples.get(channel) {
                if !values.is_empty() && values.iter().all(|v| *v == Some(0.0)) {
                    return Err(Rejection::new(
                        record_id,
                        RejectionReason::AllZero {
                            channel: channel.name().to_string(),
                        },
                    ));
                }
            }
        }
        Ok(())
    }

    /// Reject a sounding shorter than the minimum length
    pub fn check_minimum_length(
        &self,
        record_id: &str,
        samples: &SampleTable,
    ) -> Result<(), Rejection> {
        let Some(minimum) = self.config.minimum_length else {
            return Ok(());
        };
        let length = samples
            .get(Channel::PenetrationLength)
            .into_iter()
            .flatten()
            .flatten()
            .map(|v| v.abs())
            .fold(0.0_f64, f64::max);

        if length < minimum {
            debug!("{}: length {} below minimum {}", record_id, length, minimum);
            return Err(Rejection::new(
                record_id,
                RejectionReason::TooShort { length, minimum },
            ));
        }
        Ok(())
    }

    /// Reject a sounding with fewer samples than the minimum
    pub fn check_minimum_samples(
        &self,
        record_id: &str,
        samples: &SampleTable,
    ) -> Result<(), Rejection> {
        let Some(minimum) = self.config.minimum_samples else {
            return Ok(());
        };
        if samples.len() < minimum {
            return Err(Rejection::new(
                record_id,
                RejectionReason::TooFewSamples {
                    samples: samples.len(),
                    minimum,
                },
            ));
        }
        Ok(())
    }

    /// Reject a sounding with too many non-positive tip or friction samples
    pub fn check_corruption(
        &self,
        record_id: &str,
        tip: &[f64],
        friction: Option<&[f64]>,
    ) -> Result<(), Rejection> {
        let Some(maximum) = self.config.maximum_corrupted_ratio else {
            return Ok(());
        };

        let ratio = non_positive_ratio(tip).max(friction.map_or(0.0, non_positive_ratio));
        if ratio > maximum {
            return Err(Rejection::new(
                record_id,
                RejectionReason::Corrupted { ratio, maximum },
            ));
        }
        Ok(())
    }
}

/// Fraction of values that are zero or negative
pub fn non_positive_ratio(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| **v <= 0.0).count() as f64 / values.len() as f64
}

/// Set non-positive values to zero; returns the number of negatives changed
pub fn clamp_non_positive(values: &mut [f64]) -> usize {
    let mut clamped = 0;
    for value in values.iter_mut().filter(|v| **v <= 0.0) {
        if *value < 0.0 {
            clamped += 1;
        }
        *value = 0.0;
    }
    clamped
}
