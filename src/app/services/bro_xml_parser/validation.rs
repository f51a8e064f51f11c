//! Informational checks on a freshly read BRO sounding
//!
//! Nothing here rejects a sounding; every finding is logged as a warning and
//! returned so callers can report it. Rejection happens later in the record
//! processor.

use super::metadata::BroMetadata;
use crate::app::models::{Channel, SampleTable};
use crate::config::QualityControlConfig;
use crate::constants::bro_columns;
use tracing::warn;

/// Run all checks and return the warnings raised
pub fn validate(
    record_id: &str,
    metadata: &BroMetadata,
    available: &[String],
    samples: &SampleTable,
    quality: &QualityControlConfig,
) -> Vec<String> {
    let mut warnings = Vec::new();

    let missing_meta = metadata.missing_fields();
    let missing_data: Vec<&str> = bro_columns::REQUIRED
        .iter()
        .copied()
        .filter(|name| !available.iter().any(|a| a == name))
        .collect();
    if !missing_meta.is_empty() || !missing_data.is_empty() {
        warnings.push(format!("CPT with id {} misses required data.", record_id));
    }

    if samples.is_empty() {
        warnings.push(format!("File {} contains no data", record_id));
    } else {
        for channel in Channel::PRIMARY {
            if let Some(values) = samples.get(channel) {
                if values.iter().all(|v| *v == Some(0.0)) {
                    warnings.push(format!("File {} contains empty data", record_id));
                    break;
                }
            }
        }
    }

    if let (Some(minimum), Some(length)) = (quality.minimum_length, max_abs_length(samples)) {
        if length < minimum {
            warnings.push(format!(
                "File {} has a length smaller than {}",
                record_id, minimum
            ));
        }
    }

    if let Some(minimum) = quality.minimum_samples {
        if samples.len() < minimum {
            warnings.push(format!(
                "File {} has a number of samples smaller than {}",
                record_id, minimum
            ));
        }
    }

    for warning in &warnings {
        warn!("{}", warning);
    }
    warnings
}

fn max_abs_length(samples: &SampleTable) -> Option<f64> {
    samples
        .get(Channel::PenetrationLength)?
        .iter()
        .flatten()
        .map(|v| v.abs())
        .reduce(f64::max)
}
