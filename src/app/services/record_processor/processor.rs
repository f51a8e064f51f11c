//! Sounding processor that turns reader output into a canonical record

use super::deduplication::remove_duplicate_depths;
use super::depth::DepthReconstructor;
use super::pre_drill::PreDrillPadder;
use super::quality_filter::{QualityGate, clamp_non_positive};
use super::stats::ProcessingStats;
use crate::app::models::{
    CanonicalRecord, Channel, Outcome, Rejection, RejectionReason, SampleTable, Sounding,
    WaterMeasurementType,
};
use crate::config::{PreDrillConfig, QualityControlConfig};
use crate::{Error, Result};
use tracing::{debug, info, warn};

/// A processed sounding together with its row accounting
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    pub outcome: Outcome<CanonicalRecord>,
    pub stats: ProcessingStats,
}

/// Runs the cleaning, depth and padding pipeline on a [`Sounding`]
#[derive(Debug, Clone)]
pub struct SoundingProcessor {
    gate: QualityGate,
    depth: DepthReconstructor,
    padder: PreDrillPadder,
}

impl SoundingProcessor {
    /// Create a processor with the given thresholds and padding settings
    pub fn new(quality: QualityControlConfig, pre_drill: &PreDrillConfig) -> Result<Self> {
        quality.validate()?;
        Ok(Self {
            gate: QualityGate::new(quality),
            depth: DepthReconstructor::new(),
            padder: PreDrillPadder::new(pre_drill),
        })
    }

    pub fn quality(&self) -> &QualityControlConfig {
        self.gate.config()
    }

    /// Process one sounding into an accepted record or a rejection
    ///
    /// # Arguments
    ///
    /// * `sounding` - Metadata and samples as delivered by a reader
    ///
    /// # Returns
    ///
    /// Result containing the outcome and the processing statistics
    pub fn process(&self, sounding: Sounding) -> Result<ProcessingResult> {
        let mut stats = ProcessingStats::new();
        let outcome = self.run(sounding, &mut stats)?;

        match &outcome {
            Outcome::Accepted(record) => {
                stats.output_rows = record.len();
                info!(
                    "Processed {}: {} samples, max depth {:.2} m",
                    record.name,
                    record.len(),
                    record.max_depth().unwrap_or(0.0)
                );
            }
            Outcome::Rejected(rejection) => {
                info!("Rejected: {}", rejection.message);
            }
        }

        Ok(ProcessingResult { outcome, stats })
    }

    fn run(
        &self,
        sounding: Sounding,
        stats: &mut ProcessingStats,
    ) -> Result<Outcome<CanonicalRecord>> {
        let Sounding {
            metadata,
            mut samples,
        } = sounding;
        let id = metadata.name.as_str();
        stats.input_rows = samples.len();

        for channel in [Channel::PenetrationLength, Channel::Tip] {
            if !samples.contains(channel) {
                return Ok(reject(
                    id,
                    RejectionReason::MissingChannel {
                        channel: channel.name().to_string(),
                    },
                ));
            }
        }
        let Some(reference_level) = metadata.reference_level else {
            return Ok(reject(id, RejectionReason::MissingReferenceLevel));
        };

        stats.incomplete_rows_removed = samples.drop_incomplete_rows();
        if stats.incomplete_rows_removed > 0 {
            debug!(
                "{}: dropped {} incomplete rows",
                id, stats.incomplete_rows_removed
            );
        }

        type Check = fn(&QualityGate, &str, &SampleTable) -> std::result::Result<(), Rejection>;
        let checks: [Check; 4] = [
            QualityGate::check_not_empty,
            QualityGate::check_not_all_zero,
            QualityGate::check_minimum_length,
            QualityGate::check_minimum_samples,
        ];
        for check in checks {
            if let Err(rejection) = check(&self.gate, id, &samples) {
                return Ok(Outcome::Rejected(rejection));
            }
        }

        stats.duplicate_rows_removed = remove_duplicate_depths(&mut samples);

        let (depth, source) = self.depth.reconstruct(&samples)?;
        samples.insert_values(Channel::Depth, depth)?;
        stats.depth_source = Some(source);

        if let Some(pre_drill) = metadata.pre_drill {
            let summary = self.padder.pad(pre_drill, &mut samples)?;
            stats.synthetic_rows_added = summary.rows_added();
        }

        let mut tip = required_values(&samples, Channel::Tip)?;
        let friction = samples.values(Channel::Friction);
        if let Err(rejection) = self.gate.check_corruption(id, &tip, friction.as_deref()) {
            return Ok(Outcome::Rejected(rejection));
        }

        let rows = samples.len();
        stats.values_clamped += clamp_non_positive(&mut tip);
        let friction = clamped_or_zeros(id, Channel::Friction, friction, rows, stats);
        let friction_ratio = clamped_or_zeros(
            id,
            Channel::FrictionRatio,
            samples.values(Channel::FrictionRatio),
            rows,
            stats,
        );

        let (water_type, water) = Channel::PORE_PRESSURES
            .into_iter()
            .find_map(|channel| {
                samples
                    .values(channel)
                    .map(|values| (WaterMeasurementType::from_channel(channel), values))
            })
            .unwrap_or((WaterMeasurementType::NoMeasurements, vec![0.0; rows]));

        let record = CanonicalRecord::builder(id)
            .coordinates(metadata.coordinates[0], metadata.coordinates[1])
            .vertical_datum(metadata.vertical_datum.clone())
            .local_reference(metadata.local_reference.clone())
            .cpt_standard(metadata.cpt_standard.clone())
            .quality_class(metadata.quality_class.clone())
            .cpt_type(metadata.cpt_type.clone())
            .result_time(metadata.result_time.clone())
            .local_reference_level(reference_level)
            .cone_coefficient(metadata.cone_coefficient)
            .pre_drill_depth(metadata.pre_drill)
            .water_measurement_type(water_type)
            .penetration_length(required_values(&samples, Channel::PenetrationLength)?)
            .depth(required_values(&samples, Channel::Depth)?)
            .tip(tip)
            .friction(friction)
            .friction_ratio(friction_ratio)
            .pore_pressure(water)
            .inclination_resultant(
                samples
                    .get(Channel::InclinationResultant)
                    .map(<[Option<f64>]>::to_vec)
                    .unwrap_or_default(),
            )
            .build()?;

        Ok(Outcome::Accepted(record))
    }
}

fn reject(id: &str, reason: RejectionReason) -> Outcome<CanonicalRecord> {
    Outcome::Rejected(Rejection::new(id, reason))
}

/// Clamp a channel, or substitute zeros when the sounding lacks it
fn clamped_or_zeros(
    id: &str,
    channel: Channel,
    values: Option<Vec<f64>>,
    rows: usize,
    stats: &mut ProcessingStats,
) -> Vec<f64> {
    match values {
        Some(mut values) => {
            stats.values_clamped += clamp_non_positive(&mut values);
            values
        }
        None => {
            warn!("{}: no {} data, filling with zeros", id, channel);
            vec![0.0; rows]
        }
    }
}

fn required_values(samples: &SampleTable, channel: Channel) -> Result<Vec<f64>> {
    samples.values(channel).ok_or_else(|| {
        Error::data_validation(format!(
            "Channel {} disappeared during processing",
            channel
        ))
    })
}
