//! Tests for the sounding processor pipeline

use super::*;
use crate::app::models::{CanonicalRecord, Outcome, RejectionReason, WaterMeasurementType};
use crate::app::services::record_processor::{DepthSource, ProcessingResult};

fn process(sounding: Sounding) -> ProcessingResult {
    create_processor(QualityControlConfig::delimited_defaults())
        .process(sounding)
        .unwrap()
}

fn accepted(result: ProcessingResult) -> CanonicalRecord {
    match result.outcome {
        Outcome::Accepted(record) => record,
        Outcome::Rejected(rejection) => panic!("rejected: {}", rejection),
    }
}

fn assert_aligned(record: &CanonicalRecord) {
    let n = record.depth.len();
    assert_eq!(record.penetration_length.len(), n);
    assert_eq!(record.depth_to_reference.len(), n);
    assert_eq!(record.tip.len(), n);
    assert_eq!(record.friction.len(), n);
    assert_eq!(record.friction_ratio.len(), n);
    assert_eq!(record.pore_pressure.len(), n);
    assert_eq!(record.inclination_resultant.len(), n);
}

#[test]
fn test_standard_sounding_accepted() {
    let result = process(standard_sounding(20, 0.5));
    assert_eq!(result.stats.depth_source, Some(DepthSource::PenetrationLength));
    assert_eq!(result.stats.output_rows, 20);

    let record = accepted(result);
    assert_aligned(&record);
    assert_eq!(record.name, "CPT-TEST");
    assert_eq!(record.coordinates, [120000.0, 480000.0]);
    assert_eq!(record.vertical_datum.as_deref(), Some("NAP"));
    assert_eq!(record.depth, linear(20, 0.5, 0.5));
    assert_close(
        &record.depth_to_reference,
        &record.depth.iter().map(|d| 0.5 - d).collect::<Vec<_>>(),
    );
    assert_eq!(record.water_measurement_type, WaterMeasurementType::PorePressureU2);
    assert!(record.pore_pressure.iter().all(|v| *v == 15.0));
    assert!(record.inclination_resultant.iter().all(Option::is_none));
    assert_eq!(record.pre_drill_depth, None);
}

#[test]
fn test_missing_tip_rejected() {
    let samples = table(&[(Channel::PenetrationLength, linear(10, 0.1, 0.1))]);
    let result = process(Sounding::new(test_metadata("CPT-1"), samples));

    let rejection = result.outcome.rejection().unwrap();
    assert_eq!(
        rejection.reason,
        RejectionReason::MissingChannel {
            channel: "tip".to_string()
        }
    );
}

#[test]
fn test_missing_reference_level_rejected() {
    let mut sounding = standard_sounding(10, 0.1);
    sounding.metadata.reference_level = None;

    let result = process(sounding);
    assert_eq!(
        result.outcome.rejection().unwrap().reason,
        RejectionReason::MissingReferenceLevel
    );
}

#[test]
fn test_incomplete_rows_dropped() {
    let mut sounding = standard_sounding(10, 0.1);
    let mut tip = vec![Some(1500.0); 10];
    tip[4] = None;
    sounding.samples.insert(Channel::Tip, tip).unwrap();

    let result = process(sounding);
    assert_eq!(result.stats.incomplete_rows_removed, 1);

    let record = accepted(result);
    assert_eq!(record.len(), 9);
    assert!(!record.penetration_length.iter().any(|v| (v - 0.5).abs() < 1e-9));
}

#[test]
fn test_all_rows_incomplete_rejected_as_empty() {
    let mut sounding = standard_sounding(3, 0.1);
    sounding.samples.insert(Channel::Tip, vec![None; 3]).unwrap();

    let result = process(sounding);
    assert_eq!(
        result.outcome.rejection().unwrap().reason,
        RejectionReason::Empty
    );
}

#[test]
fn test_duplicates_removed() {
    let mut sounding = standard_sounding(5, 0.1);
    sounding
        .samples
        .insert_values(Channel::PenetrationLength, vec![0.1, 0.2, 0.2, 0.3, 0.4])
        .unwrap();

    let result = process(sounding);
    assert_eq!(result.stats.duplicate_rows_removed, 1);
    assert_eq!(accepted(result).len(), 4);
}

#[test]
fn test_corrupted_sounding_rejected() {
    let mut sounding = standard_sounding(20, 0.1);
    let mut tip = vec![1500.0; 20];
    for i in [2, 9, 15] {
        tip[i] = 0.0;
    }
    sounding.samples.insert_values(Channel::Tip, tip).unwrap();

    let result = process(sounding);
    assert!(matches!(
        result.outcome.rejection().unwrap().reason,
        RejectionReason::Corrupted { .. }
    ));
}

#[test]
fn test_few_bad_samples_clamped() {
    let mut sounding = standard_sounding(20, 0.1);
    let mut tip = vec![1500.0; 20];
    tip[9] = -20.0;
    sounding.samples.insert_values(Channel::Tip, tip).unwrap();

    let result = process(sounding);
    assert_eq!(result.stats.values_clamped, 1);

    let record = accepted(result);
    assert_eq!(record.tip[9], 0.0);
    assert!(record.tip.iter().all(|v| *v >= 0.0));
}

#[test]
fn test_missing_friction_filled_with_zeros() {
    let mut sounding = standard_sounding(10, 0.1);
    sounding.samples.remove(Channel::Friction);
    sounding.samples.remove(Channel::FrictionRatio);

    let record = accepted(process(sounding));
    assert_aligned(&record);
    assert_eq!(record.friction, vec![0.0; 10]);
    assert_eq!(record.friction_ratio, vec![0.0; 10]);
}

#[test]
fn test_water_channel_preference() {
    let mut sounding = standard_sounding(10, 0.1);
    sounding
        .samples
        .insert_values(Channel::PorePressureU1, vec![7.0; 10])
        .unwrap();

    let record = accepted(process(sounding));
    assert_eq!(record.water_measurement_type, WaterMeasurementType::PorePressureU1);
    assert_eq!(record.pore_pressure, vec![7.0; 10]);
}

#[test]
fn test_no_water_channel() {
    let mut sounding = standard_sounding(10, 0.1);
    sounding.samples.remove(Channel::PorePressureU2);

    let record = accepted(process(sounding));
    assert_eq!(record.water_measurement_type, WaterMeasurementType::NoMeasurements);
    assert_eq!(record.pore_pressure, vec![0.0; 10]);
}

#[test]
fn test_pre_drill_padding_applied() {
    let mut sounding = standard_sounding(10, 0.5);
    sounding
        .samples
        .insert_values(Channel::PenetrationLength, linear(10, 1.5, 0.5))
        .unwrap();
    sounding.metadata.pre_drill = Some(1.0);

    let result = process(sounding);
    assert_eq!(result.stats.synthetic_rows_added, 2);

    let record = accepted(result);
    assert_aligned(&record);
    assert_eq!(record.len(), 12);
    assert_eq!(record.depth[0], 0.0);
    assert_eq!(record.pre_drill_depth, Some(1.0));
    assert!(record.depth.windows(2).all(|w| w[1] > w[0]));
    assert_eq!(record.pore_pressure[0], 0.0);
}

#[test]
fn test_no_pre_drill_keeps_first_depth() {
    let record = accepted(process(standard_sounding(10, 0.5)));
    assert_eq!(record.depth[0], 0.5);
}

#[test]
fn test_inclination_used_for_depth() {
    let mut sounding = standard_sounding(4, 1.0);
    sounding
        .samples
        .insert_values(Channel::InclinationResultant, vec![60.0; 4])
        .unwrap();

    let result = process(sounding);
    assert_eq!(result.stats.depth_source, Some(DepthSource::Inclination));

    let record = accepted(result);
    assert_close(&record.depth, &[1.0, 1.5, 2.0, 2.5]);
    assert_eq!(record.penetration_length, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_registry_thresholds() {
    let processor = create_processor(QualityControlConfig::registry_defaults());

    let long = processor.process(standard_sounding(60, 0.1)).unwrap();
    assert!(long.outcome.is_accepted());

    let short = processor.process(standard_sounding(60, 0.05)).unwrap();
    assert!(matches!(
        short.outcome.rejection().unwrap().reason,
        RejectionReason::TooShort { .. }
    ));

    let sparse = processor.process(standard_sounding(40, 0.2)).unwrap();
    assert!(matches!(
        sparse.outcome.rejection().unwrap().reason,
        RejectionReason::TooFewSamples { .. }
    ));
}

#[test]
fn test_invalid_thresholds_rejected_at_construction() {
    let quality = QualityControlConfig::disabled().with_maximum_corrupted_ratio(1.5);
    assert!(SoundingProcessor::new(quality, &PreDrillConfig::default()).is_err());
}
