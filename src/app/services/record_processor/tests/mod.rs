//! Tests for record processor module
//!
//! Helpers build sample tables and soundings directly, without going through a reader.

pub mod pre_drill_tests;
pub mod processor_tests;

// Test helper functions and fixtures
use crate::app::models::{Channel, SampleTable, Sounding, SoundingMetadata};
use crate::app::services::record_processor::SoundingProcessor;
use crate::config::{PreDrillConfig, QualityControlConfig};

/// Build a sample table from complete columns
pub fn table(columns: &[(Channel, Vec<f64>)]) -> SampleTable {
    let mut samples = SampleTable::new();
    for (channel, values) in columns {
        samples.insert_values(*channel, values.clone()).unwrap();
    }
    samples
}

/// `count` values starting at `start`, `step` apart
pub fn linear(count: usize, start: f64, step: f64) -> Vec<f64> {
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// Samples with the four primary channels and u2 pore pressure
pub fn standard_samples(count: usize, step: f64) -> SampleTable {
    table(&[
        (Channel::PenetrationLength, linear(count, step, step)),
        (Channel::Tip, vec![1500.0; count]),
        (Channel::Friction, vec![30.0; count]),
        (Channel::FrictionRatio, vec![2.0; count]),
        (Channel::PorePressureU2, vec![15.0; count]),
    ])
}

/// Metadata with a reference level of 0.5 m
pub fn test_metadata(name: &str) -> SoundingMetadata {
    SoundingMetadata {
        name: name.to_string(),
        coordinates: [120000.0, 480000.0],
        reference_level: Some(0.5),
        cone_coefficient: 0.8,
        vertical_datum: Some("NAP".to_string()),
        ..Default::default()
    }
}

pub fn standard_sounding(count: usize, step: f64) -> Sounding {
    Sounding::new(test_metadata("CPT-TEST"), standard_samples(count, step))
}

/// Processor with the given thresholds and default padding
pub fn create_processor(quality: QualityControlConfig) -> SoundingProcessor {
    SoundingProcessor::new(quality, &PreDrillConfig::default()).unwrap()
}

pub fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{:?} vs {:?}", actual, expected);
    }
}
