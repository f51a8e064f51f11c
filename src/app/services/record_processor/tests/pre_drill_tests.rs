//! Tests for pre-drill padding and surface row filling

use super::*;
use crate::app::services::record_processor::PreDrillPadder;
use crate::app::services::record_processor::pre_drill::{fill_missing_top, median_spacing};

fn padder() -> PreDrillPadder {
    PreDrillPadder::new(&PreDrillConfig::default())
}

fn deep_samples() -> SampleTable {
    let mut samples = table(&[
        (Channel::PenetrationLength, vec![1.5, 2.0, 2.5, 3.0]),
        (Channel::Depth, vec![1.5, 2.0, 2.5, 3.0]),
        (Channel::Tip, vec![2.0, 4.0, 6.0, 8.0]),
        (Channel::Friction, vec![0.1, 0.2, 0.3, 0.4]),
        (Channel::PorePressureU2, vec![0.2, 0.3, 0.4, 0.5]),
    ]);
    samples
        .insert_values(Channel::InclinationResultant, vec![1.0, 1.0, 2.0, 2.0])
        .unwrap();
    samples
}

#[test]
fn test_pad_positive_pre_drill() {
    let mut samples = deep_samples();
    let summary = padder().pad(1.0, &mut samples).unwrap();

    assert_eq!(summary.synthetic_rows, 2);
    assert!(!summary.top_row_added);
    assert_eq!(samples.len(), 6);

    assert_close(
        &samples.values(Channel::Depth).unwrap(),
        &[0.0, 0.5, 1.0, 1.5, 2.0, 2.5],
    );
    assert_close(
        &samples.values(Channel::PenetrationLength).unwrap(),
        &[0.0, 0.5, 1.5, 2.0, 2.5, 3.0],
    );
    assert_close(
        &samples.values(Channel::Tip).unwrap(),
        &[4.0, 4.0, 2.0, 4.0, 6.0, 8.0],
    );
    assert_close(
        &samples.values(Channel::PorePressureU2).unwrap(),
        &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5],
    );

    let inclination = samples.get(Channel::InclinationResultant).unwrap();
    assert_eq!(&inclination[..2], &[None, None]);
    assert_eq!(inclination[2], Some(1.0));
}

#[test]
fn test_pad_zero_pre_drill_shifts_depth() {
    let mut samples = deep_samples();
    let summary = padder().pad(0.0, &mut samples).unwrap();

    assert!(summary.shifted);
    assert!(!summary.top_row_added);
    assert_close(
        &samples.values(Channel::Depth).unwrap(),
        &[0.0, 0.5, 1.0, 1.5],
    );
    // penetration length is left alone
    assert_eq!(
        samples.values(Channel::PenetrationLength).unwrap()[0],
        1.5
    );
}

#[test]
fn test_single_sample_skips_padding_but_fills_top() {
    let mut samples = table(&[
        (Channel::PenetrationLength, vec![1.0]),
        (Channel::Depth, vec![1.0]),
        (Channel::Tip, vec![5.0]),
    ]);

    let summary = padder().pad(2.0, &mut samples).unwrap();

    assert_eq!(summary.synthetic_rows, 0);
    assert!(summary.top_row_added);
    assert_eq!(summary.rows_added(), 1);
    assert_eq!(samples.values(Channel::Depth).unwrap(), vec![0.0, 1.0]);
    assert_eq!(samples.values(Channel::Tip).unwrap(), vec![5.0, 5.0]);
}

#[test]
fn test_negative_pre_drill_ignored() {
    let mut samples = deep_samples();
    let summary = padder().pad(-1.0, &mut samples).unwrap();

    assert_eq!(summary.synthetic_rows, 0);
    assert!(!summary.shifted);
    assert!(summary.top_row_added);
    assert_eq!(samples.len(), 5);
}

#[test]
fn test_non_finite_pre_drill_ignored() {
    for pre_drill in [f64::INFINITY, f64::NAN] {
        let mut samples = deep_samples();
        let summary = padder().pad(pre_drill, &mut samples).unwrap();

        assert_eq!(summary.synthetic_rows, 0);
        assert!(!summary.shifted);
        assert!(summary.top_row_added);
        assert_eq!(samples.len(), 5);
    }
}

#[test]
fn test_tiny_spacing_skips_padding() {
    let depth = vec![1.0, 1.0 + 1e-9, 1.0 + 2e-9, 1.0 + 3e-9];
    let mut samples = table(&[
        (Channel::PenetrationLength, depth.clone()),
        (Channel::Depth, depth),
        (Channel::Tip, vec![2.0, 4.0, 6.0, 8.0]),
    ]);

    let summary = padder().pad(1.0, &mut samples).unwrap();

    assert_eq!(summary.synthetic_rows, 0);
    assert!(summary.top_row_added);
    assert_eq!(samples.len(), 5);
}

#[test]
fn test_fill_missing_top_uses_leading_mean() {
    let mut samples = table(&[
        (Channel::PenetrationLength, vec![0.4, 0.6, 0.8, 1.0]),
        (Channel::Depth, vec![0.4, 0.6, 0.8, 1.0]),
        (Channel::Tip, vec![1.0, 2.0, 3.0, 100.0]),
    ]);
    samples
        .insert(
            Channel::InclinationResultant,
            vec![None, Some(4.0), None, Some(8.0)],
        )
        .unwrap();

    assert!(fill_missing_top(&mut samples, 3).unwrap());
    assert_eq!(samples.len(), 5);
    assert_eq!(samples.values(Channel::Depth).unwrap()[0], 0.0);
    assert_eq!(samples.values(Channel::PenetrationLength).unwrap()[0], 0.0);
    assert_eq!(samples.values(Channel::Tip).unwrap()[0], 2.0);
    assert_eq!(samples.get(Channel::InclinationResultant).unwrap()[0], Some(4.0));

    // already starts at the surface
    assert!(!fill_missing_top(&mut samples, 3).unwrap());
    assert_eq!(samples.len(), 5);
}

#[test]
fn test_fill_missing_top_requires_depth() {
    let mut samples = table(&[(Channel::Tip, vec![1.0])]);
    assert!(fill_missing_top(&mut samples, 3).is_err());
}

#[test]
fn test_median_spacing() {
    assert_eq!(median_spacing(&[0.0, 1.0, 3.0, 4.0]), 1.0);
    assert_eq!(median_spacing(&[0.0, 1.0, 3.0]), 1.5);
    assert!(median_spacing(&[2.0]).is_nan());
}
