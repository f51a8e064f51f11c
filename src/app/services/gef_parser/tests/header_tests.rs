//! Tests for GEF header parsing

use super::super::header::GefHeader;
use super::{header_with, standard_header};
use crate::Error;
use chrono::NaiveDate;

fn parse(lines: &[String]) -> crate::Result<GefHeader> {
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    GefHeader::parse(&refs, "test.gef")
}

#[test]
fn test_header_parsing_complete() {
    let header = parse(&standard_header()).unwrap();

    assert_eq!(header.test_id, Some("DKP302".to_string()));
    assert_eq!(header.x, 244319.0);
    assert_eq!(header.y, 587520.0);
    assert_eq!(header.z_system, "31000");
    assert_eq!(header.reference_level, 0.13);
    assert_eq!(header.report_code, Some("GEF-CPT-Report".to_string()));
    assert_eq!(header.start_date, NaiveDate::from_ymd_opt(2017, 7, 3));
    assert_eq!(header.column_count, Some(6));
    assert_eq!(header.column_infos.len(), 6);
    assert_eq!(header.column_voids.len(), 6);
}

#[test]
fn test_column_info_fields() {
    let header = parse(&standard_header()).unwrap();
    let info = &header.column_infos[5];

    assert_eq!(info.column_number, 6);
    assert_eq!(info.unit, "%");
    assert_eq!(info.description, "Wrijvingsgetal");
    assert_eq!(info.quantity, 4);
}

#[test]
fn test_measurement_vars() {
    let mut lines = standard_header();
    lines.push("#MEASUREMENTVAR= 13, 1.50, m, voorgeboorde diepte".to_string());
    let header = parse(&lines).unwrap();

    assert_eq!(header.cone_coefficient(), Some(0.58));
    assert_eq!(header.pre_drill_depth(), Some(1.5));
}

#[test]
fn test_no_pre_drill_declared() {
    let header = parse(&standard_header()).unwrap();
    assert_eq!(header.pre_drill_depth(), None);
}

#[test]
fn test_missing_zid_is_fatal() {
    let lines = header_with("#ZID=", None);
    let err = parse(&lines).unwrap_err();

    assert!(
        err.to_string()
            .contains("No values found for field #ZID= of the gef file.")
    );
}

#[test]
fn test_missing_xyid_is_fatal() {
    let lines = header_with("#XYID=", None);
    assert!(matches!(parse(&lines), Err(Error::GefFormat { .. })));
}

#[test]
fn test_invalid_start_date() {
    let lines = header_with("#STARTDATE=", Some("#STARTDATE= 2017, 13, 45"));
    assert!(matches!(parse(&lines), Err(Error::DateTimeParsing { .. })));
}

#[test]
fn test_declared_columns_falls_back_to_column_infos() {
    let lines = header_with("#COLUMN=", None);
    let header = parse(&lines).unwrap();

    assert_eq!(header.column_count, None);
    assert_eq!(header.declared_columns(), 6);
}

#[test]
fn test_non_finite_pre_drill_is_fatal() {
    for value in ["INF", "NaN", "-inf"] {
        let mut lines = standard_header();
        lines.push(format!("#MEASUREMENTVAR= 13, {}, m, voorgeboorde diepte", value));
        assert!(matches!(parse(&lines), Err(Error::GefFormat { .. })));
    }
}

#[test]
fn test_non_finite_reference_level_is_fatal() {
    let lines = header_with("#ZID=", Some("#ZID= 31000, NaN, 0.01"));
    assert!(matches!(parse(&lines), Err(Error::GefFormat { .. })));
}

#[test]
fn test_void_declarations_applied_by_position() {
    let mut lines = header_with("#COLUMNVOID=", None);
    lines.push("#COLUMNVOID= 2, -2.0".to_string());
    lines.push("#COLUMNVOID= 1, -1.0".to_string());
    let header = parse(&lines).unwrap();

    assert_eq!(header.column_voids, vec!["-2.0", "-1.0"]);
}
