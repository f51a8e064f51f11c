//! Test utilities for GEF parser testing
//!
//! Fixture builders shared by the header, column mapping and parser tests.

use crate::config::GefReaderConfig;

use super::GefParser;

mod header_tests;

/// Header lines of a six column GEF file without pore pressure
///
/// Columns: penetration length, tip, friction, elapsed time, u1 (unmapped),
/// friction ratio.
pub fn standard_header() -> Vec<String> {
    [
        "#GEFID= 1, 1, 0",
        "#FILEOWNER= Test",
        "#TESTID= DKP302",
        "#XYID= 31000, 244319.00, 587520.00, 0.01, 0.01",
        "#ZID= 31000, 0.13, 0.01",
        "#REPORTCODE= GEF-CPT-Report, 1, 1, 2",
        "#STARTDATE= 2017, 07, 03",
        "#MEASUREMENTVAR= 3, 0.58, -, netto oppervlaktequotient van de conuspunt",
        "#COLUMN= 6",
        "#COLUMNINFO= 1, m, Sondeerlengte, 1",
        "#COLUMNINFO= 2, MPa, Conusweerstand, 2",
        "#COLUMNINFO= 3, MPa, Wrijvingsweerstand, 3",
        "#COLUMNINFO= 4, s, Tijd, 12",
        "#COLUMNINFO= 5, MPa, Waterspanning u1, 5",
        "#COLUMNINFO= 6, %, Wrijvingsgetal, 4",
        "#COLUMNVOID= 1, -9999.000000",
        "#COLUMNVOID= 2, -9999.000000",
        "#COLUMNVOID= 3, -9999.000000",
        "#COLUMNVOID= 4, -9999.000000",
        "#COLUMNVOID= 5, -9999.000000",
        "#COLUMNVOID= 6, -9999.000000",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// One data row of the standard layout
pub fn row(depth: f64, tip: f64, friction: f64, friction_ratio: f64) -> String {
    format!(
        "{:.2} {:.3} {:.3} {:.1} 0.000 {:.1} !",
        depth,
        tip,
        friction,
        depth * 10.0,
        friction_ratio
    )
}

/// Rows at depth 1..=n with tip 1 MPa, friction 2 MPa and friction ratio 5
pub fn standard_rows(n: usize) -> Vec<String> {
    (1..=n).map(|i| row(i as f64, 1.0, 2.0, 5.0)).collect()
}

/// Assemble a GEF document from header and body lines
pub fn gef_content(header: &[String], rows: &[String]) -> String {
    let mut lines: Vec<String> = header.to_vec();
    lines.push("#EOH=".to_string());
    lines.extend(rows.iter().cloned());
    lines.join("\n")
}

/// The 20 row reference file
pub fn create_test_gef() -> String {
    gef_content(&standard_header(), &standard_rows(20))
}

/// Header with one line replaced (matched by key prefix) or removed when `replacement` is None
pub fn header_with(key: &str, replacement: Option<&str>) -> Vec<String> {
    standard_header()
        .into_iter()
        .filter_map(|line| {
            if line.starts_with(key) {
                replacement.map(|r| r.to_string())
            } else {
                Some(line)
            }
        })
        .collect()
}

pub fn create_parser() -> GefParser {
    GefParser::new(GefReaderConfig::default()).unwrap()
}
