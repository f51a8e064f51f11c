//! GEF header parsing and metadata extraction
//!
//! Collects the `#KEY= value` declarations that precede the `#EOH=` marker:
//! column layout, void (error) codes, location and the measurement variables
//! the record processor needs.

use crate::constants::{
    GEF_COLUMN_COUNT, GEF_COLUMN_INFO, GEF_COLUMN_VOID, GEF_MEASUREMENT_VAR, GEF_REPORT_CODE,
    GEF_START_DATE, GEF_TEST_ID, GEF_XY_ID, GEF_Z_ID, gef_measurement_var,
};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// One `#COLUMNINFO=` declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    /// 1-based column number as written in the file
    pub column_number: usize,
    pub unit: String,
    pub description: String,
    /// GEF quantity number
    pub quantity: u32,
}

/// Header metadata of a GEF file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GefHeader {
    pub test_id: Option<String>,
    pub x: f64,
    pub y: f64,
    /// Coordinate system code from `#XYID=`
    pub xy_system: String,
    /// Height system code from `#ZID=`
    pub z_system: String,
    /// Height of the surface relative to the height system
    pub reference_level: f64,
    pub report_code: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// Declared column count, if `#COLUMN=` is present
    pub column_count: Option<usize>,
    pub column_infos: Vec<ColumnInfo>,
    /// `#COLUMNVOID=` values in declaration order, unparsed
    pub column_voids: Vec<String>,
    /// `#MEASUREMENTVAR=` values keyed by variable number
    pub measurement_vars: BTreeMap<u32, f64>,
}

impl GefHeader {
    /// Parse the header section of a GEF file
    pub fn parse(header_lines: &[&str], file: &str) -> Result<Self> {
        let mut header = GefHeader::default();
        let mut xy_found = false;
        let mut z_found = false;

        for raw in header_lines {
            let line = raw.trim();

            if let Some(value) = line.strip_prefix(GEF_TEST_ID) {
                let value = value.trim();
                if !value.is_empty() {
                    header.test_id = Some(value.to_string());
                }
            } else if let Some(value) = line.strip_prefix(GEF_XY_ID) {
                let parts = split_values(value);
                if parts.len() < 3 {
                    return Err(Error::gef_format(
                        file,
                        format!("Cannot read coordinates from '{}'", line),
                    ));
                }
                header.xy_system = parts[0].to_string();
                header.x = parse_number(parts[1], line, file)?;
                header.y = parse_number(parts[2], line, file)?;
                xy_found = true;
            } else if let Some(value) = line.strip_prefix(GEF_Z_ID) {
                let parts = split_values(value);
                if parts.len() < 2 {
                    return Err(Error::gef_format(
                        file,
                        format!("Cannot read reference level from '{}'", line),
                    ));
                }
                header.z_system = parts[0].to_string();
                header.reference_level = parse_number(parts[1], line, file)?;
                z_found = true;
            } else if let Some(value) = line.strip_prefix(GEF_REPORT_CODE) {
                header.report_code = split_values(value).first().map(|s| s.to_string());
            } else if let Some(value) = line.strip_prefix(GEF_START_DATE) {
                header.start_date = Some(parse_start_date(value)?);
            } else if let Some(value) = line.strip_prefix(GEF_MEASUREMENT_VAR) {
                let parts = split_values(value);
                if parts.len() >= 2 {
                    if let Ok(number) = parts[0].parse::<u32>() {
                        if let Ok(var) = parts[1].parse::<f64>() {
                            if !var.is_finite() {
                                return Err(Error::gef_format(
                                    file,
                                    format!("Non-finite value in header line '{}'", line),
                                ));
                            }
                            header.measurement_vars.insert(number, var);
                        }
                    }
                }
            } else if let Some(value) = line.strip_prefix(GEF_COLUMN_INFO) {
                header.column_infos.push(parse_column_info(value, line, file)?);
            } else if let Some(value) = line.strip_prefix(GEF_COLUMN_VOID) {
                let parts = split_values(value);
                if parts.len() < 2 {
                    return Err(Error::gef_format(
                        file,
                        format!("Cannot read void value from '{}'", line),
                    ));
                }
                if parts[0].parse::<usize>().ok() != Some(header.column_voids.len() + 1) {
                    debug!(
                        "Void declaration '{}' is applied to column {} by position",
                        line,
                        header.column_voids.len() + 1
                    );
                }
                header.column_voids.push(parts[1].to_string());
            } else if let Some(value) = line.strip_prefix(GEF_COLUMN_COUNT) {
                header.column_count = Some(parse_number(value.trim(), line, file)? as usize);
            }
        }

        if !xy_found {
            return Err(missing_field(GEF_XY_ID, file));
        }
        if !z_found {
            return Err(missing_field(GEF_Z_ID, file));
        }

        Ok(header)
    }

    /// Number of data columns the file declares
    pub fn declared_columns(&self) -> usize {
        self.column_count.unwrap_or(self.column_infos.len())
    }

    /// Cone coefficient from `#MEASUREMENTVAR= 3`
    pub fn cone_coefficient(&self) -> Option<f64> {
        self.measurement_vars
            .get(&gef_measurement_var::CONE_COEFFICIENT)
            .copied()
    }

    /// Pre-drilled depth from `#MEASUREMENTVAR= 13`
    pub fn pre_drill_depth(&self) -> Option<f64> {
        self.measurement_vars
            .get(&gef_measurement_var::PRE_DRILL_DEPTH)
            .copied()
    }
}

fn split_values(value: &str) -> Vec<&str> {
    value.split(',').map(str::trim).collect()
}

fn parse_number(value: &str, line: &str, file: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            Error::gef_format(
                file,
                format!("Invalid number '{}' in header line '{}'", value.trim(), line),
            )
        })
}

fn parse_column_info(value: &str, line: &str, file: &str) -> Result<ColumnInfo> {
    let parts = split_values(value);
    if parts.len() < 4 {
        return Err(Error::gef_format(
            file,
            format!("Incomplete column declaration '{}'", line),
        ));
    }

    let column_number = parts[0].parse::<usize>().ok().filter(|n| *n > 0);
    let quantity = parts[3].parse::<u32>().ok();
    match (column_number, quantity) {
        (Some(column_number), Some(quantity)) => Ok(ColumnInfo {
            column_number,
            unit: parts[1].to_string(),
            description: parts[2].to_string(),
            quantity,
        }),
        _ => Err(Error::gef_format(
            file,
            format!("Invalid column declaration '{}'", line),
        )),
    }
}

/// `#STARTDATE= yyyy, mm, dd`
fn parse_start_date(value: &str) -> Result<NaiveDate> {
    let joined = split_values(value)
        .into_iter()
        .take(3)
        .collect::<Vec<_>>()
        .join("-");
    NaiveDate::parse_from_str(&joined, "%Y-%m-%d").map_err(|e| {
        Error::datetime_parsing(format!("Invalid start date '{}'", value.trim()), e)
    })
}

fn missing_field(key: &str, file: &str) -> Error {
    Error::gef_format(
        file,
        format!("No values found for field {} of the gef file.", key),
    )
}
