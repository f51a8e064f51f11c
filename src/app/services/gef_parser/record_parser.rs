//! GEF data row processing
//!
//! Splits the body into cells, extracts the resolved columns, removes rows
//! that hit a void value and clamps fields that cannot be negative.

use super::column_mapping::ColumnMapping;
use crate::config::GefField;
use crate::constants::GEF_DATA_DELIMITERS;
use crate::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;

/// Raw samples per resolved field, index aligned
pub type FieldColumns = BTreeMap<GefField, Vec<f64>>;

/// Row splitter for GEF data sections
#[derive(Debug, Clone)]
pub struct RecordParser {
    delimiters: Regex,
}

impl RecordParser {
    pub fn new() -> Result<Self> {
        let delimiters = Regex::new(GEF_DATA_DELIMITERS)
            .map_err(|e| Error::configuration(format!("Invalid GEF delimiter pattern: {}", e)))?;
        Ok(Self { delimiters })
    }

    /// Split one data line into cells
    pub fn split_line<'a>(&self, line: &'a str) -> Vec<&'a str> {
        self.delimiters
            .split(line.trim())
            .filter(|cell| !cell.is_empty())
            .collect()
    }

    /// Extract the resolved fields from every non-blank body line
    ///
    /// `first_line` is the 1-based file line number of `body[0]`, used in errors.
    pub fn parse_rows(
        &self,
        body: &[&str],
        first_line: usize,
        mapping: &ColumnMapping,
        file: &str,
    ) -> Result<FieldColumns> {
        let mut columns: FieldColumns = mapping
            .resolved
            .keys()
            .map(|field| (*field, Vec::with_capacity(body.len())))
            .collect();

        for (offset, line) in body.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_number = first_line + offset;
            let cells = self.split_line(line);

            for (field, resolved) in &mapping.resolved {
                let cell = cells.get(resolved.column).ok_or_else(|| {
                    Error::gef_format(
                        file,
                        format!(
                            "Line {} has {} values, column {} of key {} is missing",
                            line_number,
                            cells.len(),
                            resolved.column + 1,
                            field.name()
                        ),
                    )
                })?;
                let value = cell.parse::<f64>().map_err(|_| {
                    Error::gef_format(
                        file,
                        format!(
                            "Line {}: value '{}' of key {} is not a number",
                            line_number,
                            cell,
                            field.name()
                        ),
                    )
                })?;
                if let Some(values) = columns.get_mut(field) {
                    values.push(value * resolved.spec.unit_factor);
                }
            }
        }

        Ok(columns)
    }
}

/// Remove every row in which any field equals its sentinel
///
/// Rows are removed from all fields in lockstep; order is preserved.
/// Returns the number of rows removed.
pub fn remove_sentinel_rows(columns: &mut FieldColumns, mapping: &ColumnMapping) -> usize {
    let rows = columns.values().map(Vec::len).max().unwrap_or(0);
    let mut keep = vec![true; rows];

    for (field, values) in columns.iter() {
        if let Some(resolved) = mapping.get(*field) {
            for (row, value) in values.iter().enumerate() {
                if resolved.sentinel.matches(*value) {
                    keep[row] = false;
                }
            }
        }
    }

    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        for values in columns.values_mut() {
            let mut mask = keep.iter();
            values.retain(|_| mask.next().copied().unwrap_or(false));
        }
    }
    removed
}

/// Set negative values of the given fields to zero; returns the number changed
pub fn clamp_negatives(columns: &mut FieldColumns, fields: &[GefField]) -> usize {
    let mut clamped = 0;
    for field in fields {
        if let Some(values) = columns.get_mut(field) {
            for value in values.iter_mut().filter(|v| **v < 0.0) {
                *value = 0.0;
                clamped += 1;
            }
        }
    }
    clamped
}
