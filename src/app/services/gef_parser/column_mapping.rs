//! Resolution of logical fields to physical GEF columns
//!
//! GEF files do not use fixed column positions. Each file declares which
//! quantity lives in which column (`#COLUMNINFO=`) and which value marks a
//! void sample in that column (`#COLUMNVOID=`).

use super::header::GefHeader;
use crate::config::{GefField, GefFieldSpec, GefReaderConfig};
use crate::{Error, Result};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Per-file "no data" marker of a column
#[derive(Debug, Clone, PartialEq)]
pub enum Sentinel {
    /// Numeric void value, already scaled by the field's unit factor
    Value(f64),
    /// Non-numeric declaration, never matches a sample
    Token(String),
}

impl Sentinel {
    fn from_declaration(raw: &str, unit_factor: f64) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) => Sentinel::Value(value * unit_factor),
            Err(_) => Sentinel::Token(raw.trim().to_string()),
        }
    }

    /// Whether a scaled sample equals this sentinel
    pub fn matches(&self, value: f64) -> bool {
        match self {
            Sentinel::Value(sentinel) => *sentinel == value,
            Sentinel::Token(_) => false,
        }
    }
}

/// A field found in the file
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub spec: GefFieldSpec,
    /// 0-based physical column index
    pub column: usize,
    pub sentinel: Sentinel,
}

/// Mapping of logical fields to physical columns for one file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnMapping {
    pub resolved: BTreeMap<GefField, ResolvedField>,
    /// Optional fields the file does not provide
    pub missing: Vec<GefField>,
}

impl ColumnMapping {
    /// Resolve every configured field against the header declarations
    pub fn resolve(header: &GefHeader, config: &GefReaderConfig, file: &str) -> Result<Self> {
        let mut mapping = ColumnMapping::default();

        for spec in &config.fields {
            let info = header
                .column_infos
                .iter()
                .find(|info| info.quantity == spec.quantity);

            match info {
                Some(info) => {
                    let column = info.column_number - 1;
                    debug!(
                        "Field {} resolved to column {} ({})",
                        spec.field.name(),
                        column,
                        info.description
                    );
                    mapping.resolved.insert(
                        spec.field,
                        ResolvedField {
                            spec: spec.clone(),
                            column,
                            sentinel: Sentinel::Token(String::new()),
                        },
                    );
                }
                None if spec.field.is_required() => {
                    return Err(Error::gef_format(
                        file,
                        format!(
                            "Key {} should be defined in the gef file",
                            spec.field.name()
                        ),
                    ));
                }
                None => {
                    warn!(
                        "Key {} is not defined in the gef file",
                        spec.field.name()
                    );
                    mapping.missing.push(spec.field);
                }
            }
        }

        mapping.match_sentinels(header, file)?;
        Ok(mapping)
    }

    /// Attach the void value of each resolved column
    ///
    /// The i-th `#COLUMNVOID=` entry belongs to physical column i.
    fn match_sentinels(&mut self, header: &GefHeader, file: &str) -> Result<()> {
        let declared = header.declared_columns();
        if header.column_voids.len() < declared {
            return Err(Error::gef_format(
                file,
                format!(
                    "Found {} void declarations for {} columns",
                    header.column_voids.len(),
                    declared
                ),
            ));
        }

        for resolved in self.resolved.values_mut() {
            let raw = header.column_voids.get(resolved.column).ok_or_else(|| {
                Error::gef_format(
                    file,
                    format!(
                        "Index <{}> exceeds the void declarations of key '{}'",
                        resolved.column,
                        resolved.spec.field.name()
                    ),
                )
            })?;
            resolved.sentinel = Sentinel::from_declaration(raw, resolved.spec.unit_factor);
        }

        Ok(())
    }

    pub fn get(&self, field: GefField) -> Option<&ResolvedField> {
        self.resolved.get(&field)
    }

    /// Highest physical column index any resolved field reads
    pub fn max_column(&self) -> Option<usize> {
        self.resolved.values().map(|r| r.column).max()
    }
}
