//! Core GEF parser implementation
//!
//! Handles file reading, header/body splitting and the coordination between
//! header parsing, column resolution and row extraction.

use std::path::Path;
use tracing::{debug, info};

use super::column_mapping::ColumnMapping;
use super::header::GefHeader;
use super::record_parser::{RecordParser, clamp_negatives, remove_sentinel_rows};
use super::stats::{ParseResult, ParseStats};
use crate::app::models::{Channel, SampleTable, Sounding, SoundingMetadata};
use crate::config::{GefField, GefReaderConfig};
use crate::constants::{DEFAULT_CONE_COEFFICIENT, GEF_END_OF_HEADER};
use crate::{Error, Result};

/// Reader for GEF CPT files
///
/// Each call builds fresh state; the parser itself only holds configuration.
#[derive(Debug, Clone)]
pub struct GefParser {
    config: GefReaderConfig,
    records: RecordParser,
}

impl GefParser {
    pub fn new(config: GefReaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            records: RecordParser::new()?,
        })
    }

    pub fn config(&self) -> &GefReaderConfig {
        &self.config
    }

    /// Parse a GEF file from disk
    pub fn parse_file(&self, file_path: &Path) -> Result<ParseResult> {
        info!("Parsing GEF file: {}", file_path.display());

        let bytes = std::fs::read(file_path).map_err(|e| {
            Error::io(format!("Failed to read file {}", file_path.display()), e)
        })?;
        let label = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());

        self.parse_bytes(&bytes, &label)
    }

    /// Parse GEF content; `label` names the source in errors and is the
    /// fallback record name when the file has no `#TESTID=`
    pub fn parse_bytes(&self, bytes: &[u8], label: &str) -> Result<ParseResult> {
        let content = String::from_utf8_lossy(bytes);
        let lines: Vec<&str> = content.lines().collect();

        let (header_lines, body) = self.split_sections(&lines, label)?;
        let header = GefHeader::parse(header_lines, label)?;
        debug!(
            "Parsed header: {} column declarations, {} void declarations",
            header.column_infos.len(),
            header.column_voids.len()
        );

        let mapping = ColumnMapping::resolve(&header, &self.config, label)?;

        let mut stats = ParseStats::new();
        stats.fields_resolved = mapping.resolved.len();
        stats.fields_missing = mapping
            .missing
            .iter()
            .map(|field| field.name().to_string())
            .collect();
        stats.total_rows = body.iter().filter(|line| !line.trim().is_empty()).count();

        let first_body_line = header_lines.len() + 2;
        let mut columns = self
            .records
            .parse_rows(body, first_body_line, &mapping, label)?;

        stats.sentinel_rows_removed = remove_sentinel_rows(&mut columns, &mapping);
        stats.negatives_clamped = clamp_negatives(&mut columns, &self.config.correct_for_negatives);

        info!(
            "Parsed {} rows from {} ({} void rows removed)",
            stats.rows_kept(),
            label,
            stats.sentinel_rows_removed
        );

        let mut samples = SampleTable::new();
        for (field, values) in columns {
            samples.insert_values(channel_for(field), values)?;
        }

        let metadata = SoundingMetadata {
            name: header.test_id.clone().unwrap_or_else(|| label.to_string()),
            coordinates: [header.x, header.y],
            reference_level: Some(header.reference_level),
            pre_drill: header.pre_drill_depth(),
            cone_coefficient: header.cone_coefficient().unwrap_or(DEFAULT_CONE_COEFFICIENT),
            vertical_datum: Some(header.z_system.clone()),
            local_reference: None,
            cpt_standard: header.report_code.clone(),
            quality_class: None,
            cpt_type: None,
            result_time: header.start_date.map(|d| d.format("%Y-%m-%d").to_string()),
        };

        Ok(ParseResult {
            sounding: Sounding::new(metadata, samples),
            stats,
        })
    }

    /// Split lines at the `#EOH=` marker
    fn split_sections<'l, 'a>(
        &self,
        lines: &'l [&'a str],
        file: &str,
    ) -> Result<(&'l [&'a str], &'l [&'a str])> {
        let end_of_header = lines
            .iter()
            .position(|line| line.trim_start().starts_with(GEF_END_OF_HEADER))
            .ok_or_else(|| {
                Error::gef_format(file, format!("No '{}' marker found", GEF_END_OF_HEADER))
            })?;

        Ok((&lines[..end_of_header], &lines[end_of_header + 1..]))
    }
}

/// Sounding channel fed by a GEF field
fn channel_for(field: GefField) -> Channel {
    match field {
        GefField::Depth => Channel::PenetrationLength,
        GefField::Tip => Channel::Tip,
        GefField::Friction => Channel::Friction,
        GefField::FrictionRatio => Channel::FrictionRatio,
        GefField::PorePressure => Channel::PorePressureU2,
        GefField::InclinationResultant => Channel::InclinationResultant,
        GefField::CorrectedDepth => Channel::Depth,
    }
}
