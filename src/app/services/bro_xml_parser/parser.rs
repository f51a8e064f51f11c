//! Core BRO XML parser implementation

use std::ops::Range;
use std::path::Path;
use tracing::{debug, info, warn};

use super::location::extract_location;
use super::metadata::{BroMetadata, available_columns, find_element};
use super::validation::validate;
use super::values::{ValuesTable, column_values, read_values};
use crate::app::models::{
    Channel, Outcome, Rejection, RejectionReason, SampleTable, Sounding, SoundingMetadata,
};
use crate::config::BroReaderConfig;
use crate::constants::{
    BRO_DOCUMENT_FOOTER, BRO_FEATURE_MEMBER_OPEN, MPA_TO_KPA, bro_columns, bro_ns,
};
use crate::{Error, Result};

/// Channels read from the values table, with whether they are scaled to kPa
const CHANNEL_COLUMNS: [(&str, Channel, bool); 9] = [
    (bro_columns::PENETRATION_LENGTH, Channel::PenetrationLength, false),
    (bro_columns::DEPTH, Channel::Depth, false),
    (bro_columns::CONE_RESISTANCE, Channel::Tip, true),
    (bro_columns::LOCAL_FRICTION, Channel::Friction, true),
    (bro_columns::FRICTION_RATIO, Channel::FrictionRatio, false),
    (bro_columns::INCLINATION_RESULTANT, Channel::InclinationResultant, false),
    (bro_columns::PORE_PRESSURE_U1, Channel::PorePressureU1, true),
    (bro_columns::PORE_PRESSURE_U2, Channel::PorePressureU2, true),
    (bro_columns::PORE_PRESSURE_U3, Channel::PorePressureU3, true),
];

/// Sounding read from a BRO XML document
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub sounding: Sounding,
    /// Parameters flagged as populated in the document
    pub available_columns: Vec<String>,
    /// Findings of the validation pass
    pub warnings: Vec<String>,
}

/// Reader for BRO XML CPT documents
#[derive(Debug, Clone, Default)]
pub struct BroXmlParser {
    config: BroReaderConfig,
}

impl BroXmlParser {
    pub fn new(config: BroReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BroReaderConfig {
        &self.config
    }

    /// Parse a BRO XML file from disk
    pub fn parse_file(&self, file_path: &Path) -> Result<Outcome<ParseResult>> {
        info!("Parsing BRO XML file: {}", file_path.display());
        let bytes = std::fs::read(file_path).map_err(|e| {
            Error::io(format!("Failed to read file {}", file_path.display()), e)
        })?;
        self.parse_bytes(&bytes)
    }

    /// Parse one `gml:featureMember` slice of a bulk document
    ///
    /// The slice is re-wrapped with the document preamble (which carries the
    /// namespace declarations) and the feature collection footer.
    pub fn read_slice(
        &self,
        document: &[u8],
        range: Range<usize>,
    ) -> Result<Outcome<ParseResult>> {
        let slice = document.get(range.clone()).ok_or_else(|| {
            Error::xml_format(format!(
                "Byte range {}..{} is outside the document of {} bytes",
                range.start,
                range.end,
                document.len()
            ))
        })?;
        let preamble_end = find_subslice(document, BRO_FEATURE_MEMBER_OPEN).ok_or_else(|| {
            Error::xml_format("Document has no gml:featureMember to anchor the slice")
        })?;
        debug!(
            "Reading slice {}..{} with {} byte preamble",
            range.start, range.end, preamble_end
        );

        let mut wrapped =
            Vec::with_capacity(preamble_end + slice.len() + BRO_DOCUMENT_FOOTER.len());
        wrapped.extend_from_slice(&document[..preamble_end]);
        wrapped.extend_from_slice(slice);
        wrapped.extend_from_slice(BRO_DOCUMENT_FOOTER);

        self.parse_bytes(&wrapped)
    }

    /// Parse a complete BRO XML document
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Outcome<ParseResult>> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::xml_format(format!("Document is not valid UTF-8: {}", e)))?;
        let doc = roxmltree::Document::parse(text)?;

        let metadata = BroMetadata::extract(&doc)?;
        let coordinates = extract_location(&doc)?;
        let available = available_columns(&doc);
        let record_id = metadata.bro_id.clone().unwrap_or_default();

        // An empty values element is an empty table, rejected downstream
        let values_text = find_element(doc.root(), bro_ns::CPT_COMMON, "conePenetrationTest")
            .and_then(|test| find_element(test, bro_ns::CPT_COMMON, "values"))
            .map(|values| values.text().unwrap_or_default())
            .ok_or_else(|| {
                Error::xml_format(format!("CPT {} has no values table", record_id))
            })?;

        let frame = match read_values(values_text, &available)? {
            ValuesTable::Table(frame) => frame,
            ValuesTable::WidthMismatch { found, expected } => {
                let rejection = Rejection::new(
                    record_id,
                    RejectionReason::ColumnCountMismatch { found, expected },
                );
                warn!("{}", rejection.message);
                return Ok(Outcome::Rejected(rejection));
            }
        };

        let factor = if self.config.convert_to_kpa {
            MPA_TO_KPA
        } else {
            1.0
        };
        let mut samples = SampleTable::new();
        for (name, channel, scaled) in CHANNEL_COLUMNS {
            if let Some(values) = column_values(&frame, name)? {
                let values = if scaled {
                    values.into_iter().map(|v| v.map(|x| x * factor)).collect()
                } else {
                    values
                };
                samples.insert(channel, values)?;
            }
        }

        let warnings = validate(
            &record_id,
            &metadata,
            &available,
            &samples,
            &self.config.quality,
        );

        info!(
            "Read CPT {} with {} samples in {} columns",
            record_id,
            samples.len(),
            frame.width()
        );

        let sounding_metadata = SoundingMetadata {
            name: record_id,
            coordinates,
            reference_level: metadata.offset,
            pre_drill: Some(metadata.predrilled_depth),
            cone_coefficient: metadata.cone_surface_quotient,
            vertical_datum: metadata.vertical_datum,
            local_reference: metadata.local_reference,
            cpt_standard: metadata.cpt_standard,
            quality_class: metadata.quality_class,
            cpt_type: metadata.cone_penetrometer_type,
            result_time: metadata.result_time,
        };

        Ok(Outcome::Accepted(ParseResult {
            sounding: Sounding::new(sounding_metadata, samples),
            available_columns: available,
            warnings,
        }))
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
