//! Input format selection
//!
//! [`CptFormat`] picks the reader for a file and runs the shared record
//! processor on whatever the reader produced.

use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::app::models::{CanonicalRecord, Outcome, Rejection, Sounding};
use crate::app::services::bro_xml_parser::BroXmlParser;
use crate::app::services::gef_parser::GefParser;
use crate::app::services::record_processor::{
    ProcessingResult, ProcessingStats, SoundingProcessor,
};
use crate::config::{ProcessingConfig, QualityControlConfig};
use crate::constants::{BRO_XML_EXTENSIONS, GEF_EXTENSIONS};
use crate::{Error, Result};

/// Record name used for GEF content without `#TESTID=` read from memory
const UNNAMED_GEF: &str = "unnamed";

/// The two supported CPT exchange formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CptFormat {
    /// Delimited GEF file
    Gef,
    /// BRO registry XML document
    BroXml,
}

impl CptFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if GEF_EXTENSIONS.contains(&extension.as_str()) {
            Ok(CptFormat::Gef)
        } else if BRO_XML_EXTENSIONS.contains(&extension.as_str()) {
            Ok(CptFormat::BroXml)
        } else {
            Err(Error::unknown_format(path.display().to_string()))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CptFormat::Gef => "gef",
            CptFormat::BroXml => "bro-xml",
        }
    }

    /// Parse a buffer with the default configuration
    pub fn parse(&self, bytes: &[u8]) -> Result<Outcome<CanonicalRecord>> {
        self.parse_with(bytes, &ProcessingConfig::default())
    }

    /// Parse a buffer into a canonical record or a rejection
    pub fn parse_with(
        &self,
        bytes: &[u8],
        config: &ProcessingConfig,
    ) -> Result<Outcome<CanonicalRecord>> {
        Ok(self.process_bytes(bytes, UNNAMED_GEF, config)?.outcome)
    }

    /// Read and process a file, keeping the processing statistics
    ///
    /// GEF records without `#TESTID=` are named after the file stem.
    pub fn process_file(
        &self,
        path: &Path,
        config: &ProcessingConfig,
    ) -> Result<ProcessingResult> {
        config.validate()?;
        let sounding = match self {
            CptFormat::Gef => {
                GefParser::new(config.gef.clone())?
                    .parse_file(path)?
                    .sounding
            }
            CptFormat::BroXml => {
                match BroXmlParser::new(config.bro.clone()).parse_file(path)? {
                    Outcome::Accepted(parsed) => parsed.sounding,
                    Outcome::Rejected(rejection) => return Ok(rejected(rejection)),
                }
            }
        };
        self.process_sounding(sounding, config)
    }

    /// Read and process a buffer; `label` names GEF content without `#TESTID=`
    pub fn process_bytes(
        &self,
        bytes: &[u8],
        label: &str,
        config: &ProcessingConfig,
    ) -> Result<ProcessingResult> {
        config.validate()?;
        let sounding = match self {
            CptFormat::Gef => {
                GefParser::new(config.gef.clone())?
                    .parse_bytes(bytes, label)?
                    .sounding
            }
            CptFormat::BroXml => {
                match BroXmlParser::new(config.bro.clone()).parse_bytes(bytes)? {
                    Outcome::Accepted(parsed) => parsed.sounding,
                    Outcome::Rejected(rejection) => return Ok(rejected(rejection)),
                }
            }
        };
        self.process_sounding(sounding, config)
    }

    fn process_sounding(
        &self,
        sounding: Sounding,
        config: &ProcessingConfig,
    ) -> Result<ProcessingResult> {
        debug!(
            "Processing {} sounding {} with {} rows",
            self,
            sounding.metadata.name,
            sounding.samples.len()
        );
        SoundingProcessor::new(self.quality(config).clone(), &config.pre_drill)?
            .process(sounding)
    }

    fn quality<'a>(&self, config: &'a ProcessingConfig) -> &'a QualityControlConfig {
        match self {
            CptFormat::Gef => &config.gef.quality,
            CptFormat::BroXml => &config.bro.quality,
        }
    }
}

/// Parse one CPT slice of a bulk BRO XML document
///
/// `range` is the byte range of a single `gml:featureMember`, as returned by
/// a spatial lookup over the bulk file.
pub fn read_bro_slice(
    document: &[u8],
    range: Range<usize>,
    config: &ProcessingConfig,
) -> Result<Outcome<CanonicalRecord>> {
    config.validate()?;
    match BroXmlParser::new(config.bro.clone()).read_slice(document, range)? {
        Outcome::Accepted(parsed) => Ok(CptFormat::BroXml
            .process_sounding(parsed.sounding, config)?
            .outcome),
        Outcome::Rejected(rejection) => Ok(Outcome::Rejected(rejection)),
    }
}

fn rejected(rejection: Rejection) -> ProcessingResult {
    ProcessingResult {
        outcome: Outcome::Rejected(rejection),
        stats: ProcessingStats::new(),
    }
}

impl fmt::Display for CptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CptFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gef" => Ok(CptFormat::Gef),
            "bro-xml" | "bro_xml" | "xml" => Ok(CptFormat::BroXml),
            other => Err(Error::unknown_format(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::gef_parser::tests::create_test_gef;
    use std::io::Write;

    #[test]
    fn test_from_path() {
        assert_eq!(
            CptFormat::from_path(Path::new("data/CPT000001.gef")).unwrap(),
            CptFormat::Gef
        );
        assert_eq!(
            CptFormat::from_path(Path::new("CPT000000012345.XML")).unwrap(),
            CptFormat::BroXml
        );
        assert!(matches!(
            CptFormat::from_path(Path::new("notes.txt")),
            Err(Error::UnknownFormat { .. })
        ));
        assert!(CptFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("GEF".parse::<CptFormat>().unwrap(), CptFormat::Gef);
        assert_eq!("bro-xml".parse::<CptFormat>().unwrap(), CptFormat::BroXml);
        assert!("csv".parse::<CptFormat>().is_err());
        assert_eq!(CptFormat::BroXml.to_string(), "bro-xml");
    }

    #[test]
    fn test_parse_gef_bytes() {
        let outcome = CptFormat::Gef.parse(create_test_gef().as_bytes()).unwrap();
        let record = outcome.accepted().unwrap();

        assert_eq!(record.name, "DKP302");
        assert_eq!(record.len(), 20);
    }

    #[test]
    fn test_process_file_uses_quality_of_format() {
        let mut file = tempfile::Builder::new().suffix(".gef").tempfile().unwrap();
        file.write_all(create_test_gef().as_bytes()).unwrap();

        let config = ProcessingConfig::default().with_quality_overrides(None, Some(50), None);
        let result = CptFormat::from_path(file.path())
            .unwrap()
            .process_file(file.path(), &config)
            .unwrap();

        assert!(!result.outcome.is_accepted());
    }

    #[test]
    fn test_invalid_config_is_error() {
        let config = ProcessingConfig::default()
            .with_quality_overrides(None, None, Some(2.0));
        assert!(matches!(
            CptFormat::Gef.parse_with(create_test_gef().as_bytes(), &config),
            Err(Error::Configuration { .. })
        ));
    }
}
