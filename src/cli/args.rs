//! Command-line argument definitions for the CPT processor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::app::format::CptFormat;
use crate::app::models::CanonicalField;
use crate::config::ProcessingConfig;
use crate::constants::DEFAULT_LOG_LEVEL;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the CPT processor
///
/// Reads Cone Penetration Test soundings from GEF and BRO XML files into one
/// canonical, quality-checked record.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cpt-processor",
    version,
    about = "Read CPT soundings from GEF and BRO XML files into a canonical record",
    long_about = "Reads Cone Penetration Test soundings delivered as GEF files or BRO XML \
                  documents, resolves their declared column layouts, reprojects locations to \
                  RD New, reconstructs vertical depth, pads pre-drilled sections and rejects \
                  soundings that fail quality checks."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Read a single CPT file and print the canonical record
    Read(ReadArgs),
    /// Read every CPT file in a directory and summarize the outcomes
    Batch(BatchArgs),
}

/// Arguments for the read command
#[derive(Debug, Clone, Parser)]
pub struct ReadArgs {
    /// CPT file to read (.gef or .xml)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Input format; detected from the file extension when omitted
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// Output format for the record
    #[arg(long = "output", value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Record fields to include in JSON output (comma-separated list)
    ///
    /// Valid fields: name, coordinates, vertical_datum, local_reference,
    /// cpt_standard, quality_class, cpt_type, result_time,
    /// local_reference_level, a, pre_drill_depth, water_measurement_type,
    /// penetration_length, depth, depth_to_reference, tip, friction,
    /// friction_ratio, water, inclination_resultant
    #[arg(long = "fields", value_name = "LIST")]
    pub fields: Option<FieldList>,

    #[command(flatten)]
    pub quality: QualityArgs,

    #[command(flatten)]
    pub logging: LogArgs,
}

/// Arguments for the batch command
#[derive(Debug, Clone, Parser)]
pub struct BatchArgs {
    /// Directory containing CPT files
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Descend into subdirectories
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Output format for the summary
    #[arg(long = "output", value_enum, default_value = "human")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub quality: QualityArgs,

    #[command(flatten)]
    pub logging: LogArgs,
}

/// Quality threshold overrides shared by both commands
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct QualityArgs {
    /// Minimum penetration length in metres
    #[arg(long = "min-length", value_name = "METRES")]
    pub min_length: Option<f64>,

    /// Minimum number of samples
    #[arg(long = "min-samples", value_name = "COUNT")]
    pub min_samples: Option<usize>,

    /// Maximum fraction of non-positive tip or friction samples (0 to 1)
    #[arg(long = "max-corrupted-ratio", value_name = "RATIO")]
    pub max_corrupted_ratio: Option<f64>,
}

/// Logging flags shared by both commands
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct LogArgs {
    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Input format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Gef,
    BroXml,
}

impl From<FormatArg> for CptFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Gef => CptFormat::Gef,
            FormatArg::BroXml => CptFormat::BroXml,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Wrapper for parsing comma-separated record field lists
#[derive(Debug, Clone, PartialEq)]
pub struct FieldList {
    pub fields: Vec<CanonicalField>,
}

impl FromStr for FieldList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let fields = s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(CanonicalField::from_str)
            .collect::<Result<Vec<_>>>()?;

        if fields.is_empty() {
            return Err(Error::data_validation("Field list cannot be empty"));
        }
        Ok(FieldList { fields })
    }
}

impl QualityArgs {
    /// Processing configuration with these overrides applied to both formats
    pub fn to_config(&self) -> Result<ProcessingConfig> {
        let config = ProcessingConfig::default().with_quality_overrides(
            self.min_length,
            self.min_samples,
            self.max_corrupted_ratio,
        );
        config.validate()?;
        Ok(config)
    }
}

impl LogArgs {
    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => DEFAULT_LOG_LEVEL,
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ReadArgs {
    /// Validate the read command arguments
    pub fn validate(&self) -> Result<()> {
        if !self.file.is_file() {
            return Err(Error::configuration(format!(
                "Input file does not exist: {}",
                self.file.display()
            )));
        }
        if self.fields.is_some() && self.output != OutputFormat::Json {
            return Err(Error::configuration(
                "--fields only applies to --output json",
            ));
        }
        Ok(())
    }

    /// Explicit format, or the one implied by the file extension
    pub fn resolve_format(&self) -> Result<CptFormat> {
        match self.format {
            Some(format) => Ok(format.into()),
            None => CptFormat::from_path(&self.file),
        }
    }
}

impl BatchArgs {
    /// Validate the batch command arguments
    pub fn validate(&self) -> Result<()> {
        if !self.dir.is_dir() {
            return Err(Error::configuration(format!(
                "Input path is not a directory: {}",
                self.dir.display()
            )));
        }
        Ok(())
    }
}
