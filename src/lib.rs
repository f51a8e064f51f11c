//! CPT Processor Library
//!
//! A Rust library for reading Cone Penetration Test (CPT) soundings from the
//! two Dutch exchange formats, GEF and BRO XML, into a single canonical record.
//!
//! This library provides tools for:
//! - Parsing GEF files with header-declared column, unit and void mappings
//! - Parsing BRO XML documents, including byte-range slices of bulk downloads
//! - Reprojecting delivered locations into RD New (EPSG:28992)
//! - Rejecting soundings that fail quality checks, as values rather than errors
//! - Reconstructing vertical depth and padding pre-drilled sections
//! - Serializing the canonical record to JSON

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod format;
    pub mod models;
    pub mod services {
        pub mod bro_xml_parser;
        pub mod gef_parser;
        pub mod record_processor;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::format::CptFormat;
pub use app::models::{CanonicalRecord, Outcome, Rejection, RejectionReason};
pub use config::ProcessingConfig;

/// Result type alias for the CPT processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for CPT reading and processing
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// GEF format error
    #[error("GEF format error in file '{file}': {message}")]
    GefFormat { file: String, message: String },

    /// BRO XML format error
    #[error("BRO XML format error: {message}")]
    XmlFormat { message: String },

    /// Malformed XML document
    #[error("XML parsing error: {source}")]
    Xml {
        #[from]
        source: roxmltree::Error,
    },

    /// Table operation failed
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Coordinate reference system cannot be converted to RD New
    #[error("Unsupported coordinate reference system: EPSG:{epsg}")]
    UnsupportedCrs { epsg: String },

    /// Coordinate transformation failed
    #[error("Projection error: {message}")]
    Projection { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Input format could not be determined
    #[error("Unknown CPT file format: {path}")]
    UnknownFormat { path: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a GEF format error
    pub fn gef_format(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GefFormat {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a BRO XML format error
    pub fn xml_format(message: impl Into<String>) -> Self {
        Self::XmlFormat {
            message: message.into(),
        }
    }

    /// Create an unsupported CRS error
    pub fn unsupported_crs(epsg: impl Into<String>) -> Self {
        Self::UnsupportedCrs { epsg: epsg.into() }
    }

    /// Create a projection error
    pub fn projection(message: impl Into<String>) -> Self {
        Self::Projection {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create an unknown format error
    pub fn unknown_format(path: impl Into<String>) -> Self {
        Self::UnknownFormat { path: path.into() }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
