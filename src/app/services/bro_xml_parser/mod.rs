//! BRO XML parser for CPT data from the Dutch national subsurface registry
//!
//! ## Architecture
//!
//! - [`parser`] - Document parsing and byte-range slice reading
//! - [`metadata`] - Namespaced scalar lookup and parameter availability
//! - [`location`] - Delivered location and reprojection to RD New
//! - [`values`] - Values table parsing with polars
//! - [`validation`] - Warning-only checks on the read sounding

pub mod location;
pub mod metadata;
pub mod parser;
pub mod validation;
pub mod values;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use location::reproject_to_rd;
pub use metadata::BroMetadata;
pub use parser::{BroXmlParser, ParseResult};
pub use values::ValuesTable;
