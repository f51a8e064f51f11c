//! GEF parser for CPT data files
//!
//! GEF files carry a `#KEY= value` header terminated by `#EOH=`, followed by
//! delimited numeric rows. Which quantity lives in which column, and which
//! value marks a void sample, is declared per file.
//!
//! ## Architecture
//!
//! - [`parser`] - Orchestration and header/body splitting
//! - [`header`] - Header metadata extraction
//! - [`column_mapping`] - Field to column resolution and void values
//! - [`record_parser`] - Row extraction, void row removal, negative clamping
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```no_run
//! use cpt_processor::app::services::gef_parser::GefParser;
//! use cpt_processor::config::GefReaderConfig;
//!
//! # fn example() -> cpt_processor::Result<()> {
//! let parser = GefParser::new(GefReaderConfig::default())?;
//! let result = parser.parse_file(std::path::Path::new("CPT000001.gef"))?;
//!
//! println!("Read {} of {} rows", result.stats.rows_kept(), result.stats.total_rows);
//! # Ok(())
//! # }
//! ```

pub mod column_mapping;
pub mod header;
pub mod parser;
pub mod record_parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::{ColumnMapping, Sentinel};
pub use header::GefHeader;
pub use parser::GefParser;
pub use stats::{ParseResult, ParseStats};
