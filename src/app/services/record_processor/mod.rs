//! Record processing module for CPT soundings
//!
//! Both readers hand a [`Sounding`](crate::app::models::Sounding) to this
//! module, which cleans it, reconstructs vertical depth, pads pre-drilled
//! sections and assembles the canonical record.
//!
//! # Architecture
//!
//! - [`processor`] - SoundingProcessor and pipeline orchestration
//! - [`quality_filter`] - Threshold checks producing soft rejections
//! - [`deduplication`] - Duplicate penetration length removal
//! - [`depth`] - Depth from measured depth, inclination or penetration length
//! - [`pre_drill`] - Synthetic samples above the first measurement
//! - [`stats`] - Per sounding and per batch statistics
//!
//! # Processing Pipeline
//!
//! 1. **Cleaning**: Drop rows with missing values in any channel
//! 2. **Quality Gate**: Reject empty, all-zero, short and sparse soundings
//! 3. **Deduplication**: Keep the first sample per penetration length
//! 4. **Depth**: Reconstruct vertical depth
//! 5. **Pre-drill**: Pad the excavated top of the hole, if declared
//! 6. **Corruption Check**: Reject soundings with too many non-positive readings
//! 7. **Assembly**: Clamp, pick the pore pressure channel, build the record
//!
//! # Example Usage
//!
//! ```rust
//! use cpt_processor::app::models::{Channel, SampleTable, Sounding, SoundingMetadata};
//! use cpt_processor::app::services::record_processor::SoundingProcessor;
//! use cpt_processor::config::{PreDrillConfig, QualityControlConfig};
//!
//! # fn example() -> cpt_processor::Result<()> {
//! let mut samples = SampleTable::new();
//! samples.insert_values(Channel::PenetrationLength, vec![0.5, 1.0, 1.5])?;
//! samples.insert_values(Channel::Tip, vec![1.2, 3.4, 5.6])?;
//!
//! let metadata = SoundingMetadata {
//!     name: "CPT-1".to_string(),
//!     reference_level: Some(1.0),
//!     ..Default::default()
//! };
//!
//! let processor =
//!     SoundingProcessor::new(QualityControlConfig::disabled(), &PreDrillConfig::default())?;
//! let result = processor.process(Sounding::new(metadata, samples))?;
//! assert!(result.outcome.is_accepted());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod deduplication;
pub mod depth;
pub mod pre_drill;
pub mod processor;
pub mod quality_filter;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use depth::{DepthReconstructor, DepthSource};
pub use pre_drill::{PaddingSummary, PreDrillPadder, fill_missing_top};
pub use processor::{ProcessingResult, SoundingProcessor};
pub use quality_filter::QualityGate;
pub use stats::{BatchStats, ProcessingStats};
