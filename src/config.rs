//! Configuration management and validation.
//!
//! Provides configuration structures for the GEF and BRO XML readers, the
//! quality thresholds each format applies, and the pre-drill padding settings.

use crate::constants::{self, gef_quantity};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// Quality Control
// =============================================================================

/// Thresholds applied by the quality gate
///
/// A `None` threshold disables the corresponding check. Registry (BRO XML)
/// soundings are checked on length and sample count; GEF files historically
/// are not, so their defaults leave those two checks off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityControlConfig {
    /// Minimum absolute penetration length in metres
    pub minimum_length: Option<f64>,

    /// Minimum number of samples
    pub minimum_samples: Option<usize>,

    /// Maximum fraction of non-positive tip or friction samples
    pub maximum_corrupted_ratio: Option<f64>,
}

impl QualityControlConfig {
    /// Thresholds used for BRO XML soundings
    pub fn registry_defaults() -> Self {
        Self {
            minimum_length: Some(constants::DEFAULT_MINIMUM_LENGTH),
            minimum_samples: Some(constants::DEFAULT_MINIMUM_SAMPLES),
            maximum_corrupted_ratio: Some(constants::DEFAULT_MAXIMUM_CORRUPTED_RATIO),
        }
    }

    /// Thresholds used for GEF soundings
    pub fn delimited_defaults() -> Self {
        Self {
            minimum_length: None,
            minimum_samples: None,
            maximum_corrupted_ratio: Some(constants::DEFAULT_MAXIMUM_CORRUPTED_RATIO),
        }
    }

    /// Thresholds that accept everything
    pub fn disabled() -> Self {
        Self {
            minimum_length: None,
            minimum_samples: None,
            maximum_corrupted_ratio: None,
        }
    }

    pub fn with_minimum_length(mut self, minimum_length: f64) -> Self {
        self.minimum_length = Some(minimum_length);
        self
    }

    pub fn with_minimum_samples(mut self, minimum_samples: usize) -> Self {
        self.minimum_samples = Some(minimum_samples);
        self
    }

    pub fn with_maximum_corrupted_ratio(mut self, ratio: f64) -> Self {
        self.maximum_corrupted_ratio = Some(ratio);
        self
    }

    /// Validate threshold ranges
    pub fn validate(&self) -> Result<()> {
        if let Some(length) = self.minimum_length {
            if !length.is_finite() || length < 0.0 {
                return Err(Error::configuration(format!(
                    "Minimum length must be a non-negative number, got {}",
                    length
                )));
            }
        }

        if let Some(ratio) = self.maximum_corrupted_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(Error::configuration(format!(
                    "Maximum corrupted ratio must be between 0 and 1, got {}",
                    ratio
                )));
            }
        }

        Ok(())
    }
}

impl Default for QualityControlConfig {
    fn default() -> Self {
        Self::registry_defaults()
    }
}

// =============================================================================
// Pre-drill Padding
// =============================================================================

/// Settings for synthesizing samples above the first measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreDrillConfig {
    /// Number of leading real samples averaged into synthetic samples
    pub average_samples: usize,
}

impl Default for PreDrillConfig {
    fn default() -> Self {
        Self {
            average_samples: constants::DEFAULT_PRE_DRILL_AVERAGE_SAMPLES,
        }
    }
}

impl PreDrillConfig {
    pub fn with_average_samples(mut self, average_samples: usize) -> Self {
        self.average_samples = average_samples;
        self
    }
}

// =============================================================================
// GEF Reader
// =============================================================================

/// Logical measurements the GEF reader can resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GefField {
    /// Penetration length along the rod
    Depth,
    Tip,
    Friction,
    FrictionRatio,
    PorePressure,
    InclinationResultant,
    /// Vertical depth corrected for inclination by the data supplier
    CorrectedDepth,
}

impl GefField {
    /// Name used in log and error messages
    pub fn name(&self) -> &'static str {
        match self {
            GefField::Depth => "depth",
            GefField::Tip => "tip",
            GefField::Friction => "friction",
            GefField::FrictionRatio => "friction_ratio",
            GefField::PorePressure => "pore_pressure",
            GefField::InclinationResultant => "inclination_resultant",
            GefField::CorrectedDepth => "corrected_depth",
        }
    }

    /// Whether a file lacking this field is unreadable
    pub fn is_required(&self) -> bool {
        matches!(self, GefField::Depth | GefField::Tip)
    }
}

/// Where a logical field lives in a GEF file and how to scale it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GefFieldSpec {
    pub field: GefField,

    /// GEF quantity number matched against `#COLUMNINFO=` declarations
    pub quantity: u32,

    /// Multiplier into canonical units
    pub unit_factor: f64,
}

impl GefFieldSpec {
    pub fn new(field: GefField, quantity: u32, unit_factor: f64) -> Self {
        Self {
            field,
            quantity,
            unit_factor,
        }
    }
}

/// GEF reader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GefReaderConfig {
    /// Field schema, one entry per logical measurement
    pub fields: Vec<GefFieldSpec>,

    /// Fields whose negative values are clamped to zero after reading
    pub correct_for_negatives: Vec<GefField>,

    /// Quality thresholds for GEF soundings
    pub quality: QualityControlConfig,
}

impl Default for GefReaderConfig {
    fn default() -> Self {
        Self {
            fields: vec![
                GefFieldSpec::new(GefField::Depth, gef_quantity::PENETRATION_LENGTH, 1.0),
                GefFieldSpec::new(GefField::Tip, gef_quantity::TIP, constants::MPA_TO_KPA),
                GefFieldSpec::new(
                    GefField::Friction,
                    gef_quantity::FRICTION,
                    constants::MPA_TO_KPA,
                ),
                GefFieldSpec::new(GefField::FrictionRatio, gef_quantity::FRICTION_RATIO, 1.0),
                GefFieldSpec::new(
                    GefField::PorePressure,
                    gef_quantity::PORE_PRESSURE,
                    constants::MPA_TO_KPA,
                ),
                GefFieldSpec::new(
                    GefField::InclinationResultant,
                    gef_quantity::INCLINATION_RESULTANT,
                    1.0,
                ),
                GefFieldSpec::new(GefField::CorrectedDepth, gef_quantity::CORRECTED_DEPTH, 1.0),
            ],
            correct_for_negatives: vec![GefField::Depth],
            quality: QualityControlConfig::delimited_defaults(),
        }
    }
}

impl GefReaderConfig {
    /// Replace the field schema
    pub fn with_fields(mut self, fields: Vec<GefFieldSpec>) -> Self {
        self.fields = fields;
        self
    }

    /// Replace the set of fields clamped to non-negative values
    pub fn with_correct_for_negatives(mut self, fields: Vec<GefField>) -> Self {
        self.correct_for_negatives = fields;
        self
    }

    pub fn with_quality(mut self, quality: QualityControlConfig) -> Self {
        self.quality = quality;
        self
    }

    /// Look up the schema entry of a field
    pub fn spec(&self, field: GefField) -> Option<&GefFieldSpec> {
        self.fields.iter().find(|spec| spec.field == field)
    }

    /// Validate the field schema
    pub fn validate(&self) -> Result<()> {
        for required in [GefField::Depth, GefField::Tip] {
            if self.spec(required).is_none() {
                return Err(Error::configuration(format!(
                    "GEF field schema must define '{}'",
                    required.name()
                )));
            }
        }

        let mut seen_fields = HashSet::new();
        let mut seen_quantities = HashSet::new();
        for spec in &self.fields {
            if !seen_fields.insert(spec.field) {
                return Err(Error::configuration(format!(
                    "GEF field '{}' is defined more than once",
                    spec.field.name()
                )));
            }
            if !seen_quantities.insert(spec.quantity) {
                return Err(Error::configuration(format!(
                    "GEF quantity number {} is mapped to more than one field",
                    spec.quantity
                )));
            }
            if !spec.unit_factor.is_finite() || spec.unit_factor == 0.0 {
                return Err(Error::configuration(format!(
                    "Unit factor of '{}' must be a non-zero number",
                    spec.field.name()
                )));
            }
        }

        self.quality.validate()
    }
}

// =============================================================================
// BRO XML Reader
// =============================================================================

/// BRO XML reader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroReaderConfig {
    /// Convert cone resistance, friction and pore pressures from MPa to kPa
    pub convert_to_kpa: bool,

    /// Quality thresholds for registry soundings
    pub quality: QualityControlConfig,
}

impl Default for BroReaderConfig {
    fn default() -> Self {
        Self {
            convert_to_kpa: true,
            quality: QualityControlConfig::registry_defaults(),
        }
    }
}

impl BroReaderConfig {
    pub fn with_convert_to_kpa(mut self, convert_to_kpa: bool) -> Self {
        self.convert_to_kpa = convert_to_kpa;
        self
    }

    pub fn with_quality(mut self, quality: QualityControlConfig) -> Self {
        self.quality = quality;
        self
    }
}

// =============================================================================
// Processing Configuration
// =============================================================================

/// Global configuration for CPT processing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub gef: GefReaderConfig,
    pub bro: BroReaderConfig,
    pub pre_drill: PreDrillConfig,
}

impl ProcessingConfig {
    pub fn with_gef(mut self, gef: GefReaderConfig) -> Self {
        self.gef = gef;
        self
    }

    pub fn with_bro(mut self, bro: BroReaderConfig) -> Self {
        self.bro = bro;
        self
    }

    pub fn with_pre_drill(mut self, pre_drill: PreDrillConfig) -> Self {
        self.pre_drill = pre_drill;
        self
    }

    /// Apply the same threshold overrides to both formats
    pub fn with_quality_overrides(
        mut self,
        minimum_length: Option<f64>,
        minimum_samples: Option<usize>,
        maximum_corrupted_ratio: Option<f64>,
    ) -> Self {
        for quality in [&mut self.gef.quality, &mut self.bro.quality] {
            if let Some(length) = minimum_length {
                quality.minimum_length = Some(length);
            }
            if let Some(samples) = minimum_samples {
                quality.minimum_samples = Some(samples);
            }
            if let Some(ratio) = maximum_corrupted_ratio {
                quality.maximum_corrupted_ratio = Some(ratio);
            }
        }
        self
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<()> {
        if self.pre_drill.average_samples == 0 {
            return Err(Error::configuration(
                "Pre-drill averaging needs at least one sample",
            ));
        }
        self.gef.validate()?;
        self.bro.quality.validate()
    }
}
