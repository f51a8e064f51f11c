//! Data models for CPT processing
//!
//! This module contains the canonical record every reader produces, the
//! builder used to assemble it, and the scratch sounding and outcome types
//! shared by the readers and the record processor.

pub mod outcome;
pub mod sounding;

pub use outcome::{Outcome, Rejection, RejectionReason};
pub use sounding::{Channel, SampleTable, Sounding, SoundingMetadata};

use crate::constants;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Water Measurement Type
// =============================================================================

/// Which pore pressure channel fed the `water` sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterMeasurementType {
    #[serde(rename = "porePressureU1")]
    PorePressureU1,
    #[serde(rename = "porePressureU2")]
    PorePressureU2,
    #[serde(rename = "porePressureU3")]
    PorePressureU3,
    #[serde(rename = "no_measurements")]
    NoMeasurements,
}

impl WaterMeasurementType {
    pub fn from_channel(channel: Channel) -> Self {
        match channel {
            Channel::PorePressureU1 => WaterMeasurementType::PorePressureU1,
            Channel::PorePressureU2 => WaterMeasurementType::PorePressureU2,
            Channel::PorePressureU3 => WaterMeasurementType::PorePressureU3,
            _ => WaterMeasurementType::NoMeasurements,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WaterMeasurementType::PorePressureU1 => "porePressureU1",
            WaterMeasurementType::PorePressureU2 => "porePressureU2",
            WaterMeasurementType::PorePressureU3 => "porePressureU3",
            WaterMeasurementType::NoMeasurements => constants::NO_WATER_MEASUREMENTS,
        }
    }
}

impl fmt::Display for WaterMeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Canonical Record
// =============================================================================

/// The unified CPT record produced from either file format
///
/// All sequences are index aligned. Depths are in metres, `tip`, `friction`
/// and `water` in kPa (unless conversion was disabled), `friction_ratio` in
/// percent and `inclination_resultant` in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub name: String,

    /// `[x, y]` in RD New (EPSG:28992)
    pub coordinates: [f64; 2],

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_datum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpt_standard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpt_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_time: Option<String>,

    /// Height of the local reference point relative to the vertical datum
    pub local_reference_level: f64,

    /// Cone coefficient (net area ratio)
    pub a: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_drill_depth: Option<f64>,

    pub water_measurement_type: WaterMeasurementType,

    pub penetration_length: Vec<f64>,
    pub depth: Vec<f64>,
    pub depth_to_reference: Vec<f64>,
    pub tip: Vec<f64>,
    pub friction: Vec<f64>,
    pub friction_ratio: Vec<f64>,
    #[serde(rename = "water")]
    pub pore_pressure: Vec<f64>,
    pub inclination_resultant: Vec<Option<f64>>,
}

impl CanonicalRecord {
    pub fn builder(name: impl Into<String>) -> CanonicalRecordBuilder {
        CanonicalRecordBuilder::new(name)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    /// Maximum depth reached, if any samples exist
    pub fn max_depth(&self) -> Option<f64> {
        self.depth.iter().copied().reduce(f64::max)
    }

    /// Validate alignment and value ranges
    pub fn validate(&self) -> Result<()> {
        let expected = self.depth.len();
        let lengths = [
            ("penetration_length", self.penetration_length.len()),
            ("depth_to_reference", self.depth_to_reference.len()),
            ("tip", self.tip.len()),
            ("friction", self.friction.len()),
            ("friction_ratio", self.friction_ratio.len()),
            ("water", self.pore_pressure.len()),
            ("inclination_resultant", self.inclination_resultant.len()),
        ];
        for (field, length) in lengths {
            if length != expected {
                return Err(Error::data_validation(format!(
                    "Record {}: {} has {} samples, depth has {}",
                    self.name, field, length, expected
                )));
            }
        }

        for (field, values) in [
            ("tip", &self.tip),
            ("friction", &self.friction),
            ("friction_ratio", &self.friction_ratio),
        ] {
            if let Some(value) = values.iter().find(|v| **v < 0.0) {
                return Err(Error::data_validation(format!(
                    "Record {}: {} contains negative value {}",
                    self.name, field, value
                )));
            }
        }

        Ok(())
    }

    /// Serialize only the selected fields
    pub fn to_json_subset(&self, fields: &[CanonicalField]) -> Result<serde_json::Value> {
        let full = serde_json::to_value(self)
            .map_err(|e| Error::data_validation(format!("Cannot serialize record: {}", e)))?;
        let mut subset = serde_json::Map::new();
        if let serde_json::Value::Object(mut map) = full {
            for field in fields {
                if let Some(value) = map.remove(field.key()) {
                    subset.insert(field.key().to_string(), value);
                }
            }
        }
        Ok(serde_json::Value::Object(subset))
    }
}

// =============================================================================
// Canonical Record Builder
// =============================================================================

/// Typed assembly of a [`CanonicalRecord`]
///
/// Missing sequences default to empty and `build` checks that every sequence
/// ends up with the same length.
#[derive(Debug, Clone)]
pub struct CanonicalRecordBuilder {
    record: CanonicalRecord,
}

impl CanonicalRecordBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            record: CanonicalRecord {
                name: name.into(),
                coordinates: [0.0, 0.0],
                vertical_datum: None,
                local_reference: None,
                cpt_standard: None,
                quality_class: None,
                cpt_type: None,
                result_time: None,
                local_reference_level: 0.0,
                a: constants::DEFAULT_CONE_COEFFICIENT,
                pre_drill_depth: None,
                water_measurement_type: WaterMeasurementType::NoMeasurements,
                penetration_length: Vec::new(),
                depth: Vec::new(),
                depth_to_reference: Vec::new(),
                tip: Vec::new(),
                friction: Vec::new(),
                friction_ratio: Vec::new(),
                pore_pressure: Vec::new(),
                inclination_resultant: Vec::new(),
            },
        }
    }

    pub fn coordinates(mut self, x: f64, y: f64) -> Self {
        self.record.coordinates = [x, y];
        self
    }

    pub fn vertical_datum(mut self, value: Option<String>) -> Self {
        self.record.vertical_datum = value;
        self
    }

    pub fn local_reference(mut self, value: Option<String>) -> Self {
        self.record.local_reference = value;
        self
    }

    pub fn cpt_standard(mut self, value: Option<String>) -> Self {
        self.record.cpt_standard = value;
        self
    }

    pub fn quality_class(mut self, value: Option<String>) -> Self {
        self.record.quality_class = value;
        self
    }

    pub fn cpt_type(mut self, value: Option<String>) -> Self {
        self.record.cpt_type = value;
        self
    }

    pub fn result_time(mut self, value: Option<String>) -> Self {
        self.record.result_time = value;
        self
    }

    pub fn local_reference_level(mut self, level: f64) -> Self {
        self.record.local_reference_level = level;
        self
    }

    pub fn cone_coefficient(mut self, a: f64) -> Self {
        self.record.a = a;
        self
    }

    pub fn pre_drill_depth(mut self, depth: Option<f64>) -> Self {
        self.record.pre_drill_depth = depth;
        self
    }

    pub fn water_measurement_type(mut self, kind: WaterMeasurementType) -> Self {
        self.record.water_measurement_type = kind;
        self
    }

    pub fn penetration_length(mut self, values: Vec<f64>) -> Self {
        self.record.penetration_length = values;
        self
    }

    /// Set depth and derive `depth_to_reference` from the reference level at build time
    pub fn depth(mut self, values: Vec<f64>) -> Self {
        self.record.depth = values;
        self
    }

    pub fn tip(mut self, values: Vec<f64>) -> Self {
        self.record.tip = values;
        self
    }

    pub fn friction(mut self, values: Vec<f64>) -> Self {
        self.record.friction = values;
        self
    }

    pub fn friction_ratio(mut self, values: Vec<f64>) -> Self {
        self.record.friction_ratio = values;
        self
    }

    pub fn pore_pressure(mut self, values: Vec<f64>) -> Self {
        self.record.pore_pressure = values;
        self
    }

    pub fn inclination_resultant(mut self, values: Vec<Option<f64>>) -> Self {
        self.record.inclination_resultant = values;
        self
    }

    /// Finish the record, computing `depth_to_reference`
    pub fn build(mut self) -> Result<CanonicalRecord> {
        let level = self.record.local_reference_level;
        self.record.depth_to_reference = self.record.depth.iter().map(|d| level - d).collect();

        let samples = self.record.depth.len();
        if self.record.inclination_resultant.is_empty() && samples > 0 {
            self.record.inclination_resultant = vec![None; samples];
        }

        self.record.validate()?;
        Ok(self.record)
    }
}

// =============================================================================
// Canonical Field Selection
// =============================================================================

/// A selectable field of the canonical record, by serialized key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Name,
    Coordinates,
    VerticalDatum,
    LocalReference,
    CptStandard,
    QualityClass,
    CptType,
    ResultTime,
    LocalReferenceLevel,
    A,
    PreDrillDepth,
    WaterMeasurementType,
    PenetrationLength,
    Depth,
    DepthToReference,
    Tip,
    Friction,
    FrictionRatio,
    Water,
    InclinationResultant,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 20] = [
        CanonicalField::Name,
        CanonicalField::Coordinates,
        CanonicalField::VerticalDatum,
        CanonicalField::LocalReference,
        CanonicalField::CptStandard,
        CanonicalField::QualityClass,
        CanonicalField::CptType,
        CanonicalField::ResultTime,
        CanonicalField::LocalReferenceLevel,
        CanonicalField::A,
        CanonicalField::PreDrillDepth,
        CanonicalField::WaterMeasurementType,
        CanonicalField::PenetrationLength,
        CanonicalField::Depth,
        CanonicalField::DepthToReference,
        CanonicalField::Tip,
        CanonicalField::Friction,
        CanonicalField::FrictionRatio,
        CanonicalField::Water,
        CanonicalField::InclinationResultant,
    ];

    /// Serialized key of the field
    pub fn key(&self) -> &'static str {
        match self {
            CanonicalField::Name => "name",
            CanonicalField::Coordinates => "coordinates",
            CanonicalField::VerticalDatum => "vertical_datum",
            CanonicalField::LocalReference => "local_reference",
            CanonicalField::CptStandard => "cpt_standard",
            CanonicalField::QualityClass => "quality_class",
            CanonicalField::CptType => "cpt_type",
            CanonicalField::ResultTime => "result_time",
            CanonicalField::LocalReferenceLevel => "local_reference_level",
            CanonicalField::A => "a",
            CanonicalField::PreDrillDepth => "pre_drill_depth",
            CanonicalField::WaterMeasurementType => "water_measurement_type",
            CanonicalField::PenetrationLength => "penetration_length",
            CanonicalField::Depth => "depth",
            CanonicalField::DepthToReference => "depth_to_reference",
            CanonicalField::Tip => "tip",
            CanonicalField::Friction => "friction",
            CanonicalField::FrictionRatio => "friction_ratio",
            CanonicalField::Water => "water",
            CanonicalField::InclinationResultant => "inclination_resultant",
        }
    }
}

impl FromStr for CanonicalField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.key() == key)
            .ok_or_else(|| {
                Error::data_validation(format!(
                    "Unknown record field '{}'. Valid fields: {}",
                    key,
                    Self::ALL
                        .iter()
                        .map(|f| f.key())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
