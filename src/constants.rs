//! Application constants for the CPT processor
//!
//! This module contains the format markers, namespaces, default thresholds
//! and column schemas used by the GEF and BRO XML readers and by the
//! record processing pipeline.

// =============================================================================
// File Formats
// =============================================================================

/// File extensions recognised as GEF (delimited) CPT files
pub const GEF_EXTENSIONS: &[&str] = &["gef"];

/// File extensions recognised as BRO XML CPT files
pub const BRO_XML_EXTENSIONS: &[&str] = &["xml"];

// =============================================================================
// GEF Format
// =============================================================================

/// Marker line that closes the GEF header section
pub const GEF_END_OF_HEADER: &str = "#EOH=";

/// Column declaration keyword (`#COLUMNINFO= column, unit, description, quantity`)
pub const GEF_COLUMN_INFO: &str = "#COLUMNINFO=";

/// Declared number of columns (`#COLUMN= n`)
pub const GEF_COLUMN_COUNT: &str = "#COLUMN=";

/// Per-column void (error code) declaration (`#COLUMNVOID= column, value`)
pub const GEF_COLUMN_VOID: &str = "#COLUMNVOID=";

/// Test identifier
pub const GEF_TEST_ID: &str = "#TESTID=";

/// Horizontal location (`#XYID= system, x, y, dx, dy`)
pub const GEF_XY_ID: &str = "#XYID=";

/// Vertical reference (`#ZID= system, z, dz`)
pub const GEF_Z_ID: &str = "#ZID=";

/// Report code, used as the measurement standard
pub const GEF_REPORT_CODE: &str = "#REPORTCODE=";

/// Start date of the sounding (`#STARTDATE= yyyy, mm, dd`)
pub const GEF_START_DATE: &str = "#STARTDATE=";

/// Measurement variable declaration (`#MEASUREMENTVAR= number, value, unit, description`)
pub const GEF_MEASUREMENT_VAR: &str = "#MEASUREMENTVAR=";

/// Delimiter runs normalised in GEF data rows
pub const GEF_DATA_DELIMITERS: &str = r"[ :,!;\t]+";

/// GEF quantity numbers for the logical CPT fields
pub mod gef_quantity {
    /// Penetration length (sondeerlengte)
    pub const PENETRATION_LENGTH: u32 = 1;
    /// Cone tip resistance
    pub const TIP: u32 = 2;
    /// Local sleeve friction
    pub const FRICTION: u32 = 3;
    /// Friction ratio
    pub const FRICTION_RATIO: u32 = 4;
    /// Pore pressure behind the cone (u2)
    pub const PORE_PRESSURE: u32 = 6;
    /// Resultant inclination
    pub const INCLINATION_RESULTANT: u32 = 8;
    /// Corrected (vertical) depth
    pub const CORRECTED_DEPTH: u32 = 11;
}

/// GEF measurement variable numbers
pub mod gef_measurement_var {
    /// Net surface area quotient of the cone tip (a)
    pub const CONE_COEFFICIENT: u32 = 3;
    /// Pre-excavated (pre-drilled) depth
    pub const PRE_DRILL_DEPTH: u32 = 13;
}

// =============================================================================
// BRO XML Format
// =============================================================================

/// XML namespaces used by the BRO CPT exchange format
pub mod bro_ns {
    pub const CPT_COMMON: &str = "http://www.broservices.nl/xsd/cptcommon/1.1";
    pub const DS_CPT: &str = "http://www.broservices.nl/xsd/dscpt/1.1";
    pub const GML: &str = "http://www.opengis.net/gml/3.2";
    pub const BRO_COMMON: &str = "http://www.broservices.nl/xsd/brocommon/3.0";
    pub const OM: &str = "http://www.opengis.net/om/2.0";
}

/// Start of one CPT within a bulk BRO XML document
pub const BRO_FEATURE_MEMBER_OPEN: &[u8] = b"<gml:featureMember>";

/// Closing tag of a bulk BRO XML document
pub const BRO_DOCUMENT_FOOTER: &[u8] = b"</gml:FeatureCollection>";

/// Numeric sentinel marking a missing sample in the BRO values table
pub const BRO_NO_DATA: f64 = -999999.0;

/// Availability flag value marking a populated parameter ("yes")
pub const BRO_PARAMETER_AVAILABLE: &str = "ja";

/// Row separator in the BRO values block
pub const BRO_ROW_SEPARATOR: char = ';';

/// Cell separator in the BRO values block
pub const BRO_CELL_SEPARATOR: char = ',';

/// Fixed column schema of the BRO values table, in file order
pub const BRO_VALUE_COLUMNS: &[&str] = &[
    "penetrationLength",
    "depth",
    "elapsedTime",
    "coneResistance",
    "correctedConeResistance",
    "netConeResistance",
    "magneticFieldStrengthX",
    "magneticFieldStrengthY",
    "magneticFieldStrengthZ",
    "magneticFieldStrengthTotal",
    "electricalConductivity",
    "inclinationEW",
    "inclinationNS",
    "inclinationX",
    "inclinationY",
    "inclinationResultant",
    "magneticInclination",
    "magneticDeclination",
    "localFriction",
    "poreRatio",
    "temperature",
    "porePressureU1",
    "porePressureU2",
    "porePressureU3",
    "frictionRatio",
];

/// BRO column names for the channels the pipeline consumes
pub mod bro_columns {
    pub const PENETRATION_LENGTH: &str = "penetrationLength";
    pub const DEPTH: &str = "depth";
    pub const CONE_RESISTANCE: &str = "coneResistance";
    pub const LOCAL_FRICTION: &str = "localFriction";
    pub const FRICTION_RATIO: &str = "frictionRatio";
    pub const INCLINATION_RESULTANT: &str = "inclinationResultant";
    pub const PORE_PRESSURE_U1: &str = "porePressureU1";
    pub const PORE_PRESSURE_U2: &str = "porePressureU2";
    pub const PORE_PRESSURE_U3: &str = "porePressureU3";

    /// Data columns a usable sounding must provide
    pub const REQUIRED: &[&str] = &[
        PENETRATION_LENGTH,
        CONE_RESISTANCE,
        LOCAL_FRICTION,
        FRICTION_RATIO,
    ];
}

// =============================================================================
// Coordinate Reference Systems
// =============================================================================

/// Canonical coordinate reference system (Amersfoort / RD New)
pub const TARGET_EPSG: &str = "28992";

// =============================================================================
// Processing Defaults
// =============================================================================

/// Cone coefficient used when the file does not declare one
pub const DEFAULT_CONE_COEFFICIENT: f64 = 0.80;

/// Minimum penetration length (m) for a usable registry sounding
pub const DEFAULT_MINIMUM_LENGTH: f64 = 5.0;

/// Minimum number of samples for a usable registry sounding
pub const DEFAULT_MINIMUM_SAMPLES: usize = 50;

/// Maximum fraction of non-positive tip or friction samples
pub const DEFAULT_MAXIMUM_CORRUPTED_RATIO: f64 = 0.1;

/// Number of leading samples averaged when synthesizing near-surface samples
pub const DEFAULT_PRE_DRILL_AVERAGE_SAMPLES: usize = 3;

/// Upper bound on synthetic pre-drill rows per real sample
pub const MAX_SYNTHETIC_ROWS_PER_SAMPLE: usize = 100;

/// Conversion factor from MPa to kPa
pub const MPA_TO_KPA: f64 = 1000.0;

/// Water measurement tag used when no pore pressure channel exists
pub const NO_WATER_MEASUREMENTS: &str = "no_measurements";

// =============================================================================
// Command Line
// =============================================================================

/// Log level when no verbosity flag is given
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log filter target for the crate
pub const LOG_TARGET: &str = "cpt_processor";
