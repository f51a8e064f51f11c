//! Soft rejection of soundings that are readable but unusable

use serde::Serialize;
use std::fmt;

/// Why a sounding was rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    /// No samples left after removing incomplete rows
    Empty,
    /// A primary channel contains only zeros
    AllZero { channel: String },
    /// Maximum absolute penetration length below the threshold
    TooShort { length: f64, minimum: f64 },
    /// Fewer samples than the threshold
    TooFewSamples { samples: usize, minimum: usize },
    /// Too many non-positive tip or friction samples
    Corrupted { ratio: f64, maximum: f64 },
    /// The values table does not have the fixed registry width
    ColumnCountMismatch { found: usize, expected: usize },
    /// A channel needed to build the record is absent
    MissingChannel { channel: String },
    /// No reference level to compute depth relative to the datum
    MissingReferenceLevel,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::Empty => write!(f, "empty"),
            RejectionReason::AllZero { .. } => write!(f, "all zero"),
            RejectionReason::TooShort { .. } => write!(f, "too short"),
            RejectionReason::TooFewSamples { .. } => write!(f, "too few samples"),
            RejectionReason::Corrupted { .. } => write!(f, "corrupted"),
            RejectionReason::ColumnCountMismatch { .. } => write!(f, "column count mismatch"),
            RejectionReason::MissingChannel { .. } => write!(f, "missing channel"),
            RejectionReason::MissingReferenceLevel => write!(f, "missing reference level"),
        }
    }
}

/// A rejected sounding with a human readable message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub record_id: String,
    #[serde(flatten)]
    pub reason: RejectionReason,
    pub message: String,
}

impl Rejection {
    pub fn new(record_id: impl Into<String>, reason: RejectionReason) -> Self {
        let record_id = record_id.into();
        let message = match &reason {
            RejectionReason::Empty => format!("File {} contains no data", record_id),
            RejectionReason::AllZero { channel } => {
                format!("File {} contains empty data in {}", record_id, channel)
            }
            RejectionReason::TooShort { minimum, .. } => {
                format!("File {} has a length smaller than {}", record_id, minimum)
            }
            RejectionReason::TooFewSamples { minimum, .. } => format!(
                "File {} has a number of samples smaller than {}",
                record_id, minimum
            ),
            RejectionReason::Corrupted { .. } => format!("File {} is corrupted", record_id),
            RejectionReason::ColumnCountMismatch { found, expected } => format!(
                "Data has the wrong size! {} columns instead of {}",
                found, expected
            ),
            RejectionReason::MissingChannel { channel } => {
                format!("File {} has no {} data", record_id, channel)
            }
            RejectionReason::MissingReferenceLevel => {
                format!("File {} has no reference level", record_id)
            }
        };
        Self {
            record_id,
            reason,
            message,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of reading a sounding that did not fail outright
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Accepted(T),
    Rejected(Rejection),
}

impl<T> Outcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    pub fn accepted(self) -> Option<T> {
        match self {
            Outcome::Accepted(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(rejection) => Some(rejection),
        }
    }

    /// Transform the accepted value, passing rejections through
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Accepted(value) => Outcome::Accepted(f(value)),
            Outcome::Rejected(rejection) => Outcome::Rejected(rejection),
        }
    }
}
