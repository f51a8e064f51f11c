//! Scratch representation shared by both readers
//!
//! A [`Sounding`] is what a reader hands to the record processor: the scalar
//! metadata found in the file plus an index-aligned table of the channels the
//! file actually provided.

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Measurement channels carried through the processing pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    PenetrationLength,
    Depth,
    Tip,
    Friction,
    FrictionRatio,
    PorePressureU1,
    PorePressureU2,
    PorePressureU3,
    InclinationResultant,
}

impl Channel {
    /// Pore pressure channels in order of preference
    pub const PORE_PRESSURES: [Channel; 3] = [
        Channel::PorePressureU1,
        Channel::PorePressureU2,
        Channel::PorePressureU3,
    ];

    /// Channels that must not be entirely zero
    pub const PRIMARY: [Channel; 4] = [
        Channel::PenetrationLength,
        Channel::Tip,
        Channel::Friction,
        Channel::FrictionRatio,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Channel::PenetrationLength => "penetration_length",
            Channel::Depth => "depth",
            Channel::Tip => "tip",
            Channel::Friction => "friction",
            Channel::FrictionRatio => "friction_ratio",
            Channel::PorePressureU1 => "pore_pressure_u1",
            Channel::PorePressureU2 => "pore_pressure_u2",
            Channel::PorePressureU3 => "pore_pressure_u3",
            Channel::InclinationResultant => "inclination_resultant",
        }
    }

    pub fn is_pore_pressure(&self) -> bool {
        Self::PORE_PRESSURES.contains(self)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar metadata of one sounding
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SoundingMetadata {
    pub name: String,
    pub coordinates: [f64; 2],
    /// Height of the local reference point relative to the vertical datum
    pub reference_level: Option<f64>,
    /// `None` when the file format declared no pre-drilled depth at all
    pub pre_drill: Option<f64>,
    pub cone_coefficient: f64,
    pub vertical_datum: Option<String>,
    pub local_reference: Option<String>,
    pub cpt_standard: Option<String>,
    pub quality_class: Option<String>,
    pub cpt_type: Option<String>,
    pub result_time: Option<String>,
}

/// Index-aligned sample columns, keyed by channel
///
/// Every inserted column has the same length; row operations act on all
/// columns in lockstep.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleTable {
    columns: BTreeMap<Channel, Vec<Option<f64>>>,
}

impl SampleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns.values().next().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.columns.contains_key(&channel)
    }

    /// Channels present in the table, in channel order
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.columns.keys().copied()
    }

    /// Insert or replace a column
    pub fn insert(&mut self, channel: Channel, values: Vec<Option<f64>>) -> Result<()> {
        let expected = self
            .columns
            .iter()
            .find(|(existing, _)| **existing != channel)
            .map(|(_, column)| column.len());

        if let Some(expected) = expected {
            if values.len() != expected {
                return Err(Error::data_validation(format!(
                    "Channel {} has {} samples, expected {}",
                    channel,
                    values.len(),
                    expected
                )));
            }
        }

        self.columns.insert(channel, values);
        Ok(())
    }

    /// Insert a column of plain values
    pub fn insert_values(&mut self, channel: Channel, values: Vec<f64>) -> Result<()> {
        self.insert(channel, values.into_iter().map(Some).collect())
    }

    pub fn remove(&mut self, channel: Channel) -> Option<Vec<Option<f64>>> {
        self.columns.remove(&channel)
    }

    pub fn get(&self, channel: Channel) -> Option<&[Option<f64>]> {
        self.columns.get(&channel).map(Vec::as_slice)
    }

    /// Column values with missing samples as NaN
    pub fn values(&self, channel: Channel) -> Option<Vec<f64>> {
        self.get(channel)
            .map(|column| column.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }

    /// Keep the rows whose mask entry is true, in every column
    pub fn retain_rows(&mut self, keep: &[bool]) {
        for column in self.columns.values_mut() {
            let mut mask = keep.iter();
            column.retain(|_| mask.next().copied().unwrap_or(false));
        }
    }

    /// Drop rows with a missing value in any column; returns the number removed
    pub fn drop_incomplete_rows(&mut self) -> usize {
        let rows = self.len();
        let keep: Vec<bool> = (0..rows)
            .map(|row| self.columns.values().all(|column| column[row].is_some()))
            .collect();
        let removed = keep.iter().filter(|k| !**k).count();
        if removed > 0 {
            self.retain_rows(&keep);
        }
        removed
    }

    /// Prepend rows to every column
    ///
    /// `fill` is called once per channel and must return exactly `count` values.
    pub fn prepend_rows<F>(&mut self, count: usize, mut fill: F) -> Result<()>
    where
        F: FnMut(Channel, &[Option<f64>]) -> Vec<Option<f64>>,
    {
        for (channel, column) in self.columns.iter_mut() {
            let mut padded = fill(*channel, column);
            if padded.len() != count {
                return Err(Error::data_validation(format!(
                    "Padding for channel {} has {} samples, expected {}",
                    channel,
                    padded.len(),
                    count
                )));
            }
            padded.extend_from_slice(column);
            *column = padded;
        }
        Ok(())
    }
}

/// Metadata plus samples, as produced by a reader
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sounding {
    pub metadata: SoundingMetadata,
    pub samples: SampleTable,
}

impl Sounding {
    pub fn new(metadata: SoundingMetadata, samples: SampleTable) -> Self {
        Self { metadata, samples }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SampleTable {
        let mut table = SampleTable::new();
        table
            .insert(Channel::PenetrationLength, vec![Some(0.1), Some(0.2), Some(0.3)])
            .unwrap();
        table
            .insert(Channel::Tip, vec![Some(1.0), None, Some(3.0)])
            .unwrap();
        table
    }

    #[test]
    fn test_insert_rejects_length_mismatch() {
        let mut table = table();
        let result = table.insert(Channel::Friction, vec![Some(1.0)]);
        assert!(matches!(result, Err(Error::DataValidation { .. })));
    }

    #[test]
    fn test_insert_replaces_existing_column() {
        let mut table = table();
        table
            .insert_values(Channel::Tip, vec![4.0, 5.0, 6.0])
            .unwrap();
        assert_eq!(table.values(Channel::Tip).unwrap(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_drop_incomplete_rows_is_joint() {
        let mut table = table();
        assert_eq!(table.drop_incomplete_rows(), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.values(Channel::PenetrationLength).unwrap(),
            vec![0.1, 0.3]
        );
        assert_eq!(table.values(Channel::Tip).unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_prepend_rows() {
        let mut table = table();
        table
            .prepend_rows(1, |_, _| vec![Some(0.0)])
            .unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(Channel::Tip).unwrap()[0], Some(0.0));
    }

    #[test]
    fn test_prepend_rows_rejects_wrong_count() {
        let mut table = table();
        assert!(table.prepend_rows(2, |_, _| vec![Some(0.0)]).is_err());
    }
}
