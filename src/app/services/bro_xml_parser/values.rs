//! BRO values table parsing
//!
//! The `cptcommon:values` element holds the whole measurement table as text:
//! rows separated by `;`, cells by `,`, in a fixed 25 column order. Missing
//! samples are written as -999999.

use crate::constants::{
    BRO_CELL_SEPARATOR, BRO_NO_DATA, BRO_ROW_SEPARATOR, BRO_VALUE_COLUMNS, bro_columns,
};
use crate::{Error, Result};
use polars::prelude::{Column, DataFrame, Expr, IntoLazy, SortMultipleOptions, col};
use tracing::debug;

/// Outcome of reading the values text
#[derive(Debug, Clone)]
pub enum ValuesTable {
    /// Available columns, sorted by penetration length
    Table(DataFrame),
    /// A row does not have the fixed registry width
    WidthMismatch { found: usize, expected: usize },
}

/// Parse the values text into rows of optional samples
///
/// Returns `Ok(Err(width))` when a row has a width other than the fixed
/// schema.
pub fn parse_rows(text: &str) -> Result<std::result::Result<Vec<Vec<Option<f64>>>, usize>> {
    let expected = BRO_VALUE_COLUMNS.len();
    let mut rows = Vec::new();

    for (index, raw_row) in text
        .split(BRO_ROW_SEPARATOR)
        .map(str::trim)
        .filter(|row| !row.is_empty())
        .enumerate()
    {
        let cells: Vec<&str> = raw_row.split(BRO_CELL_SEPARATOR).map(str::trim).collect();
        if cells.len() != expected {
            return Ok(Err(cells.len()));
        }

        let row = cells
            .iter()
            .map(|cell| {
                let value = cell.parse::<f64>().map_err(|_| {
                    Error::xml_format(format!(
                        "Row {} of the values table holds '{}', expected a number",
                        index + 1,
                        cell
                    ))
                })?;
                Ok((value != BRO_NO_DATA).then_some(value))
            })
            .collect::<Result<Vec<Option<f64>>>>()?;
        rows.push(row);
    }

    Ok(Ok(rows))
}

/// Build the sorted table of available columns from the values text
pub fn read_values(text: &str, available: &[String]) -> Result<ValuesTable> {
    let rows = match parse_rows(text)? {
        Ok(rows) => rows,
        Err(found) => {
            return Ok(ValuesTable::WidthMismatch {
                found,
                expected: BRO_VALUE_COLUMNS.len(),
            });
        }
    };
    debug!("Read {} rows from values table", rows.len());

    let columns: Vec<Column> = BRO_VALUE_COLUMNS
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let values: Vec<Option<f64>> = rows.iter().map(|row| row[index]).collect();
            Column::new((*name).into(), values)
        })
        .collect();
    let frame = DataFrame::new(columns)?;

    let selected: Vec<Expr> = BRO_VALUE_COLUMNS
        .iter()
        .filter(|name| available.iter().any(|a| a == *name))
        .map(|name| col(*name))
        .collect();

    let sorted = frame
        .lazy()
        .sort_by_exprs(
            [col(bro_columns::PENETRATION_LENGTH)],
            SortMultipleOptions::default()
                .with_maintain_order(true)
                .with_nulls_last(true),
        )
        .select(selected)
        .collect()?;

    Ok(ValuesTable::Table(sorted))
}

/// Values of one column, if the table has it
pub fn column_values(frame: &DataFrame, name: &str) -> Result<Option<Vec<Option<f64>>>> {
    if !frame.get_column_names().iter().any(|c| c.as_str() == name) {
        return Ok(None);
    }
    let values = frame.column(name)?.f64()?.into_iter().collect();
    Ok(Some(values))
}
