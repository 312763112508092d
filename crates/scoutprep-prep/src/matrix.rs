//! Assembler outputs: feature matrices and target vectors
//!
//! Both carry the [`RowId`] index of the rows they hold, so a matrix and a
//! target vector built from the same input can be checked for alignment by
//! identity rather than trusted by position.

use serde::{Deserialize, Serialize};

use crate::table::{Cell, RowId};

/// Numeric feature table: one row per record, columns in declared order
///
/// `None` marks a value that was missing or could not be coerced to a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    index: Vec<RowId>,
    columns: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl FeatureMatrix {
    /// Builds a matrix from coerced columns, keeping the rows at `positions`
    pub(crate) fn from_columns(
        index: &[RowId],
        columns: &[(&str, &[Option<f64>])],
        positions: &[usize],
    ) -> Self {
        let rows = positions
            .iter()
            .map(|&pos| columns.iter().map(|(_, values)| values[pos]).collect())
            .collect();
        Self {
            index: positions.iter().map(|&pos| index[pos]).collect(),
            columns: columns.iter().map(|(name, _)| (*name).to_owned()).collect(),
            rows,
        }
    }

    #[must_use]
    pub fn index(&self) -> &[RowId] {
        &self.index
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, top to bottom
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let col = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[col]).collect())
    }

    /// The value for a given row id and column
    #[must_use]
    pub fn get(&self, id: RowId, name: &str) -> Option<f64> {
        let row = self.index.iter().position(|&i| i == id)?;
        let col = self.columns.iter().position(|c| c == name)?;
        self.rows[row][col]
    }
}

/// Target labels aligned with a feature matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetVector {
    name: String,
    index: Vec<RowId>,
    values: Vec<Cell>,
}

impl TargetVector {
    pub(crate) fn from_cells(
        name: &str,
        index: &[RowId],
        cells: &[Cell],
        positions: &[usize],
    ) -> Self {
        Self {
            name: name.to_owned(),
            index: positions.iter().map(|&pos| index[pos]).collect(),
            values: positions.iter().map(|&pos| cells[pos].clone()).collect(),
        }
    }

    /// Target name as registered, not the backing column
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn index(&self) -> &[RowId] {
        &self.index
    }

    #[must_use]
    pub fn values(&self) -> &[Cell] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: RowId) -> Option<&Cell> {
        let pos = self.index.iter().position(|&i| i == id)?;
        Some(&self.values[pos])
    }

    /// Number of labels that are missing
    #[must_use]
    pub fn num_missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing_value()).count()
    }
}
