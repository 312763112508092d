//! In-memory record table
//!
//! A [`Table`] is column-major: a row index of [`RowId`]s plus named
//! [`Column`]s of equal length. Row ids are the positions rows had in the
//! input, and survive filtering, so any table, matrix or vector derived from
//! the same input can be aligned by identity rather than by position.
//!
//! # Examples
//!
//! ```
//! use scoutprep_prep::table::{Cell, Column, RowId, Table};
//!
//! let mut table = Table::with_rows(3);
//! table
//!     .insert_column(Column::new("games_played", vec![Cell::Int(10), Cell::Missing, Cell::Int(8)]))
//!     .unwrap();
//!
//! let kept = table.filter(&[true, false, true]);
//! assert_eq!(kept.index(), &[RowId(0), RowId(2)]);
//! ```

use std::collections::{HashMap, HashSet};

use scoutprep_bins::RawValue;
use serde::{Deserialize, Serialize};

/// Identity of a row: its position in the table it was first loaded into
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct RowId(pub usize);

/// A single table value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Returns `true` for [`Cell::Missing`] and NaN floats
    #[must_use]
    pub fn is_missing_value(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Float(value) => value.is_nan(),
            Cell::Bool(_) | Cell::Int(_) | Cell::Text(_) => false,
        }
    }

    /// Numeric coercion
    ///
    /// Booleans become `1.0`/`0.0`, text is parsed after trimming. Text that does
    /// not parse, NaN, and missing cells all become `None`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn to_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Missing => return None,
            Cell::Bool(value) => f64::from(u8::from(*value)),
            Cell::Int(value) => *value as f64,
            Cell::Float(value) => *value,
            Cell::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        (!value.is_nan()).then_some(value)
    }

    /// Integer coercion: like [`Self::to_number`], but non-integral values become `None`
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn to_integer(&self) -> Option<i64> {
        if let Cell::Int(value) = self {
            return Some(*value);
        }
        let value = self.to_number()?;
        let in_range = value.is_finite() && value.abs() < 2f64.powi(53);
        (in_range && value.fract() == 0.0).then_some(value as i64)
    }

    /// The cell as a survey answer, rendering non-text values as text
    #[must_use]
    pub fn to_raw(&self) -> RawValue {
        match self {
            Cell::Missing => RawValue::Absent,
            Cell::Float(value) if value.is_nan() => RawValue::Absent,
            Cell::Bool(value) => RawValue::Text(value.to_string()),
            Cell::Int(value) => RawValue::Text(value.to_string()),
            Cell::Float(value) => RawValue::Text(value.to_string()),
            Cell::Text(text) => RawValue::Text(text.clone()),
        }
    }

    /// Types a value read from a delimited file
    ///
    /// Empty text is missing; `true`/`false` are booleans; integers and floats
    /// are parsed; anything else stays text.
    #[must_use]
    pub fn infer(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Cell::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Cell::Bool(false);
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return Cell::Int(value);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_nan() => Cell::Missing,
            Ok(value) => Cell::Float(value),
            Err(_) => Cell::Text(text.to_owned()),
        }
    }

    /// Raw text cell: empty text is missing, everything else is kept verbatim
    #[must_use]
    pub fn text(text: &str) -> Self {
        if text.is_empty() {
            Cell::Missing
        } else {
            Cell::Text(text.to_owned())
        }
    }
}

impl From<Option<bool>> for Cell {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Cell::Missing, Cell::Bool)
    }
}

impl From<Option<i64>> for Cell {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Cell::Missing, Cell::Int)
    }
}

/// A named column of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("column '{name}' has {actual} rows, but the table has {expected}")]
pub struct ShapeError {
    pub name: String,
    pub expected: usize,
    pub actual: usize,
}

/// Two columns ended up with the same name
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("duplicate column '{name}'")]
pub struct DuplicateColumnError {
    pub name: String,
}

/// A row id appears more than once in a table index
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("duplicate row id {id}")]
pub struct DuplicateRowError {
    pub id: RowId,
}

/// A table assembled from parts breaks a table invariant
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum InvalidTableError {
    Shape(ShapeError),
    DuplicateRow(DuplicateRowError),
    DuplicateColumn(DuplicateColumnError),
}

/// Column-major table with a row identity index
///
/// Every column has one cell per row id, row ids are unique and column
/// names are unique. Deserialized tables are checked against the same rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableParts")]
pub struct Table {
    index: Vec<RowId>,
    columns: Vec<Column>,
}

#[derive(Deserialize)]
struct TableParts {
    index: Vec<RowId>,
    columns: Vec<Column>,
}

impl TryFrom<TableParts> for Table {
    type Error = InvalidTableError;

    fn try_from(parts: TableParts) -> Result<Self, Self::Error> {
        Table::from_parts(parts.index, parts.columns)
    }
}

impl Table {
    /// Creates a table from an explicit row index and columns
    pub fn from_parts(
        index: Vec<RowId>,
        columns: Vec<Column>,
    ) -> Result<Self, InvalidTableError> {
        let mut seen = HashSet::with_capacity(index.len());
        if let Some(&id) = index.iter().find(|&&id| !seen.insert(id)) {
            return Err(DuplicateRowError { id }.into());
        }
        ensure_unique_names(columns.iter().map(|column| column.name.as_str()))?;
        let mut table = Self {
            index,
            columns: Vec::with_capacity(columns.len()),
        };
        for column in columns {
            table.insert_column(column)?;
        }
        Ok(table)
    }

    /// Creates a table of `len` rows with ids `0..len` and no columns
    #[must_use]
    pub fn with_rows(len: usize) -> Self {
        Self {
            index: (0..len).map(RowId).collect(),
            columns: vec![],
        }
    }

    /// Creates a table from columns, assigning row ids `0..len`
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, InvalidTableError> {
        let len = columns.first().map_or(0, |column| column.cells.len());
        Self::from_parts((0..len).map(RowId).collect(), columns)
    }

    /// Creates a table from a header and row-major records
    ///
    /// Short records are padded with [`Cell::Missing`]; surplus cells are dropped.
    #[must_use]
    pub fn from_records<H, R>(header: &[H], records: R) -> Self
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Vec<Cell>>,
    {
        let mut columns = header
            .iter()
            .map(|name| Column::new(name.as_ref(), vec![]))
            .collect::<Vec<_>>();
        let mut len = 0;
        for record in records {
            let mut record = record.into_iter();
            for column in &mut columns {
                column.cells.push(record.next().unwrap_or_default());
            }
            len += 1;
        }
        Self {
            index: (0..len).map(RowId).collect(),
            columns,
        }
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> &[RowId] {
        &self.index
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Names from `required` that this table lacks, in the order given, without duplicates
    #[must_use]
    pub fn missing_columns<'a, I>(&self, required: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut missing: Vec<String> = vec![];
        for name in required {
            if !self.has_column(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_owned());
            }
        }
        missing
    }

    /// Adds a column, replacing any existing column of the same name in place
    pub fn insert_column(&mut self, column: Column) -> Result<(), ShapeError> {
        if column.cells.len() != self.num_rows() {
            return Err(ShapeError {
                name: column.name,
                expected: self.num_rows(),
                actual: column.cells.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Replaces the cells of `name` with `f` applied to each cell; no-op if absent
    pub fn map_column<F>(&mut self, name: &str, f: F)
    where
        F: FnMut(&Cell) -> Cell,
    {
        if let Some(column) = self.columns.iter_mut().find(|c| c.name == name) {
            column.cells = column.cells.iter().map(f).collect();
        }
    }

    /// Derives a new column `target` from `source`; `None` if `source` is absent
    #[must_use]
    pub fn derive_column<F>(&self, source: &str, target: &str, f: F) -> Option<Column>
    where
        F: FnMut(&Cell) -> Cell,
    {
        let source = self.column(source)?;
        Some(Column::new(target, source.cells.iter().map(f).collect()))
    }

    /// Renames columns per `(from, to)` pairs; unknown `from` names are ignored
    ///
    /// Fails without touching the table if two columns would share a name,
    /// e.g. when an export carries both a question and its canonical field.
    pub fn rename_columns(
        &mut self,
        renames: &[(&str, &str)],
    ) -> Result<(), DuplicateColumnError> {
        let renames = renames.iter().copied().collect::<HashMap<_, _>>();
        let renamed = |name: &str| renames.get(name).copied();
        ensure_unique_names(
            self.columns
                .iter()
                .map(|column| renamed(&column.name).unwrap_or(column.name.as_str())),
        )?;
        for column in &mut self.columns {
            if let Some(to) = renamed(&column.name) {
                to.clone_into(&mut column.name);
            }
        }
        Ok(())
    }

    /// Keeps the rows where `mask` is `true`, preserving order and row ids
    ///
    /// # Panics
    ///
    /// Panics if `mask` is not as long as the table.
    #[must_use]
    pub fn filter(&self, mask: &[bool]) -> Self {
        assert_eq!(mask.len(), self.num_rows(), "mask length mismatch");
        let positions = mask
            .iter()
            .enumerate()
            .filter_map(|(pos, keep)| keep.then_some(pos))
            .collect::<Vec<_>>();
        self.take_positions(&positions)
    }

    /// Selects rows by id, in the order given; ids not in the table are skipped
    ///
    /// A repeated id selects its row once, at its first occurrence.
    #[must_use]
    pub fn take(&self, ids: &[RowId]) -> Self {
        let mut seen = HashSet::with_capacity(ids.len());
        let ids = ids
            .iter()
            .copied()
            .filter(|&id| seen.insert(id))
            .collect::<Vec<_>>();
        let positions = self.positions_of(&ids);
        self.take_positions(&positions)
    }

    /// Positions of `ids` within this table, skipping unknown ids
    #[must_use]
    pub fn positions_of(&self, ids: &[RowId]) -> Vec<usize> {
        let lookup = self
            .index
            .iter()
            .enumerate()
            .map(|(pos, id)| (*id, pos))
            .collect::<HashMap<_, _>>();
        ids.iter().filter_map(|id| lookup.get(id).copied()).collect()
    }

    /// Keeps only the named columns that exist, in the order given
    #[must_use]
    pub fn select<'a, I>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let columns = names
            .into_iter()
            .filter_map(|name| self.column(name).cloned())
            .collect();
        Self {
            index: self.index.clone(),
            columns,
        }
    }

    /// Row-major view of one row
    pub fn row(&self, pos: usize) -> impl Iterator<Item = &Cell> {
        self.columns.iter().map(move |column| &column.cells[pos])
    }

    fn take_positions(&self, positions: &[usize]) -> Self {
        let index = positions.iter().map(|&pos| self.index[pos]).collect();
        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                cells: positions
                    .iter()
                    .map(|&pos| column.cells[pos].clone())
                    .collect(),
            })
            .collect();
        Self { index, columns }
    }
}

fn ensure_unique_names<'a, I>(names: I) -> Result<(), DuplicateColumnError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    match names.into_iter().find(|name| !seen.insert(*name)) {
        Some(name) => Err(DuplicateColumnError {
            name: name.to_owned(),
        }),
        None => Ok(()),
    }
}
