//! Feature matrix assembly
//!
//! [`prepare`] turns a normalized record table into a baseline matrix, a full
//! (baseline + constraint) matrix and a target vector that always share the
//! same rows in the same order.
//!
//! # Pipeline
//!
//! 1. Resolve the target name through the [`TargetRegistry`](crate::config::TargetRegistry)
//! 2. Keep only rows whose consent column (if present) is exactly `true`
//! 3. Fail if any baseline, constraint or target column is absent
//! 4. Coerce feature columns to numbers (unparsable values become missing)
//! 5. Select baseline and full column sets in declared order
//! 6. Optionally drop rows with a missing target from all three outputs at once
//!
//! Validation failures abort the call; no partial output is ever returned.
//! Bad individual values never abort anything.
//!
//! # Example
//!
//! ```
//! use scoutprep_prep::{
//!     assemble::prepare,
//!     config::{PrepConfig, TargetRegistry},
//!     table::{Cell, Column, Table},
//! };
//!
//! let table = Table::from_columns(vec![
//!     Column::new("games_played", vec![Cell::Int(10), Cell::text("ten"), Cell::Int(7)]),
//!     Column::new("job_hours_num", vec![Cell::Int(0), Cell::Int(3), Cell::Int(-1)]),
//!     Column::new("consent_ok", vec![Cell::Bool(true), Cell::Bool(true), Cell::Bool(false)]),
//!     Column::new("signed", vec![Cell::Bool(true), Cell::Missing, Cell::Bool(false)]),
//! ])?;
//! let config = PrepConfig {
//!     baseline_features: vec!["games_played".into()],
//!     constraint_features: vec!["job_hours_num".into()],
//!     targets: TargetRegistry::new([("signed", "signed")]),
//!     ..PrepConfig::standard()
//! };
//!
//! let prepared = prepare(&table, "signed", &config)?;
//! assert_eq!(prepared.num_rows(), 1);
//! assert_eq!(prepared.full.columns(), ["games_played", "job_hours_num"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{borrow::Cow, iter};

use serde::{Deserialize, Serialize};

use crate::{
    MissingColumnsError,
    config::PrepConfig,
    matrix::{FeatureMatrix, TargetVector},
    table::{Cell, Table},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown target '{target}'; choose from: {}", available.join(", "))]
pub struct UnknownTargetError {
    pub target: String,
    pub available: Vec<String>,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PrepareError {
    UnknownTarget(UnknownTargetError),
    MissingColumns(MissingColumnsError),
}

/// Row-aligned model inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prepared {
    /// Baseline features only
    pub baseline: FeatureMatrix,
    /// Baseline followed by constraint features
    pub full: FeatureMatrix,
    pub target: TargetVector,
}

impl Prepared {
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.target.len()
    }
}

/// [`Prepared`] plus the identifier and free-text columns for the same rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedWithMetadata {
    pub prepared: Prepared,
    pub metadata: Table,
}

/// Builds baseline/full feature matrices and the target vector for `target_name`
pub fn prepare(
    records: &Table,
    target_name: &str,
    config: &PrepConfig,
) -> Result<Prepared, PrepareError> {
    let target_col = config
        .targets
        .column_for(target_name)
        .ok_or_else(|| UnknownTargetError {
            target: target_name.to_owned(),
            available: config.targets.names().map(str::to_owned).collect(),
        })?;

    let records = retain_consented(records, &config.consent_col);

    let missing = records.missing_columns(config.full_features().chain(iter::once(target_col)));
    if !missing.is_empty() {
        return Err(MissingColumnsError::new(missing).into());
    }

    let coerced = config
        .full_features()
        .map(|name| (name, coerce_numeric(&records, name)))
        .collect::<Vec<_>>();
    let target_cells = column_cells(&records, target_col);

    let positions = (0..records.num_rows())
        .filter(|&pos| !config.dropna_y || !target_cells[pos].is_missing_value())
        .collect::<Vec<_>>();
    let dropped = records.num_rows() - positions.len();
    if dropped > 0 {
        tracing::debug!(target_name, dropped, "dropped rows with missing target");
    }

    let columns = coerced
        .iter()
        .map(|(name, values)| (*name, values.as_slice()))
        .collect::<Vec<_>>();
    let num_baseline = config.baseline_features.len();
    let index = records.index();
    let prepared = Prepared {
        baseline: FeatureMatrix::from_columns(index, &columns[..num_baseline], &positions),
        full: FeatureMatrix::from_columns(index, &columns, &positions),
        target: TargetVector::from_cells(target_name, index, target_cells, &positions),
    };
    tracing::info!(
        target_name,
        rows = prepared.num_rows(),
        baseline_features = prepared.baseline.num_columns(),
        full_features = prepared.full.num_columns(),
        "prepared feature matrices"
    );
    Ok(prepared)
}

/// Like [`prepare`], also slicing the identifier and text columns for the surviving rows
///
/// The metadata table is taken from `records` by the row ids of the prepared
/// matrices, so it can never disagree with them. Configured metadata columns
/// that are absent from `records` are skipped.
pub fn prepare_with_metadata(
    records: &Table,
    target_name: &str,
    config: &PrepConfig,
) -> Result<PreparedWithMetadata, PrepareError> {
    let prepared = prepare(records, target_name, config)?;
    let meta_columns = iter::once(config.id_col.as_str())
        .chain(config.text_fields.iter().map(String::as_str));
    let metadata = records
        .select(meta_columns)
        .take(prepared.baseline.index());
    Ok(PreparedWithMetadata { prepared, metadata })
}

fn retain_consented<'a>(records: &'a Table, consent_col: &str) -> Cow<'a, Table> {
    let Some(consent) = records.column(consent_col) else {
        return Cow::Borrowed(records);
    };
    let mask = consent
        .cells
        .iter()
        .map(|cell| *cell == Cell::Bool(true))
        .collect::<Vec<_>>();
    let kept = records.filter(&mask);
    tracing::debug!(
        before = records.num_rows(),
        after = kept.num_rows(),
        "applied consent filter"
    );
    Cow::Owned(kept)
}

fn coerce_numeric(records: &Table, name: &str) -> Vec<Option<f64>> {
    column_cells(records, name)
        .iter()
        .map(Cell::to_number)
        .collect()
}

fn column_cells<'a>(records: &'a Table, name: &str) -> &'a [Cell] {
    records
        .column(name)
        .map(|column| column.cells.as_slice())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::TargetRegistry,
        table::{Column, RowId},
    };

    fn config() -> PrepConfig {
        PrepConfig {
            baseline_features: vec!["position_group_num".into(), "games_played".into()],
            constraint_features: vec!["job_hours_num".into()],
            text_fields: vec!["primary_production_stat".into()],
            id_col: "player_id".into(),
            consent_col: "consent_ok".into(),
            targets: TargetRegistry::new([("roster", "college_roster_binary")]),
            dropna_y: true,
        }
    }

    fn records() -> Table {
        Table::from_columns(vec![
            Column::new(
                "player_id",
                ["a", "b", "c", "d", "e"].map(Cell::text).to_vec(),
            ),
            Column::new(
                "position_group_num",
                vec![Cell::Int(1), Cell::Int(7), Cell::Int(-1), Cell::Int(3), Cell::Int(4)],
            ),
            Column::new(
                "games_played",
                vec![
                    Cell::Int(10),
                    Cell::text("9"),
                    Cell::text("most"),
                    Cell::Missing,
                    Cell::Float(11.0),
                ],
            ),
            Column::new(
                "job_hours_num",
                vec![Cell::Int(0), Cell::Int(2), Cell::Int(4), Cell::Int(-1), Cell::Int(1)],
            ),
            Column::new(
                "consent_ok",
                vec![
                    Cell::Bool(true),
                    Cell::Bool(true),
                    Cell::Bool(false),
                    Cell::Bool(true),
                    Cell::text("true"),
                ],
            ),
            Column::new(
                "college_roster_binary",
                vec![
                    Cell::Bool(true),
                    Cell::Missing,
                    Cell::Bool(true),
                    Cell::Bool(false),
                    Cell::Bool(true),
                ],
            ),
            Column::new(
                "primary_production_stat",
                ["900 rushing yards", "", "40 tackles", "12 sacks", "3 INT"]
                    .map(Cell::text)
                    .to_vec(),
            ),
        ])
        .unwrap()
    }

    fn assert_aligned(prepared: &Prepared) {
        assert_eq!(prepared.baseline.num_rows(), prepared.full.num_rows());
        assert_eq!(prepared.baseline.num_rows(), prepared.target.len());
        assert_eq!(prepared.baseline.index(), prepared.full.index());
        assert_eq!(prepared.baseline.index(), prepared.target.index());
    }

    #[test]
    fn test_unknown_target() {
        let err = prepare(&records(), "nfl_draft", &config()).unwrap_err();
        let PrepareError::UnknownTarget(err) = err else {
            panic!("expected unknown target");
        };
        assert_eq!(err.target, "nfl_draft");
        assert_eq!(err.available, ["roster"]);
    }

    #[test]
    fn test_unknown_target_checked_before_columns() {
        let err = prepare(&Table::with_rows(2), "nope", &config()).unwrap_err();
        assert!(matches!(err, PrepareError::UnknownTarget(_)));
    }

    #[test]
    fn test_missing_columns_names_every_column() {
        let mut table = records();
        table.rename_columns(&[
            ("games_played", "games"),
            ("college_roster_binary", "roster"),
        ])
        .unwrap();
        let err = prepare(&table, "roster", &config()).unwrap_err();
        let PrepareError::MissingColumns(err) = err else {
            panic!("expected missing columns");
        };
        assert_eq!(err.columns, ["games_played", "college_roster_binary"]);
        assert!(err.to_string().contains("games_played"));
    }

    #[test]
    fn test_consent_and_missing_target_pruning() {
        let prepared = prepare(&records(), "roster", &config()).unwrap();
        assert_aligned(&prepared);
        // c: consent false, e: consent is text not bool, b: missing target
        assert_eq!(prepared.target.index(), &[RowId(0), RowId(3)]);
        assert_eq!(prepared.target.values(), [Cell::Bool(true), Cell::Bool(false)]);
    }

    #[test]
    fn test_keeps_missing_target_when_not_dropping() {
        let config = config().with_dropna_y(false);
        let prepared = prepare(&records(), "roster", &config).unwrap();
        assert_aligned(&prepared);
        assert_eq!(prepared.target.index(), &[RowId(0), RowId(1), RowId(3)]);
        assert_eq!(prepared.target.get(RowId(1)), Some(&Cell::Missing));
    }

    #[test]
    fn test_coercion_and_column_order() {
        let config = config().with_dropna_y(false);
        let prepared = prepare(&records(), "roster", &config).unwrap();
        assert_eq!(
            prepared.baseline.columns(),
            ["position_group_num", "games_played"]
        );
        assert_eq!(
            prepared.full.columns(),
            ["position_group_num", "games_played", "job_hours_num"]
        );
        assert_eq!(
            prepared.full.rows(),
            [
                vec![Some(1.0), Some(10.0), Some(0.0)],
                vec![Some(7.0), Some(9.0), Some(2.0)],
                vec![Some(3.0), None, Some(-1.0)],
            ]
        );
    }

    #[test]
    fn test_unparsable_feature_becomes_missing() {
        let mut table = records();
        table.map_column("consent_ok", |_| Cell::Bool(true));
        let prepared = prepare(&table, "roster", &config()).unwrap();
        assert_eq!(prepared.baseline.get(RowId(2), "games_played"), None);
        assert_eq!(prepared.baseline.get(RowId(4), "games_played"), Some(11.0));
    }

    #[test]
    fn test_without_consent_column_keeps_all_rows() {
        let table = records().select([
            "player_id",
            "position_group_num",
            "games_played",
            "job_hours_num",
            "college_roster_binary",
        ]);
        let prepared = prepare(&table, "roster", &config()).unwrap();
        assert_aligned(&prepared);
        assert_eq!(prepared.num_rows(), 4);
    }

    #[test]
    fn test_consent_checked_before_columns() {
        // Consent filtering happens first but never bypasses column validation
        let table = records().select(["consent_ok", "college_roster_binary"]);
        let err = prepare(&table, "roster", &config()).unwrap_err();
        assert!(matches!(err, PrepareError::MissingColumns(_)));
    }

    #[test]
    fn test_empty_after_consent() {
        let mut table = records();
        table.map_column("consent_ok", |_| Cell::Bool(false));
        let prepared = prepare(&table, "roster", &config()).unwrap();
        assert_aligned(&prepared);
        assert!(prepared.baseline.is_empty());
        assert_eq!(prepared.full.num_columns(), 3);
    }

    #[test]
    fn test_metadata_aligned_for_loaded_index() {
        // Tables read back from JSON carry the ids of an earlier run
        let loaded = Table::from_parts(
            vec![RowId(7), RowId(3), RowId(5)],
            vec![
                Column::new("player_id", ["a", "b", "c"].map(Cell::text).to_vec()),
                Column::new("position_group_num", vec![Cell::Int(1), Cell::Int(2), Cell::Int(3)]),
                Column::new("games_played", vec![Cell::Int(10), Cell::Int(9), Cell::Int(8)]),
                Column::new("job_hours_num", vec![Cell::Int(0), Cell::Int(1), Cell::Int(2)]),
                Column::new(
                    "college_roster_binary",
                    vec![Cell::Bool(true), Cell::Missing, Cell::Bool(false)],
                ),
            ],
        )
        .unwrap();
        let result = prepare_with_metadata(&loaded, "roster", &config()).unwrap();
        assert_eq!(result.prepared.target.index(), &[RowId(7), RowId(5)]);
        assert_eq!(result.metadata.index(), result.prepared.target.index());
        assert_eq!(
            result.metadata.column("player_id").unwrap().cells,
            [Cell::text("a"), Cell::text("c")]
        );
        assert_eq!(
            result.prepared.baseline.column("games_played"),
            Some(vec![Some(10.0), Some(8.0)])
        );
    }

    #[test]
    fn test_metadata_aligned() {
        let result = prepare_with_metadata(&records(), "roster", &config()).unwrap();
        let metadata = &result.metadata;
        assert_eq!(metadata.index(), result.prepared.target.index());
        assert_eq!(
            metadata.column_names().collect::<Vec<_>>(),
            ["player_id", "primary_production_stat"]
        );
        assert_eq!(
            metadata.column("player_id").unwrap().cells,
            [Cell::text("a"), Cell::text("d")]
        );
    }

    #[test]
    fn test_metadata_skips_absent_columns() {
        let config = PrepConfig {
            text_fields: vec!["team_record_or_win_pct".into()],
            ..config()
        };
        let result = prepare_with_metadata(&records(), "roster", &config).unwrap();
        assert_eq!(
            result.metadata.column_names().collect::<Vec<_>>(),
            ["player_id"]
        );
        assert_eq!(result.metadata.num_rows(), 2);
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        let table = records();
        let first = prepare(&table, "roster", &config()).unwrap();
        let second = prepare(&table, "roster", &config()).unwrap();
        assert_eq!(first, second);
        assert_eq!(table, records());
    }
}
