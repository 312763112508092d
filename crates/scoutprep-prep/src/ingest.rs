//! Survey ingestion
//!
//! Converts a raw survey export into the normalized record table the
//! assembler consumes:
//!
//! 1. Rename question columns to canonical field names ([`QUESTION_COLUMNS`]),
//!    failing if a question and its canonical field are both present
//! 2. Fail if any required field is absent
//! 3. Apply the consent gate and drop non-consenting rows
//! 4. Assign a fresh random `player_id` to each remaining row
//! 5. Write a `<field>_num` ordinal code column for every binned field
//! 6. Rank honors labels into `honors_level_num`
//! 7. Parse `missed_offseason_binary` and derive `missed_offseason_num`
//! 8. Coerce count fields to integers
//! 9. Type target label columns when present
//!
//! Row ids of surviving rows are their positions in the raw export.

use scoutprep_bins::{
    CodeBook, OrdinalCode, SurveyField,
    flag::{consent_to_bool, parse_bool},
};
use uuid::Uuid;

use crate::{
    MissingColumnsError,
    config::{
        CONSENT_OK_COLUMN, HONORS_CODE_COLUMN, MISSED_OFFSEASON_CODE_COLUMN, PLAYER_ID_COLUMN,
    },
    table::{Cell, Column, DuplicateColumnError, ShapeError, Table},
};

/// Survey question text → canonical field name
pub const QUESTION_COLUMNS: [(&str, &str); 17] = [
    ("Primary Position", "position_group"),
    ("How many games did you play this season?", "games_played"),
    ("Total snaps played this season", "snaps_estimate"),
    (
        "Enter your main stat (e.g., rushing yards, tackles, pressures). Include the stat name.",
        "primary_production_stat",
    ),
    ("Highest honors received this season (if any)", "honors_level"),
    ("Approximate school enrollment", "school_classification"),
    (
        "Level of competition faced - Based on league strength and level of opponents.",
        "competition_level",
    ),
    (
        "Team Record or Win percentage-Example: 8–3 or 72%",
        "team_record_or_win_pct",
    ),
    (
        "Training hours per week (outside of games)",
        "training_hours_per_week",
    ),
    (
        "Coaching or position-specific instructions hours per week",
        "coaching_hours_per_week",
    ),
    ("Weight room access per week", "weight_room_access_days"),
    ("Film study hours per week", "film_hours_per_week"),
    (
        "Number of weeks you participated in structured offseason training",
        "offseason_participation_weeks",
    ),
    ("Job hours per week during the season", "job_hours_per_week"),
    (
        "Approximate daily commute time to practices or training",
        "commute_minutes",
    ),
    (
        "Did you miss 4 or more consecutive offseason weeks for non-injury reasons",
        "missed_offseason_binary",
    ),
    ("Consent to Participate", "consent_acknowledged"),
];

/// Canonical fields every export must provide
pub const REQUIRED_COLUMNS: [&str; 17] = [
    "position_group",
    "games_played",
    "snaps_estimate",
    "primary_production_stat",
    "honors_level",
    "school_classification",
    "competition_level",
    "team_record_or_win_pct",
    "training_hours_per_week",
    "coaching_hours_per_week",
    "weight_room_access_days",
    "film_hours_per_week",
    "offseason_participation_weeks",
    "job_hours_per_week",
    "commute_minutes",
    "missed_offseason_binary",
    "consent_acknowledged",
];

const CONSENT_TEXT_COLUMN: &str = "consent_acknowledged";
const HONORS_COLUMN: &str = "honors_level";
const MISSED_OFFSEASON_COLUMN: &str = "missed_offseason_binary";
const COUNT_COLUMNS: [&str; 2] = ["games_played", "offseason_participation_weeks"];
const BINARY_TARGET_COLUMNS: [&str; 1] = ["college_roster_binary"];
const ORDINAL_TARGET_COLUMNS: [&str; 2] = ["college_level", "year1_snaps_bucket"];

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum IngestError {
    MissingColumns(MissingColumnsError),
    DuplicateColumn(DuplicateColumnError),
    Shape(ShapeError),
}

/// Counts reported by [`ingest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestSummary {
    pub input_rows: usize,
    pub consented_rows: usize,
}

impl IngestSummary {
    #[must_use]
    pub fn declined_rows(&self) -> usize {
        self.input_rows - self.consented_rows
    }
}

/// Normalizes a raw survey export, generating random UUID v4 row identifiers
pub fn ingest(raw: Table, book: &CodeBook) -> Result<(Table, IngestSummary), IngestError> {
    ingest_with_ids(raw, book, || Uuid::new_v4().to_string())
}

/// Like [`ingest`], drawing identifiers from `next_id`
///
/// Identifiers must not be derived from respondent data.
pub fn ingest_with_ids<F>(
    mut raw: Table,
    book: &CodeBook,
    mut next_id: F,
) -> Result<(Table, IngestSummary), IngestError>
where
    F: FnMut() -> String,
{
    raw.rename_columns(&QUESTION_COLUMNS)?;

    let missing = raw.missing_columns(REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(MissingColumnsError::new(missing).into());
    }

    let consent = raw
        .derive_column(CONSENT_TEXT_COLUMN, CONSENT_OK_COLUMN, |cell| {
            Cell::Bool(consent_to_bool(&cell.to_raw()))
        })
        .unwrap_or_else(|| {
            Column::new(CONSENT_OK_COLUMN, vec![Cell::Bool(false); raw.num_rows()])
        });
    let mask = consent
        .cells
        .iter()
        .map(|cell| *cell == Cell::Bool(true))
        .collect::<Vec<_>>();
    raw.insert_column(consent)?;
    let mut table = raw.filter(&mask);
    let summary = IngestSummary {
        input_rows: raw.num_rows(),
        consented_rows: table.num_rows(),
    };
    tracing::debug!(
        input_rows = summary.input_rows,
        consented_rows = summary.consented_rows,
        "applied consent gate"
    );

    let ids = (0..table.num_rows())
        .map(|_| Cell::Text(next_id()))
        .collect();
    table.insert_column(Column::new(PLAYER_ID_COLUMN, ids))?;

    for field in SurveyField::ALL {
        let codes = table.derive_column(field.source_column(), field.code_column(), |cell| {
            code_cell(book.code(field, &cell.to_raw()))
        });
        if let Some(codes) = codes {
            table.insert_column(codes)?;
        }
    }

    if let Some(honors) = table.derive_column(HONORS_COLUMN, HONORS_CODE_COLUMN, |cell| {
        code_cell(book.honors().rank(&cell.to_raw()))
    }) {
        table.insert_column(honors)?;
    }

    table.map_column(MISSED_OFFSEASON_COLUMN, |cell| {
        Cell::from(parse_bool(&cell.to_raw()))
    });
    if let Some(missed) = table.derive_column(
        MISSED_OFFSEASON_COLUMN,
        MISSED_OFFSEASON_CODE_COLUMN,
        |cell| match cell {
            Cell::Bool(missed) => Cell::Int(i64::from(*missed)),
            _ => code_cell(OrdinalCode::UNKNOWN),
        },
    ) {
        table.insert_column(missed)?;
    }

    for name in COUNT_COLUMNS {
        table.map_column(name, |cell| Cell::from(cell.to_integer()));
    }
    for name in BINARY_TARGET_COLUMNS {
        table.map_column(name, |cell| Cell::from(parse_bool(&cell.to_raw())));
    }
    for name in ORDINAL_TARGET_COLUMNS {
        table.map_column(name, type_label);
    }

    tracing::info!(
        rows = table.num_rows(),
        declined = summary.declined_rows(),
        "ingested survey responses"
    );
    Ok((table, summary))
}

fn code_cell(code: OrdinalCode) -> Cell {
    Cell::Int(i64::from(code.get()))
}

/// Integral labels become integers; other text is kept as text
fn type_label(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(text) if text.trim().is_empty() => Cell::Missing,
        Cell::Text(text) => cell
            .to_integer()
            .map_or_else(|| Cell::Text(text.clone()), Cell::Int),
        other => other.clone(),
    }
}
