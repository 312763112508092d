//! Record tables, survey ingestion and feature matrix assembly
//!
//! This crate takes survey responses from raw export to model-ready inputs.
//!
//! # Workflow
//!
//! 1. **Load** a raw export into a [`table::Table`] (file formats are handled by the caller)
//! 2. **Ingest** ([`ingest::ingest`]): rename question columns, gate on consent,
//!    assign opaque ids and write ordinal code columns via [`scoutprep_bins`]
//! 3. **Prepare** ([`assemble::prepare`]): validate columns, coerce numbers and
//!    emit row-aligned baseline/full [`matrix::FeatureMatrix`] values plus a
//!    [`matrix::TargetVector`]
//! 4. Optionally keep identifiers and free-text context for reporting with
//!    [`assemble::prepare_with_metadata`]
//!
//! Every output carries the [`table::RowId`] of each row, and all outputs of
//! one call share the same ids in the same order.
//!
//! # Examples
//!
//! ```
//! use scoutprep_bins::CodeBook;
//! use scoutprep_prep::{
//!     assemble::prepare,
//!     config::PrepConfig,
//!     ingest::{QUESTION_COLUMNS, ingest},
//!     table::{Cell, Table},
//! };
//!
//! let mut header = QUESTION_COLUMNS.map(|(question, _)| question).to_vec();
//! header.push("college_roster_binary");
//! let row = |consent: &str, roster: &str| {
//!     [
//!         "QB", "10", "800+", "900 rushing yards", "All-State", "4A", "high", "8-3",
//!         "6-8", "<3", "1-2 days", "1-3", "12", "0", "21-40", "no", consent, roster,
//!     ]
//!     .map(Cell::text)
//!     .to_vec()
//! };
//! let raw = Table::from_records(&header, vec![row("I Agree", "yes"), row("decline", "no")]);
//!
//! let (records, _summary) = ingest(raw, &CodeBook::standard())?;
//! let prepared = prepare(&records, "college_roster_binary", &PrepConfig::standard())?;
//!
//! assert_eq!(prepared.num_rows(), 1);
//! assert_eq!(prepared.baseline.num_columns(), 7);
//! assert_eq!(prepared.full.num_columns(), 14);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assemble;
pub mod config;
pub mod ingest;
pub mod matrix;
pub mod table;

/// Required columns were absent from the input table
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("missing required columns: {}", columns.join(", "))]
pub struct MissingColumnsError {
    /// Every absent column, in the order they were required
    pub columns: Vec<String>,
}

impl MissingColumnsError {
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}
