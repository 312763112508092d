//! Honors labels to ordinal rank
//!
//! Honors answers are already ranked, so they bypass the generic bucket
//! tables: each label maps straight onto a rank from 0 (no honors) to 6
//! (highest tier). Note that "None" is a real answer here and ranks 0, where
//! the generic normalizer would treat it as unknown.

use std::collections::BTreeMap;

use crate::{code::OrdinalCode, token::RawValue};

/// Highest rank in the honors ladder
pub const MAX_HONORS_RANK: i32 = 6;

/// Lookup table from honors labels to ranks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HonorsTable {
    ranks: BTreeMap<String, OrdinalCode>,
}

impl HonorsTable {
    /// Creates a table from `(label, rank)` pairs
    ///
    /// Labels are matched case-insensitively after trimming. The numeric
    /// labels `"0"` through `"6"` are always accepted as their own rank.
    #[must_use]
    pub fn new(labels: &[(&str, i32)]) -> Self {
        let mut ranks = (0..=MAX_HONORS_RANK)
            .map(|rank| (rank.to_string(), OrdinalCode::new(rank)))
            .collect::<BTreeMap<_, _>>();
        for (label, rank) in labels {
            ranks.insert(label.trim().to_lowercase(), OrdinalCode::new(*rank));
        }
        Self { ranks }
    }

    /// The ladder used by the prospect survey
    #[must_use]
    pub fn standard() -> Self {
        Self::new(&[
            ("None", 0),
            ("No honors", 0),
            ("Team Award", 1),
            ("Team MVP", 1),
            ("Honorable Mention", 2),
            ("All-Conference Honorable Mention", 2),
            ("All-Conference", 3),
            ("All-District", 3),
            ("All-Region", 4),
            ("All-Area", 4),
            ("All-State", 5),
            ("All-American", 6),
        ])
    }

    /// Returns the rank for a raw honors answer
    ///
    /// Absent, blank, and unrecognized labels yield [`OrdinalCode::UNKNOWN`].
    ///
    /// # Examples
    ///
    /// ```
    /// use scoutprep_bins::{HonorsTable, OrdinalCode, RawValue};
    ///
    /// let table = HonorsTable::standard();
    /// assert_eq!(table.rank(&RawValue::from("All-State")), OrdinalCode::new(5));
    /// assert_eq!(table.rank(&RawValue::from("none")), OrdinalCode::new(0));
    /// assert_eq!(table.rank(&RawValue::Absent), OrdinalCode::UNKNOWN);
    /// ```
    #[must_use]
    pub fn rank(&self, raw: &RawValue) -> OrdinalCode {
        raw.as_text()
            .and_then(|text| self.ranks.get(&text.trim().to_lowercase()))
            .copied()
            .unwrap_or(OrdinalCode::UNKNOWN)
    }
}
