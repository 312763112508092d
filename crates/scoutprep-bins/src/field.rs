//! Survey fields and their canonical code tables
//!
//! Each binned survey question is a [`SurveyField`]. A [`CodeBook`] owns one
//! [`FieldMapping`] per field plus the [`HonorsTable`], and is constructed
//! explicitly by the caller (usually via [`CodeBook::standard`]) rather than
//! living in shared global state.
//!
//! # Canonical Buckets
//!
//! | Field                 | Buckets                                         |
//! |-----------------------|-------------------------------------------------|
//! | position group        | QB 1, RB 2, WR 3, OL 4, DL 5, LB 6, DB 7, ST 8 |
//! | school classification | 1A..6A → 1..6                                   |
//! | competition level     | low 1, medium 2, high 3                         |
//! | snaps estimate        | <200 1, 200–500 2, 500–800 3, 800+ 4            |
//! | training / coaching   | <3 1, 3–5 2, 6–8 3, 9+ 4                        |
//! | weight-room days      | 0 0, 1–2 1, 3–4 2, 5+ 3                         |
//! | film hours            | 0 0, <1 1, 1–3 2, 4+ 3                          |
//! | job hours             | 0 0, 1–5 1, 6–10 2, 11–20 3, 20+ 4              |
//! | commute minutes       | <10 1, 10–20 2, 21–40 3, 40+ 4                  |
//!
//! Range labels are listed with both an en-dash and a hyphen, and each table
//! declares the unit words respondents append (`"1–2 days"`).
//!
//! # Examples
//!
//! ```
//! use scoutprep_bins::{CodeBook, OrdinalCode, RawValue, SurveyField};
//!
//! let book = CodeBook::standard();
//! let code = book.code(SurveyField::SnapsEstimate, &RawValue::from("800+"));
//! assert_eq!(code, OrdinalCode::new(4));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    code::{FieldMapping, OrdinalCode, map_to_code},
    honors::HonorsTable,
    token::RawValue,
};

/// A survey question answered with a bucket label
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SurveyField {
    #[display("position group")]
    PositionGroup,
    #[display("school classification")]
    SchoolClassification,
    #[display("competition level")]
    CompetitionLevel,
    #[display("snaps estimate")]
    SnapsEstimate,
    #[display("training hours")]
    TrainingHours,
    #[display("coaching hours")]
    CoachingHours,
    #[display("weight room access")]
    WeightRoomDays,
    #[display("film hours")]
    FilmHours,
    #[display("job hours")]
    JobHours,
    #[display("commute minutes")]
    CommuteMinutes,
}

impl SurveyField {
    pub const ALL: [SurveyField; 10] = [
        SurveyField::PositionGroup,
        SurveyField::SchoolClassification,
        SurveyField::CompetitionLevel,
        SurveyField::SnapsEstimate,
        SurveyField::TrainingHours,
        SurveyField::CoachingHours,
        SurveyField::WeightRoomDays,
        SurveyField::FilmHours,
        SurveyField::JobHours,
        SurveyField::CommuteMinutes,
    ];

    /// Canonical column holding the raw answer
    #[must_use]
    pub const fn source_column(self) -> &'static str {
        match self {
            SurveyField::PositionGroup => "position_group",
            SurveyField::SchoolClassification => "school_classification",
            SurveyField::CompetitionLevel => "competition_level",
            SurveyField::SnapsEstimate => "snaps_estimate",
            SurveyField::TrainingHours => "training_hours_per_week",
            SurveyField::CoachingHours => "coaching_hours_per_week",
            SurveyField::WeightRoomDays => "weight_room_access_days",
            SurveyField::FilmHours => "film_hours_per_week",
            SurveyField::JobHours => "job_hours_per_week",
            SurveyField::CommuteMinutes => "commute_minutes",
        }
    }

    /// Column holding the ordinal code derived from [`Self::source_column`]
    #[must_use]
    pub const fn code_column(self) -> &'static str {
        match self {
            SurveyField::PositionGroup => "position_group_num",
            SurveyField::SchoolClassification => "school_classification_num",
            SurveyField::CompetitionLevel => "competition_level_num",
            SurveyField::SnapsEstimate => "snaps_estimate_num",
            SurveyField::TrainingHours => "training_hours_num",
            SurveyField::CoachingHours => "coaching_hours_num",
            SurveyField::WeightRoomDays => "weight_room_access_num",
            SurveyField::FilmHours => "film_hours_num",
            SurveyField::JobHours => "job_hours_num",
            SurveyField::CommuteMinutes => "commute_minutes_num",
        }
    }
}

/// The complete set of code tables used during ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBook {
    fields: BTreeMap<SurveyField, FieldMapping>,
    honors: HonorsTable,
}

impl CodeBook {
    /// Creates a code book from explicit tables
    ///
    /// Fields without a table resolve every answer to [`OrdinalCode::UNKNOWN`].
    #[must_use]
    pub fn new(fields: BTreeMap<SurveyField, FieldMapping>, honors: HonorsTable) -> Self {
        Self { fields, honors }
    }

    /// The canonical tables for the prospect survey
    #[must_use]
    pub fn standard() -> Self {
        let fields = SurveyField::ALL
            .into_iter()
            .map(|field| (field, standard_mapping(field)))
            .collect();
        Self {
            fields,
            honors: HonorsTable::standard(),
        }
    }

    #[must_use]
    pub fn mapping(&self, field: SurveyField) -> Option<&FieldMapping> {
        self.fields.get(&field)
    }

    #[must_use]
    pub fn honors(&self) -> &HonorsTable {
        &self.honors
    }

    /// Maps a raw answer for `field` to its ordinal code
    #[must_use]
    pub fn code(&self, field: SurveyField, raw: &RawValue) -> OrdinalCode {
        self.fields
            .get(&field)
            .map_or(OrdinalCode::UNKNOWN, |mapping| map_to_code(raw, mapping))
    }
}

fn standard_mapping(field: SurveyField) -> FieldMapping {
    match field {
        SurveyField::PositionGroup => FieldMapping::from_buckets(&[
            (&["QB"], 1),
            (&["RB"], 2),
            (&["WR"], 3),
            (&["OL"], 4),
            (&["DL"], 5),
            (&["LB"], 6),
            (&["DB"], 7),
            (&["ST"], 8),
        ]),
        SurveyField::SchoolClassification => FieldMapping::from_buckets(&[
            (&["1A"], 1),
            (&["2A"], 2),
            (&["3A"], 3),
            (&["4A"], 4),
            (&["5A"], 5),
            (&["6A"], 6),
        ]),
        SurveyField::CompetitionLevel => {
            FieldMapping::from_buckets(&[(&["low"], 1), (&["medium"], 2), (&["high"], 3)])
        }
        SurveyField::SnapsEstimate => FieldMapping::from_buckets(&[
            (&["<200"], 1),
            (&["200–500", "200-500"], 2),
            (&["500–800", "500-800"], 3),
            (&["800+"], 4),
        ])
        .with_unit_suffixes(&["snaps"]),
        SurveyField::TrainingHours | SurveyField::CoachingHours => FieldMapping::from_buckets(&[
            (&["<3"], 1),
            (&["3–5", "3-5"], 2),
            (&["6–8", "6-8"], 3),
            (&["9+"], 4),
        ])
        .with_unit_suffixes(&["hrs", "hours"]),
        SurveyField::WeightRoomDays => FieldMapping::from_buckets(&[
            (&["0"], 0),
            (&["1–2", "1-2"], 1),
            (&["3–4", "3-4"], 2),
            (&["5+"], 3),
        ])
        .with_unit_suffixes(&["days", "days/week"]),
        SurveyField::FilmHours => FieldMapping::from_buckets(&[
            (&["0"], 0),
            (&["<1"], 1),
            (&["1–3", "1-3"], 2),
            (&["4+"], 3),
        ])
        .with_unit_suffixes(&["hrs", "hours"]),
        SurveyField::JobHours => FieldMapping::from_buckets(&[
            (&["0"], 0),
            (&["1–5", "1-5"], 1),
            (&["6–10", "6-10"], 2),
            (&["11–20", "11-20"], 3),
            (&["20+"], 4),
        ])
        .with_unit_suffixes(&["hrs", "hours"]),
        SurveyField::CommuteMinutes => FieldMapping::from_buckets(&[
            (&["<10"], 1),
            (&["10–20", "10-20"], 2),
            (&["21–40", "21-40"], 3),
            (&["40+"], 4),
        ])
        .with_unit_suffixes(&["min", "minutes"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(field: SurveyField, input: &str) -> i32 {
        CodeBook::standard().code(field, &RawValue::from(input)).get()
    }

    #[test]
    fn test_every_field_has_a_table() {
        let book = CodeBook::standard();
        for field in SurveyField::ALL {
            let mapping = book.mapping(field).unwrap();
            assert!(mapping.code_space().contains(&OrdinalCode::UNKNOWN));
        }
    }

    #[test]
    fn test_code_spaces_are_closed() {
        let book = CodeBook::standard();
        let expected: [(SurveyField, &[i32]); 4] = [
            (SurveyField::PositionGroup, &[-1, 1, 2, 3, 4, 5, 6, 7, 8]),
            (SurveyField::CompetitionLevel, &[-1, 1, 2, 3]),
            (SurveyField::WeightRoomDays, &[-1, 0, 1, 2, 3]),
            (SurveyField::JobHours, &[-1, 0, 1, 2, 3, 4]),
        ];
        for (field, codes) in expected {
            let space = book
                .mapping(field)
                .unwrap()
                .code_space()
                .into_iter()
                .map(OrdinalCode::get)
                .collect::<Vec<_>>();
            assert_eq!(space, codes, "{field}");
        }
    }

    #[test]
    fn test_snaps_examples() {
        assert_eq!(code(SurveyField::SnapsEstimate, "Don't know"), -1);
        assert_eq!(code(SurveyField::SnapsEstimate, "800+"), 4);
        assert_eq!(code(SurveyField::SnapsEstimate, "200-500"), 2);
        assert_eq!(code(SurveyField::SnapsEstimate, "200–500 snaps"), 2);
    }

    #[test]
    fn test_competition_level_trims() {
        assert_eq!(code(SurveyField::CompetitionLevel, "  high "), 3);
        assert_eq!(code(SurveyField::CompetitionLevel, "Medium"), 2);
        assert_eq!(code(SurveyField::CompetitionLevel, "elite"), -1);
    }

    #[test]
    fn test_weight_room_dash_and_units_agree() {
        let plain = code(SurveyField::WeightRoomDays, "1-2");
        assert_eq!(plain, 1);
        assert_eq!(code(SurveyField::WeightRoomDays, "1–2 days"), plain);
        assert_eq!(code(SurveyField::WeightRoomDays, "1–2"), plain);
        assert_eq!(code(SurveyField::WeightRoomDays, "1-2 days/week"), plain);
    }

    #[test]
    fn test_coaching_shares_training_buckets() {
        for input in ["<3", "3–5", "6-8 hrs", "9+ hours", "lots"] {
            assert_eq!(
                code(SurveyField::TrainingHours, input),
                code(SurveyField::CoachingHours, input),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_zero_is_a_real_bucket() {
        assert_eq!(code(SurveyField::JobHours, "0"), 0);
        assert_eq!(code(SurveyField::JobHours, ""), -1);
        assert_eq!(code(SurveyField::FilmHours, "0 hours"), 0);
    }

    #[test]
    fn test_missing_table_is_unknown() {
        let book = CodeBook::new(BTreeMap::new(), HonorsTable::standard());
        assert_eq!(
            book.code(SurveyField::PositionGroup, &RawValue::from("QB")),
            OrdinalCode::UNKNOWN
        );
    }

    #[test]
    fn test_column_names_are_distinct() {
        let mut names = SurveyField::ALL
            .iter()
            .flat_map(|field| [field.source_column(), field.code_column()])
            .collect::<Vec<_>>();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
