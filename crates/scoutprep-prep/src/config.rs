//! Assembler configuration
//!
//! [`PrepConfig`] names every column the assembler touches. It is always
//! passed explicitly; [`PrepConfig::standard`] gives the V1 feature sets:
//!
//! - **Baseline**: what conventional scouting sees (position, school,
//!   competition, snaps, games, offseason weeks, honors)
//! - **Constraint**: access to training resources and outside time burdens
//!   (training, coaching, weight room, film, job, commute, missed offseason)
//! - **Text fields**: free-text context kept for reporting, never modeled
//!
//! The configuration serializes to JSON so that alternative feature sets can
//! be loaded from a file:
//!
//! ```json
//! {
//!   "baseline_features": ["position_group_num", "games_played"],
//!   "constraint_features": ["job_hours_num"],
//!   "text_fields": ["primary_production_stat"],
//!   "id_col": "player_id",
//!   "consent_col": "consent_ok",
//!   "targets": { "college_roster_binary": "college_roster_binary" },
//!   "dropna_y": true
//! }
//! ```

use std::collections::BTreeMap;

use scoutprep_bins::SurveyField;
use serde::{Deserialize, Serialize};

pub const PLAYER_ID_COLUMN: &str = "player_id";
pub const CONSENT_OK_COLUMN: &str = "consent_ok";
pub const HONORS_CODE_COLUMN: &str = "honors_level_num";
pub const MISSED_OFFSEASON_CODE_COLUMN: &str = "missed_offseason_num";

/// Registry of valid target names and the column each one reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetRegistry(BTreeMap<String, String>);

impl TargetRegistry {
    pub fn new<I, N, C>(targets: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        Self(
            targets
                .into_iter()
                .map(|(name, column)| (name.into(), column.into()))
                .collect(),
        )
    }

    /// The V1 targets, each read from the column of the same name
    #[must_use]
    pub fn standard() -> Self {
        Self::new(
            ["college_roster_binary", "college_level", "year1_snaps_bucket"]
                .map(|name| (name, name)),
        )
    }

    /// Column backing `target`, if it is registered
    #[must_use]
    pub fn column_for(&self, target: &str) -> Option<&str> {
        self.0.get(target).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }
}

/// Column configuration for [`prepare`](crate::assemble::prepare)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepConfig {
    /// Scouting-visible features, in output column order
    pub baseline_features: Vec<String>,
    /// Opportunity/access features appended after the baseline in the full matrix
    pub constraint_features: Vec<String>,
    /// Free-text columns carried in the metadata table
    pub text_fields: Vec<String>,
    /// Opaque row identifier column
    pub id_col: String,
    /// Boolean consent column; rows are kept only when it is exactly `true`
    pub consent_col: String,
    pub targets: TargetRegistry,
    /// Drop rows whose target is missing
    pub dropna_y: bool,
}

impl PrepConfig {
    #[must_use]
    pub fn standard() -> Self {
        let baseline_features = [
            SurveyField::PositionGroup.code_column(),
            SurveyField::SchoolClassification.code_column(),
            SurveyField::CompetitionLevel.code_column(),
            SurveyField::SnapsEstimate.code_column(),
            "games_played",
            "offseason_participation_weeks",
            HONORS_CODE_COLUMN,
        ];
        let constraint_features = [
            SurveyField::TrainingHours.code_column(),
            SurveyField::CoachingHours.code_column(),
            SurveyField::WeightRoomDays.code_column(),
            SurveyField::FilmHours.code_column(),
            SurveyField::JobHours.code_column(),
            SurveyField::CommuteMinutes.code_column(),
            MISSED_OFFSEASON_CODE_COLUMN,
        ];
        let text_fields = ["primary_production_stat", "team_record_or_win_pct"];
        Self {
            baseline_features: baseline_features.map(String::from).to_vec(),
            constraint_features: constraint_features.map(String::from).to_vec(),
            text_fields: text_fields.map(String::from).to_vec(),
            id_col: PLAYER_ID_COLUMN.to_owned(),
            consent_col: CONSENT_OK_COLUMN.to_owned(),
            targets: TargetRegistry::standard(),
            dropna_y: true,
        }
    }

    /// Baseline followed by constraint feature names
    pub fn full_features(&self) -> impl Iterator<Item = &str> {
        self.baseline_features
            .iter()
            .chain(&self.constraint_features)
            .map(String::as_str)
    }

    #[must_use]
    pub fn with_dropna_y(mut self, dropna_y: bool) -> Self {
        self.dropna_y = dropna_y;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_feature_sets_are_disjoint() {
        let config = PrepConfig::standard();
        for name in &config.baseline_features {
            assert!(!config.constraint_features.contains(name), "{name}");
        }
        assert_eq!(config.full_features().count(), 14);
    }

    #[test]
    fn test_target_registry() {
        let registry = TargetRegistry::standard();
        assert_eq!(
            registry.column_for("college_level"),
            Some("college_level")
        );
        assert_eq!(registry.column_for("nfl_draft"), None);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            ["college_level", "college_roster_binary", "year1_snaps_bucket"]
        );
    }

    #[test]
    fn test_json_round_trip() {
        let config = PrepConfig::standard().with_dropna_y(false);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""targets":{"college_level":"college_level""#));
        let back: PrepConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
