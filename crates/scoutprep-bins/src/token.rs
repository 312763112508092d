//! Raw survey values and their normalized tokens
//!
//! Survey answers arrive as free text or not at all. [`RawValue`] models both
//! cases explicitly, and [`normalize`] folds every spelling of "no answer"
//! into the single canonical [`NormalizedToken::UNKNOWN`] token.
//!
//! # Examples
//!
//! ```
//! use scoutprep_bins::token::{normalize, RawValue};
//!
//! assert_eq!(normalize(&RawValue::from("  QB ")).as_str(), "QB");
//! assert!(normalize(&RawValue::from("N/A")).is_unknown());
//! assert!(normalize(&RawValue::Absent).is_unknown());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Spellings that mean "no usable answer", compared case-insensitively after trimming.
const BLANK_SYNONYMS: [&str; 6] = ["", "na", "n/a", "none", "null", "unknown"];

/// A single survey answer before normalization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RawValue {
    /// The respondent gave no answer (empty cell, missing column value)
    #[default]
    Absent,
    /// Free text exactly as entered
    Text(String),
}

impl RawValue {
    /// Returns the text if present
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Absent => None,
            RawValue::Text(text) => Some(text),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl<T> From<Option<T>> for RawValue
where
    T: Into<RawValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Absent, Into::into)
    }
}

/// A trimmed survey answer, or the canonical `"unknown"` token
///
/// Case is preserved; case-insensitive comparison is left to the lookup
/// tables in [`crate::code`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedToken(String);

impl NormalizedToken {
    /// Canonical token for blank, missing, or explicitly unknown answers
    pub const UNKNOWN: &'static str = "unknown";

    #[must_use]
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0 == Self::UNKNOWN
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a raw survey answer
///
/// Trims surrounding whitespace. Absent values and any of `""`, `"na"`,
/// `"n/a"`, `"none"`, `"null"`, `"unknown"` (in any case) become
/// [`NormalizedToken::UNKNOWN`]. Everything else is returned trimmed with its
/// case preserved.
///
/// This function is total and idempotent: normalizing an already normalized
/// token yields the same token.
///
/// # Examples
///
/// ```
/// use scoutprep_bins::token::{normalize, RawValue};
///
/// let once = normalize(&RawValue::from("  NULL  "));
/// assert_eq!(once.as_str(), "unknown");
///
/// let twice = normalize(&RawValue::from(once.as_str()));
/// assert_eq!(once, twice);
/// ```
#[must_use]
pub fn normalize(raw: &RawValue) -> NormalizedToken {
    let Some(text) = raw.as_text() else {
        return NormalizedToken::unknown();
    };
    let trimmed = text.trim();
    if is_blank_synonym(trimmed) {
        return NormalizedToken::unknown();
    }
    NormalizedToken(trimmed.to_owned())
}

fn is_blank_synonym(trimmed: &str) -> bool {
    BLANK_SYNONYMS
        .iter()
        .any(|synonym| trimmed.eq_ignore_ascii_case(synonym))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_is_unknown() {
        assert!(normalize(&RawValue::Absent).is_unknown());
        assert!(normalize(&RawValue::from(None::<&str>)).is_unknown());
    }

    #[test]
    fn test_blank_synonyms_fold_to_unknown() {
        for input in ["", "   ", "NA", "n/a", " None ", "NULL", "Unknown", "\tna\n"] {
            assert!(
                normalize(&RawValue::from(input)).is_unknown(),
                "{input:?} should normalize to unknown"
            );
        }
    }

    #[test]
    fn test_preserves_case_and_trims() {
        assert_eq!(normalize(&RawValue::from("  All-State ")).as_str(), "All-State");
        assert_eq!(normalize(&RawValue::from("high")).as_str(), "high");
    }

    #[test]
    fn test_does_not_fold_lookalikes() {
        // Only exact synonyms count as blank
        assert_eq!(normalize(&RawValue::from("Don't know")).as_str(), "Don't know");
        assert_eq!(normalize(&RawValue::from("nan")).as_str(), "nan");
        assert_eq!(normalize(&RawValue::from("0")).as_str(), "0");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "", " ", "QB", "  qb", "n/a", "UNKNOWN", "1–2 days", " 800+ ", "Don't know", "\u{a0}x",
        ];
        for input in inputs {
            let once = normalize(&RawValue::from(input));
            let twice = normalize(&RawValue::from(once.as_str()));
            assert_eq!(once, twice, "normalize not idempotent for {input:?}");
        }
    }
}
