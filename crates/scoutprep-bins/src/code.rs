//! Ordinal codes and per-field lookup tables
//!
//! A [`FieldMapping`] is the closed vocabulary of one survey field: every
//! accepted surface spelling of a bucket label maps to that bucket's
//! [`OrdinalCode`]. Tables are plain immutable values; build one with
//! [`FieldMapping::from_buckets`] and pass it to [`map_to_code`].
//!
//! # Examples
//!
//! ```
//! use scoutprep_bins::{
//!     code::{FieldMapping, OrdinalCode, map_to_code},
//!     token::RawValue,
//! };
//!
//! let mapping = FieldMapping::from_buckets(&[(&["0"], 0), (&["1–2", "1-2"], 1)])
//!     .with_unit_suffixes(&["days"]);
//!
//! assert_eq!(map_to_code(&RawValue::from("1-2 days"), &mapping), OrdinalCode::new(1));
//! assert_eq!(map_to_code(&RawValue::from("7"), &mapping), OrdinalCode::UNKNOWN);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::token::{NormalizedToken, RawValue, normalize};

/// Small integer representing a ranked or categorical bucket
///
/// [`OrdinalCode::UNKNOWN`] (`-1`) is reserved for answers that were absent or
/// not recognized, so it never collides with the lowest real bucket.
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
    derive_more::From,
)]
#[serde(transparent)]
pub struct OrdinalCode(i32);

impl OrdinalCode {
    pub const UNKNOWN: Self = Self(-1);

    #[must_use]
    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_unknown(self) -> bool {
        self.0 == Self::UNKNOWN.0
    }
}

/// Lookup table from normalized tokens to ordinal codes for one field
///
/// Keys are compared case-insensitively. The canonical `"unknown"` token is
/// always present and maps to [`OrdinalCode::UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    codes: BTreeMap<String, OrdinalCode>,
}

impl FieldMapping {
    /// Builds a table from buckets of synonymous labels
    ///
    /// Every label listed in a bucket maps to that bucket's code. Labels are
    /// trimmed and case-folded; list each dash or spacing variant explicitly.
    #[must_use]
    pub fn from_buckets(buckets: &[(&[&str], i32)]) -> Self {
        let mut codes = BTreeMap::new();
        codes.insert(NormalizedToken::UNKNOWN.to_owned(), OrdinalCode::UNKNOWN);
        for (labels, code) in buckets {
            for label in *labels {
                codes.insert(fold(label), OrdinalCode(*code));
            }
        }
        Self { codes }
    }

    /// Adds `"<label> <suffix>"` as a synonym of every existing label
    ///
    /// Used for bucket labels that respondents write with trailing units,
    /// e.g. `"1-2 days"` for `"1-2"`.
    #[must_use]
    pub fn with_unit_suffixes(mut self, suffixes: &[&str]) -> Self {
        let variants = self
            .codes
            .iter()
            .filter(|(label, _)| label.as_str() != NormalizedToken::UNKNOWN)
            .flat_map(|(label, code)| {
                suffixes
                    .iter()
                    .map(move |suffix| (fold(&format!("{label} {suffix}")), *code))
            })
            .collect::<Vec<_>>();
        self.codes.extend(variants);
        self
    }

    /// Looks up a normalized token
    #[must_use]
    pub fn get(&self, token: &NormalizedToken) -> Option<OrdinalCode> {
        self.codes.get(&fold(token.as_str())).copied()
    }

    /// Every distinct code this table can produce, including the unknown sentinel
    #[must_use]
    pub fn code_space(&self) -> Vec<OrdinalCode> {
        let mut codes = self.codes.values().copied().collect::<Vec<_>>();
        codes.sort_unstable();
        codes.dedup();
        codes
    }

    /// All accepted (case-folded) labels
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.codes.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn fold(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Maps a raw answer to its ordinal code, falling back to [`OrdinalCode::UNKNOWN`]
///
/// See [`map_to_code_or`].
#[must_use]
pub fn map_to_code(raw: &RawValue, mapping: &FieldMapping) -> OrdinalCode {
    map_to_code_or(raw, mapping, OrdinalCode::UNKNOWN)
}

/// Maps a raw answer to its ordinal code
///
/// The answer is [normalized](normalize) first, then looked up in `mapping`.
/// Unrecognized text yields `unknown_code`; this function never fails.
#[must_use]
pub fn map_to_code_or(
    raw: &RawValue,
    mapping: &FieldMapping,
    unknown_code: OrdinalCode,
) -> OrdinalCode {
    let token = normalize(raw);
    mapping.get(&token).unwrap_or(unknown_code)
}
