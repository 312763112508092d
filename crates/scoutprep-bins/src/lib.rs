//! Categorical normalization for prospect survey answers
//!
//! This crate turns noisy survey text into stable ordinal codes:
//!
//! - **Tokens** ([`token`]): trim answers and fold every spelling of "no answer"
//!   into the canonical `"unknown"` token
//! - **Codes** ([`code`]): per-field lookup tables from tokens to ordinal codes,
//!   with `-1` reserved for absent or unrecognized answers
//! - **Fields** ([`field`]): the binned survey questions and their canonical tables
//! - **Honors** ([`honors`]): direct label → rank ladder for honors answers
//! - **Flags** ([`flag`]): consent and yes/no parsing
//!
//! Every mapping operation is total: bad input becomes the unknown sentinel,
//! never an error, so "did not answer" stays distinguishable from the lowest
//! bucket for every numeric consumer.
//!
//! # Examples
//!
//! ```
//! use scoutprep_bins::{CodeBook, OrdinalCode, RawValue, SurveyField};
//!
//! let book = CodeBook::standard();
//!
//! assert_eq!(
//!     book.code(SurveyField::CompetitionLevel, &RawValue::from("  high ")),
//!     OrdinalCode::new(3)
//! );
//! assert_eq!(
//!     book.code(SurveyField::SnapsEstimate, &RawValue::from("Don't know")),
//!     OrdinalCode::UNKNOWN
//! );
//! ```

pub use self::{
    code::{FieldMapping, OrdinalCode, map_to_code, map_to_code_or},
    field::{CodeBook, SurveyField},
    honors::HonorsTable,
    token::{NormalizedToken, RawValue, normalize},
};

pub mod code;
pub mod field;
pub mod flag;
pub mod honors;
pub mod token;
