//! Yes/no survey answers
//!
//! Two parsers with different strictness: [`consent_to_bool`] is the consent
//! gate and only answers `true` for an affirmative, while [`parse_bool`]
//! keeps "could not tell" distinct as `None`.

use crate::token::RawValue;

const TRUE_WORDS: [&str; 5] = ["true", "t", "yes", "y", "1"];
const FALSE_WORDS: [&str; 5] = ["false", "f", "no", "n", "0"];
const CONSENT_WORDS: [&str; 3] = ["yes", "true", "1"];
const CONSENT_NEGATIONS: [&str; 4] = ["disagree", "not agree", "don't agree", "do not agree"];

/// Returns `true` if the answer records affirmative consent
///
/// Any text containing "agree" counts (e.g. "I Agree"), as do the exact
/// answers `yes`, `true` and `1`. Negated forms such as "I disagree" and
/// absent answers do not.
///
/// # Examples
///
/// ```
/// use scoutprep_bins::{RawValue, flag::consent_to_bool};
///
/// assert!(consent_to_bool(&RawValue::from("I Agree")));
/// assert!(!consent_to_bool(&RawValue::from("decline")));
/// assert!(!consent_to_bool(&RawValue::Absent));
/// ```
#[must_use]
pub fn consent_to_bool(raw: &RawValue) -> bool {
    let Some(text) = raw.as_text() else {
        return false;
    };
    let text = text.trim().to_lowercase();
    if CONSENT_NEGATIONS.iter().any(|neg| text.contains(neg)) {
        return false;
    }
    text.contains("agree") || CONSENT_WORDS.contains(&text.as_str())
}

/// Parses a yes/no answer, returning `None` when it is neither
#[must_use]
pub fn parse_bool(raw: &RawValue) -> Option<bool> {
    let text = raw.as_text()?.trim().to_lowercase();
    if TRUE_WORDS.contains(&text.as_str()) {
        Some(true)
    } else if FALSE_WORDS.contains(&text.as_str()) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consent_affirmatives() {
        for input in ["I Agree", "agree", " AGREED ", "yes", "True", "1", "I agree to participate"] {
            assert!(consent_to_bool(&RawValue::from(input)), "{input:?}");
        }
    }

    #[test]
    fn test_consent_refusals() {
        for input in ["decline", "", "no", "0", "I disagree", "I do not agree", "yes please"] {
            assert!(!consent_to_bool(&RawValue::from(input)), "{input:?}");
        }
        assert!(!consent_to_bool(&RawValue::Absent));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool(&RawValue::from(" Yes ")), Some(true));
        assert_eq!(parse_bool(&RawValue::from("Y")), Some(true));
        assert_eq!(parse_bool(&RawValue::from("0")), Some(false));
        assert_eq!(parse_bool(&RawValue::from("FALSE")), Some(false));
        assert_eq!(parse_bool(&RawValue::from("maybe")), None);
        assert_eq!(parse_bool(&RawValue::from("")), None);
        assert_eq!(parse_bool(&RawValue::Absent), None);
    }
}
