//! Size extraction and comparator parsing
//!
//! Size-based rules (`min`, `max`, `between`, `size`) compare one canonical
//! number against a bound. The number depends on the kind of value:
//!
//! | value            | size                         |
//! |------------------|------------------------------|
//! | text             | character count              |
//! | array / object   | element count                |
//! | integer / float  | the number itself            |
//! | file             | byte size, `0` for no file   |
//!
//! Numeric-looking text is still text: `"17"` has size 2. Use a `to_int`
//! filter first to compare the number.
//!
//! Bounds are written as plain numbers or as `<digits><unit>` with a binary
//! unit, so `max:2mb` on a file means 2 × 1024² bytes.

use crate::foundation::{RuleError, UploadStatus, Value, ValueKind};
use std::fmt;

/// Units accepted after the digits of a comparator, in ascending powers of 1024.
const UNITS: [&str; 9] = ["b", "kb", "mb", "gb", "tb", "pb", "eb", "zb", "yb"];

/// The value has no meaningful size.
///
/// This is a validation outcome, not a configuration error: a rule receiving
/// it reports a field error and skips its comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedSize {
    /// Kind of the offending value.
    pub kind: ValueKind,
}

impl fmt::Display for UnsupportedSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported type for size comparison: {}", self.kind)
    }
}

impl std::error::Error for UnsupportedSize {}

/// Returns the canonical size of a value.
///
/// # Examples
///
/// ```
/// use nebula_rules::foundation::Value;
/// use nebula_rules::size::get_size;
///
/// assert_eq!(get_size(&Value::from("hello")), Ok(5.0));
/// assert_eq!(get_size(&Value::from(vec![1, 2, 3])), Ok(3.0));
/// assert!(get_size(&Value::Bool(true)).is_err());
/// ```
pub fn get_size(value: &Value) -> Result<f64, UnsupportedSize> {
    match value {
        Value::Text(s) => Ok(s.chars().count() as f64),
        Value::Array(items) => Ok(items.len() as f64),
        Value::Object(map) => Ok(map.len() as f64),
        Value::Integer(n) => Ok(*n as f64),
        Value::Float(n) => Ok(*n),
        Value::File(file) => Ok(match file.status() {
            UploadStatus::NoFile => 0.0,
            _ => file.size() as f64,
        }),
        Value::Null | Value::Bool(_) => Err(UnsupportedSize {
            kind: value.kind(),
        }),
    }
}

/// Parses a comparator literal such as `"15"`, `"2.5"` or `"1kb"`.
///
/// # Errors
///
/// Returns [`RuleError::ArgumentFormat`] for anything that is neither a plain
/// number nor digits followed by one of `b, kb, mb, gb, tb, pb, eb, zb, yb`
/// (case-insensitive).
///
/// # Examples
///
/// ```
/// use nebula_rules::size::parse_comparator;
///
/// assert_eq!(parse_comparator("15").unwrap(), 15.0);
/// assert_eq!(parse_comparator("1KB").unwrap(), 1024.0);
/// assert!(parse_comparator("bogus").is_err());
/// ```
pub fn parse_comparator(token: &str) -> Result<f64, RuleError> {
    let malformed = || RuleError::ArgumentFormat {
        token: token.to_owned(),
    };
    let trimmed = token.trim();

    if let Some(number) = parse_number(trimmed) {
        return Ok(number);
    }

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(malformed)?;
    let (digits, unit) = trimmed.split_at(split);
    if digits.is_empty() {
        return Err(malformed());
    }

    let unit = unit.to_ascii_lowercase();
    let power = UNITS
        .iter()
        .position(|u| *u == unit)
        .ok_or_else(malformed)?;
    let base: f64 = digits.parse().map_err(|_| malformed())?;

    Ok(base * 1024f64.powi(power as i32))
}

/// Parses a plain decimal number, rejecting the textual forms `f64` accepts
/// (`inf`, `NaN`, exponents) so that only digits, one dot and a sign pass.
fn parse_number(token: &str) -> Option<f64> {
    let unsigned = token.strip_prefix(['-', '+']).unwrap_or(token);
    let mut parts = unsigned.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let well_formed = match fraction {
        Some(fraction) => {
            !(whole.is_empty() && fraction.is_empty()) && digits_only(whole) && digits_only(fraction)
        }
        None => !whole.is_empty() && digits_only(whole),
    };

    if well_formed {
        token.parse().ok()
    } else {
        None
    }
}

/// Parses a bound taken from an already resolved value.
///
/// Numbers are used as-is, text goes through [`parse_comparator`].
pub fn comparator_from_value(rule: &str, value: &Value) -> Result<f64, RuleError> {
    match value {
        Value::Integer(n) => Ok(*n as f64),
        Value::Float(n) => Ok(*n),
        Value::Text(s) => parse_comparator(s),
        other => Err(RuleError::invalid_argument(
            rule,
            "a numeric comparator",
            other.kind().name(),
        )),
    }
}

/// Formats a size for messages: integral sizes print without a fraction.
#[must_use]
pub fn format_size(size: f64) -> String {
    if size.fract() == 0.0 && size.abs() < 1e15 {
        format!("{}", size as i64)
    } else {
        size.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::InMemoryFile;
    use indexmap::IndexMap;

    #[test]
    fn test_size_of_text_counts_characters() {
        assert_eq!(get_size(&Value::from("hello")), Ok(5.0));
        assert_eq!(get_size(&Value::from("héllo")), Ok(5.0));
        assert_eq!(get_size(&Value::from("17")), Ok(2.0));
    }

    #[test]
    fn test_size_of_collections() {
        assert_eq!(get_size(&Value::from(vec![1, 2, 3])), Ok(3.0));
        let map: IndexMap<String, Value> = IndexMap::from([("a".to_owned(), Value::Null)]);
        assert_eq!(get_size(&Value::Object(map)), Ok(1.0));
    }

    #[test]
    fn test_size_of_numbers_is_the_number() {
        assert_eq!(get_size(&Value::Float(5.0)), Ok(5.0));
        assert_eq!(get_size(&Value::Integer(-3)), Ok(-3.0));
    }

    #[test]
    fn test_size_of_files() {
        assert_eq!(get_size(&InMemoryFile::new(vec![0u8; 2048]).into()), Ok(2048.0));
        assert_eq!(get_size(&InMemoryFile::no_file().into()), Ok(0.0));
    }

    #[test]
    fn test_unsupported_kinds_report_instead_of_panicking() {
        let err = get_size(&Value::Bool(true)).unwrap_err();
        assert_eq!(err.kind, ValueKind::Bool);
        assert!(get_size(&Value::Null).is_err());
    }

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_comparator("15"), Ok(15.0));
        assert_eq!(parse_comparator("2.5"), Ok(2.5));
        assert_eq!(parse_comparator("-4"), Ok(-4.0));
        assert_eq!(parse_comparator(" 7 "), Ok(7.0));
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_comparator("1b"), Ok(1.0));
        assert_eq!(parse_comparator("1kb"), Ok(1024.0));
        assert_eq!(parse_comparator("2MB"), Ok(2.0 * 1024.0 * 1024.0));
        assert_eq!(parse_comparator("3Gb"), Ok(3.0 * 1024f64.powi(3)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for token in ["bogus", "", "kb", "1.5kb", "1 kb", "1xb", "inf", "NaN", "1e3", "."] {
            assert_eq!(
                parse_comparator(token),
                Err(RuleError::ArgumentFormat {
                    token: token.to_owned()
                }),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(5.0), "5");
        assert_eq!(format_size(2.5), "2.5");
    }
}
