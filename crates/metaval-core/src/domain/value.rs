//! Dynamic scalar values read from subjects and configured on rules.
//!
//! # Design
//!
//! Property values and rule values share one type. Comparisons between them
//! are *loose*: numeric strings compare as numbers, everything else falls
//! back to a byte-wise comparison of the textual form. All coercion lives in
//! this file so the validator never guesses at types itself.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A dynamically typed scalar.
///
/// `Null` is the "unset" marker: a property holding `Null` is treated exactly
/// like a property that is absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Whether the value counts as set (anything but `Null`).
    pub const fn is_set(&self) -> bool {
        !matches!(self, Self::Null)
    }

    /// Truthiness used by flag rules (`required`, `unique`, `immutable`).
    ///
    /// Empty text and `"0"` are false, as are zero numbers.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => !s.is_empty() && s != "0",
        }
    }

    /// Borrow the string payload, if this is a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form used by length and format checks.
    ///
    /// | Value            | Text      |
    /// |------------------|-----------|
    /// | `Null`           | `""`      |
    /// | `Bool(true)`     | `"1"`     |
    /// | `Bool(false)`    | `""`      |
    /// | `Int(10)`        | `"10"`    |
    /// | `Float(10.0)`    | `"10"`    |
    /// | `Float(10.5)`    | `"10.5"`  |
    /// | `Text(s)`        | `s`       |
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Null | Self::Bool(false) => Cow::Borrowed(""),
            Self::Bool(true) => Cow::Borrowed("1"),
            Self::Int(i) => Cow::Owned(i.to_string()),
            Self::Float(f) => Cow::Owned(float_text(*f)),
            Self::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Numeric view of the value.
    ///
    /// Numbers are returned as-is; text is parsed when it is a numeric string
    /// (see [`parse_numeric`]). Booleans and `Null` are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => parse_numeric(s),
            Self::Null | Self::Bool(_) => None,
        }
    }

    /// Integer view of the value, truncating fractions. Non-numeric values
    /// yield `0`.
    pub fn as_integer(&self) -> i64 {
        match self {
            Self::Int(i) => *i,
            Self::Bool(b) => i64::from(*b),
            other => other.as_number().map_or(0, |n| n.trunc() as i64),
        }
    }

    /// Whether the value is a number or a numeric string.
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }

    /// Loose ordering between two values.
    ///
    /// - Either side boolean or null: compare truthiness.
    /// - Both sides numeric: compare numerically (integers exactly).
    /// - Otherwise: compare textual forms byte-wise.
    pub fn loose_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Self::Null | Self::Bool(_), _) | (_, Self::Null | Self::Bool(_)) => {
                self.is_truthy().cmp(&other.is_truthy())
            }
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => self.as_text().as_bytes().cmp(other.as_text().as_bytes()),
            },
        }
    }

    /// Loose equality, consistent with [`Value::loose_cmp`].
    pub fn loose_eq(&self, other: &Value) -> bool {
        self.loose_cmp(other) == Ordering::Equal
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Self::Float(n as f64), Self::Int)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

/// Parse a numeric string.
///
/// Accepted grammar, after trimming surrounding ASCII whitespace:
///
/// ```text
/// [+-]? ( digits [ '.' digits? ] | '.' digits ) ( [eE] [+-]? digits )?
/// ```
///
/// Anything else (including `inf`, `nan`, hex, trailing garbage such as
/// `"10f"`) is not numeric.
pub fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let bytes = trimmed.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }

    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if j == exp_start {
            return None;
        }
        i = j;
    }

    if i != bytes.len() {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

/// Render a float the way integral amounts are usually written: `10.0` is
/// `"10"`, `10.5` stays `"10.5"`.
fn float_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else if f.is_nan() {
        "NAN".to_owned()
    } else if f.is_infinite() {
        if f > 0.0 { "INF".to_owned() } else { "-INF".to_owned() }
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_unset() {
        assert!(!Value::Null.is_set());
        assert!(Value::Text(String::new()).is_set());
        assert!(Value::Bool(false).is_set());
    }

    #[test]
    fn truthiness() {
        assert!(Value::from(true).is_truthy());
        assert!(Value::from("group").is_truthy());
        assert!(!Value::from("0").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::Null.is_truthy());
    }

    #[test]
    fn text_forms() {
        assert_eq!(Value::from(10.0).as_text(), "10");
        assert_eq!(Value::from(10.5).as_text(), "10.5");
        assert_eq!(Value::from(-3).as_text(), "-3");
        assert_eq!(Value::from(true).as_text(), "1");
        assert_eq!(Value::from(false).as_text(), "");
        assert_eq!(Value::Null.as_text(), "");
    }

    #[test]
    fn numeric_strings() {
        assert_eq!(parse_numeric("10"), Some(10.0));
        assert_eq!(parse_numeric(" -5.25 "), Some(-5.25));
        assert_eq!(parse_numeric("+.5"), Some(0.5));
        assert_eq!(parse_numeric("5."), Some(5.0));
        assert_eq!(parse_numeric("1e3"), Some(1000.0));
        assert_eq!(parse_numeric("10f"), None);
        assert_eq!(parse_numeric("1e"), None);
        assert_eq!(parse_numeric("."), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("0x1A"), None);
    }

    #[test]
    fn loose_cmp_numeric_strings_compare_as_numbers() {
        // "12" vs "10" would also pass byte-wise; "9" vs "10" would not.
        assert_eq!(Value::from("9").loose_cmp(&Value::from("10")), Ordering::Less);
        assert_eq!(Value::from("12").loose_cmp(&Value::from(10)), Ordering::Greater);
        assert_eq!(Value::from(10).loose_cmp(&Value::from(10.0)), Ordering::Equal);
    }

    #[test]
    fn loose_cmp_non_numeric_falls_back_to_text() {
        assert_eq!(Value::from("abc").loose_cmp(&Value::from("abd")), Ordering::Less);
        assert_eq!(Value::from(5).loose_cmp(&Value::from("abc")), Ordering::Less);
    }

    #[test]
    fn loose_eq_matches_numbers_against_numeric_text() {
        assert!(Value::from(6).loose_eq(&Value::from("6")));
        assert!(Value::from("6.0").loose_eq(&Value::from(6)));
        assert!(!Value::from("qux").loose_eq(&Value::from("foo")));
    }

    #[test]
    fn integer_view_truncates() {
        assert_eq!(Value::from("5").as_integer(), 5);
        assert_eq!(Value::from(5.9).as_integer(), 5);
        assert_eq!(Value::from("five").as_integer(), 0);
    }

    #[test]
    fn deserializes_untagged() {
        let v: Vec<Value> = serde_json::from_str(r#"[null, true, 3, 2.5, "x"]"#).unwrap();
        assert_eq!(
            v,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(3),
                Value::Float(2.5),
                Value::Text("x".into()),
            ]
        );
    }
}
