//! Typed-format checks behind the `type` rule.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{error::DomainError, value::Value};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    // `\w` is ASCII-only; dot-less domains (`foo@com`) pass.
    Regex::new(r"^[A-Za-z0-9_\-.+]+@[A-Za-z0-9_\-.]*[A-Za-z0-9_]$")
        .expect("email pattern is a valid literal")
});

/// A format name accepted by the `type` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `#rrggbb`
    Color,
    /// Unsigned whole number.
    Number,
    /// Any numeric value.
    Range,
    /// `scheme://...`
    Url,
    Email,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Self::Color,
        Self::Number,
        Self::Range,
        Self::Url,
        Self::Email,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Number => "number",
            Self::Range => "range",
            Self::Url => "url",
            Self::Email => "email",
        }
    }

    /// Whether `value` is well-formed for this format.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Color => is_color(&value.as_text()),
            Self::Number => matches!(value, Value::Int(_)) || is_digits(&value.as_text()),
            Self::Range => value.is_numeric(),
            Self::Url => is_url(&value.as_text()),
            Self::Email => EMAIL.is_match(&value.as_text()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "color" => Ok(Self::Color),
            "number" => Ok(Self::Number),
            "range" => Ok(Self::Range),
            "url" => Ok(Self::Url),
            "email" => Ok(Self::Email),
            other => Err(DomainError::UnknownFormat(other.to_owned())),
        }
    }
}

fn is_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s.bytes().skip(1).all(|b| b.is_ascii_hexdigit())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_url(s: &str) -> bool {
    s.find("://").is_some_and(|pos| {
        let scheme = &s[..pos];
        !scheme.is_empty() && scheme.bytes().all(|b| b.is_ascii_alphabetic())
    })
}
