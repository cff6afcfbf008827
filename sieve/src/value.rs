//! Filter values: the comma-escape codec and type coercion.
//!
//! Comma-delimited lists use `\,` as the one and only escape sequence. A
//! comma immediately preceded by a backslash is part of the value; every
//! other comma is a delimiter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a filterable field, used to coerce raw filter values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    String,
    Number,
    Boolean,
}

/// A typed filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl FilterValue {
    /// Coerce a decoded raw value according to a declared type.
    ///
    /// Booleans coerce only from the exact strings `true` and `false`;
    /// anything else stays a string. Numbers must parse as a float, and
    /// the raw value is handed back as the error when they do not.
    pub fn coerce(raw: String, value_type: ValueType) -> std::result::Result<Self, String> {
        match value_type {
            ValueType::Number => raw
                .parse::<f64>()
                .map(FilterValue::Number)
                .map_err(|_| raw),
            ValueType::Boolean => Ok(match raw.as_str() {
                "true" => FilterValue::Bool(true),
                "false" => FilterValue::Bool(false),
                _ => FilterValue::Str(raw),
            }),
            ValueType::String => Ok(FilterValue::Str(raw)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the value as it appears on the wire: strings verbatim, numbers
/// and booleans in their canonical form, null as the empty string.
impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Null => Ok(()),
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Str(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Str(s)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

/// Split a comma-delimited list on unescaped commas.
///
/// Escape sequences are left intact in the pieces; call
/// [`unescape_commas`] on the parts that carry values.
pub fn split_escaped(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut prev = None;
    for (pos, ch) in raw.char_indices() {
        if ch == ',' && prev != Some('\\') {
            parts.push(&raw[start..pos]);
            start = pos + 1;
        }
        prev = Some(ch);
    }
    parts.push(&raw[start..]);
    parts
}

/// Replace every `\,` with a literal comma.
pub fn unescape_commas(raw: &str) -> String {
    raw.replace("\\,", ",")
}

/// Escape every comma as `\,` so the value survives list splitting.
pub fn escape_commas(raw: &str) -> String {
    raw.replace(',', "\\,")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_list() {
        assert_eq!(split_escaped("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_escaped("single"), vec!["single"]);
        assert_eq!(split_escaped(""), vec![""]);
    }

    #[test]
    fn test_split_keeps_escaped_commas() {
        assert_eq!(
            split_escaped("name@=Test\\, Inc.,price>=10"),
            vec!["name@=Test\\, Inc.", "price>=10"]
        );
    }

    #[test]
    fn test_split_empty_pieces_survive() {
        assert_eq!(split_escaped("a,,b"), vec!["a", "", "b"]);
        assert_eq!(split_escaped(","), vec!["", ""]);
    }

    #[test]
    fn test_escape_round_trip() {
        let original = "Test, Inc., and friends";
        assert_eq!(unescape_commas(&escape_commas(original)), original);
        assert_eq!(escape_commas(original), "Test\\, Inc.\\, and friends");
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(
            FilterValue::coerce("10.5".to_string(), ValueType::Number),
            Ok(FilterValue::Number(10.5))
        );
        assert_eq!(
            FilterValue::coerce("abc".to_string(), ValueType::Number),
            Err("abc".to_string())
        );
    }

    #[test]
    fn test_coerce_boolean_falls_back_to_string() {
        assert_eq!(
            FilterValue::coerce("true".to_string(), ValueType::Boolean),
            Ok(FilterValue::Bool(true))
        );
        assert_eq!(
            FilterValue::coerce("false".to_string(), ValueType::Boolean),
            Ok(FilterValue::Bool(false))
        );
        assert_eq!(
            FilterValue::coerce("True".to_string(), ValueType::Boolean),
            Ok(FilterValue::Str("True".to_string()))
        );
        assert_eq!(
            FilterValue::coerce("1".to_string(), ValueType::Boolean),
            Ok(FilterValue::Str("1".to_string()))
        );
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(FilterValue::Str("active".to_string()).to_string(), "active");
        assert_eq!(FilterValue::Number(100.0).to_string(), "100");
        assert_eq!(FilterValue::Number(10.5).to_string(), "10.5");
        assert_eq!(FilterValue::Bool(true).to_string(), "true");
        assert_eq!(FilterValue::Null.to_string(), "");
    }
}
