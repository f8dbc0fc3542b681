//! Cell values for identifier-keyed label tables.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Field contents treated as missing when reading delimited text.
///
/// Lowercase `na` is deliberately absent: it is kept as a label and
/// filtered later as unreliable ground truth.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Text value.
    Categorical(String),
    /// Numeric value (every non-missing cell of its column parsed as a number).
    Continuous(f64),
    /// Missing value.
    Missing,
}

impl Value {
    /// Check if this is a missing value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Try to get as text.
    pub fn as_categorical(&self) -> Option<&str> {
        match self {
            Value::Categorical(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical text form used for joins and label identity.
    ///
    /// Returns `None` for missing values, which never match anything.
    pub fn key(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Categorical(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Continuous(v) => Some(Cow::Owned(v.to_string())),
            Value::Missing => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Categorical(s) => write!(f, "{}", s),
            Value::Continuous(v) => write!(f, "{}", v),
            Value::Missing => Ok(()),
        }
    }
}

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Categorical,
    Continuous,
}

/// Check whether a raw field is one of the missing-value markers.
pub fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

/// Continuous if every present, non-missing field parses as a number.
fn infer_column_type(raw: &[Option<String>]) -> ColumnType {
    let mut any_present = false;
    let all_numeric = raw.iter().all(|field| match field {
        Some(s) if !is_missing_token(s) => {
            any_present = true;
            s.trim().parse::<f64>().is_ok()
        }
        _ => true,
    });
    if all_numeric && any_present {
        ColumnType::Continuous
    } else {
        ColumnType::Categorical
    }
}

/// Convert raw fields of one column into typed values.
///
/// `None` stands for a field absent from a short line. Numeric columns
/// become [`Value::Continuous`]; otherwise the text is kept verbatim.
pub fn parse_column(raw: &[Option<String>]) -> Vec<Value> {
    let column_type = infer_column_type(raw);
    raw.iter()
        .map(|field| match field {
            None => Value::Missing,
            Some(s) if is_missing_token(s) => Value::Missing,
            Some(s) => match column_type {
                ColumnType::Continuous => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Continuous)
                    .unwrap_or(Value::Missing),
                ColumnType::Categorical => Value::Categorical(s.clone()),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(raw: &[&str]) -> Vec<Option<String>> {
        raw.iter().map(|s| Some(s.to_string())).collect()
    }

    #[test]
    fn test_numeric_column_inference() {
        let raw = fields(&["1", "2.5", "NA", " 3 "]);
        assert_eq!(infer_column_type(&raw), ColumnType::Continuous);
        let values = parse_column(&raw);
        assert_eq!(values[0], Value::Continuous(1.0));
        assert_eq!(values[1], Value::Continuous(2.5));
        assert!(values[2].is_missing());
        assert_eq!(values[3], Value::Continuous(3.0));
    }

    #[test]
    fn test_mixed_column_is_categorical() {
        let raw = fields(&["1", "Caudovirales", ""]);
        assert_eq!(infer_column_type(&raw), ColumnType::Categorical);
        let values = parse_column(&raw);
        assert_eq!(values[0].as_categorical(), Some("1"));
        assert!(values[2].is_missing());
    }

    #[test]
    fn test_lowercase_na_is_kept() {
        let values = parse_column(&fields(&["na", "NA", "n/a"]));
        assert_eq!(values[0].as_categorical(), Some("na"));
        assert!(values[1].is_missing());
        assert!(values[2].is_missing());
    }

    #[test]
    fn test_absent_fields_are_missing() {
        let raw = vec![Some("g1".to_string()), None];
        assert_eq!(infer_column_type(&raw), ColumnType::Categorical);
        let values = parse_column(&raw);
        assert!(values[1].is_missing());
    }

    #[test]
    fn test_all_missing_column_is_categorical() {
        let raw = vec![Some("NA".to_string()), None];
        assert_eq!(infer_column_type(&raw), ColumnType::Categorical);
        assert!(parse_column(&raw).iter().all(Value::is_missing));
    }

    #[test]
    fn test_key_forms() {
        assert_eq!(Value::Continuous(12.0).key().as_deref(), Some("12"));
        assert_eq!(Value::Categorical("12".into()).key().as_deref(), Some("12"));
        assert!(Value::Missing.key().is_none());
    }
}
