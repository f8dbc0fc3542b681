//! Identifier normalization for joining tables from different tools.

use crate::data::Value;
use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[:.\s]+$").expect("static identifier pattern"));

/// Strip any trailing run of colons, periods and whitespace from an identifier.
pub fn normalize_id_str(id: &str) -> &str {
    match TRAILING_PUNCT.find(id) {
        Some(m) => &id[..m.start()],
        None => id,
    }
}

/// Normalize an identifier cell.
///
/// Text values lose their trailing `:`/`.`/whitespace run; numeric and
/// missing values are returned unchanged.
pub fn normalize_id(value: &Value) -> Value {
    match value {
        Value::Categorical(s) => Value::Categorical(normalize_id_str(s).to_string()),
        other => other.clone(),
    }
}
