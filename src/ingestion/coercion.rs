//! Value Coercion - Explicit, total mapping from raw cells to scalar values
//!
//! Every input value lands in exactly one `Value` variant. Monetary text
//! (`$1,234.50`, `1,234`) becomes a number; a monetary string that still fails
//! to parse becomes `0` rather than an error.

use crate::record::{fields, Value};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value as JsonValue;

lazy_static! {
    static ref COMMA_GROUPED: Regex =
        Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d+)?$").expect("comma-grouped pattern is valid");
}

/// Text that should be read as a monetary amount.
pub fn is_monetary(s: &str) -> bool {
    s.contains('$') || COMMA_GROUPED.is_match(s.trim())
}

/// Strip `$` and `,` and parse what is left. `None` when nothing numeric remains.
pub fn parse_amount_strict(s: &str) -> Option<f64> {
    let stripped: String = s.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    stripped
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Lenient monetary parse: failure yields `0`.
pub fn parse_amount(s: &str) -> f64 {
    parse_amount_strict(s).unwrap_or(0.0)
}

/// Coerce one raw delimited-text cell, before field-level cleaning.
pub fn coerce_cell(s: &str) -> JsonValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return JsonValue::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return JsonValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return JsonValue::Bool(false);
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return JsonValue::Number(i.into());
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return JsonValue::Number(n);
        }
    }

    JsonValue::String(trimmed.to_string())
}

/// Clean one field value of a parsed row into its final scalar form.
///
/// Canonical numeric fields always come out as `Number` or `Null`.
pub fn clean_value(field: &str, raw: JsonValue) -> Value {
    let numeric_field = fields::is_numeric(field);

    match raw {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) if numeric_field => Value::Number(if b { 1.0 } else { 0.0 }),
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        JsonValue::String(s) => {
            if s.trim().is_empty() {
                Value::Null
            } else if is_monetary(&s) || numeric_field {
                Value::Number(parse_amount(&s))
            } else {
                Value::Text(s)
            }
        }
        // nested structures are kept verbatim as their JSON text
        nested @ (JsonValue::Array(_) | JsonValue::Object(_)) => Value::Text(nested.to_string()),
    }
}
