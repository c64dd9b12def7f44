//! Filter Engine - Declarative predicates over a RecordSet
//!
//! A record survives only if it satisfies every constraint. Filtering is
//! stable and referentially transparent.

use crate::error::{PipelineError, Result};
use crate::ingestion::coercion::parse_amount_strict;
use crate::record::{fields, Record, RecordSet, Value};
use crate::semantic::{Dimension, FieldRef, Measure};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Selection value meaning "no constraint".
pub const MATCH_ALL: &str = "all";

const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// Parse a record date (`12/1/2021` or `2021-12-01`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

/// Constraint on a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Never excludes a record
    Any,
    Equals { value: Value },
    /// Inclusive numeric bounds; the field must be numeric
    Range { min: Option<f64>, max: Option<f64> },
    /// Inclusive calendar bounds; the field must hold a parseable date
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl Constraint {
    pub fn equals(value: impl Into<Value>) -> Self {
        Constraint::Equals {
            value: value.into(),
        }
    }

    /// A UI selection: `"all"` or null mean no constraint, anything else is an exact match.
    pub fn from_selection(value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Null => Constraint::Any,
            Value::Text(s) if s.trim().eq_ignore_ascii_case(MATCH_ALL) => Constraint::Any,
            value => Constraint::Equals { value },
        }
    }

    /// Exact match on `field`. A numeric field takes a number or text that
    /// reads as an amount (`"$1,000"`); anything else is rejected.
    pub fn equals_on(field: &str, value: impl Into<Value>) -> Result<Self> {
        let value = value.into();
        if !fields::is_numeric(field) || value.is_null() {
            return Ok(Constraint::Equals { value });
        }
        match numeric_bound(field, value)? {
            Some(n) => Ok(Constraint::equals(n)),
            None => Ok(Constraint::Any),
        }
    }

    /// A UI selection on `field`, checked like `equals_on`.
    pub fn selection_on(field: &str, value: impl Into<Value>) -> Result<Self> {
        match Self::from_selection(value) {
            Constraint::Equals { value } => Self::equals_on(field, value),
            other => Ok(other),
        }
    }

    pub fn range(min: Option<f64>, max: Option<f64>) -> Result<Self> {
        for bound in [min, max].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(PipelineError::FilterValidation(format!(
                    "range bound {} is not a finite number",
                    bound
                )));
            }
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(PipelineError::FilterValidation(format!(
                    "range minimum {} exceeds maximum {}",
                    lo, hi
                )));
            }
        }
        Ok(Constraint::Range { min, max })
    }

    /// Numeric range from loosely typed bounds (`"100"`, `"$1,000"`, `250`, null).
    pub fn range_from_values(min: impl Into<Value>, max: impl Into<Value>) -> Result<Self> {
        Self::range(
            numeric_bound("range", min.into())?,
            numeric_bound("range", max.into())?,
        )
    }

    pub fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        if let (Some(lo), Some(hi)) = (from, to) {
            if lo > hi {
                return Err(PipelineError::FilterValidation(format!(
                    "date range start {} is after end {}",
                    lo, hi
                )));
            }
        }
        Ok(Constraint::DateRange { from, to })
    }

    /// Date range from text bounds; blank or null bounds are open.
    pub fn date_range_from_values(from: impl Into<Value>, to: impl Into<Value>) -> Result<Self> {
        Self::date_range(date_bound(from.into())?, date_bound(to.into())?)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Constraint::Any)
    }

    /// Whether a field value (`Null` when missing) satisfies this constraint.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Equals { value: expected } => expected.matches(value),
            Constraint::Range { min, max } => match value.as_number() {
                Some(n) => min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi),
                None => false,
            },
            Constraint::DateRange { from, to } => match value.as_str().and_then(parse_date) {
                Some(d) => from.map_or(true, |lo| d >= lo) && to.map_or(true, |hi| d <= hi),
                None => false,
            },
        }
    }
}

fn numeric_bound(target: &str, value: Value) -> Result<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Some(n)),
        Value::Text(s) if s.trim().is_empty() => Ok(None),
        Value::Text(s) => parse_amount_strict(&s).map(Some).ok_or_else(|| {
            PipelineError::FilterValidation(format!("'{}' is not a number for {}", s, target))
        }),
        Value::Bool(b) => Err(PipelineError::FilterValidation(format!(
            "'{}' is not a number for {}",
            b, target
        ))),
    }
}

fn date_bound(value: Value) -> Result<Option<NaiveDate>> {
    match value {
        Value::Null => Ok(None),
        Value::Text(s) if s.trim().is_empty() => Ok(None),
        Value::Text(s) => parse_date(&s).map(Some).ok_or_else(|| {
            PipelineError::FilterValidation(format!("'{}' is not a date (M/D/YYYY or YYYY-MM-DD)", s))
        }),
        other => Err(PipelineError::FilterValidation(format!(
            "'{}' is not a date bound",
            other
        ))),
    }
}

/// Mapping from field name to constraint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec {
    constraints: IndexMap<String, Constraint>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl FieldRef, constraint: Constraint) {
        self.constraints
            .insert(field.field_name().to_string(), constraint);
    }

    pub fn with(mut self, field: impl FieldRef, constraint: Constraint) -> Self {
        self.set(field, constraint);
        self
    }

    pub fn equals(self, field: impl FieldRef, value: impl Into<Value>) -> Result<Self> {
        let constraint = Constraint::equals_on(field.field_name(), value)?;
        Ok(self.with(field, constraint))
    }

    pub fn select(self, field: impl FieldRef, value: impl Into<Value>) -> Result<Self> {
        let constraint = Constraint::selection_on(field.field_name(), value)?;
        Ok(self.with(field, constraint))
    }

    pub fn range(
        self,
        field: impl FieldRef,
        min: impl Into<Value>,
        max: impl Into<Value>,
    ) -> Result<Self> {
        Ok(self.with(field, Constraint::range_from_values(min, max)?))
    }

    pub fn date_range(
        self,
        field: impl FieldRef,
        from: impl Into<Value>,
        to: impl Into<Value>,
    ) -> Result<Self> {
        Ok(self.with(field, Constraint::date_range_from_values(from, to)?))
    }

    pub fn constraint(&self, field: &str) -> Option<&Constraint> {
        self.constraints.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.constraints.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Constraints that can exclude something.
    pub fn active(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.iter().filter(|(_, c)| !c.is_any())
    }

    /// True when no constraint can exclude a record.
    pub fn is_unconstrained(&self) -> bool {
        self.active().next().is_none()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.active()
            .all(|(field, constraint)| constraint.accepts(record.value(field)))
    }

    /// Build from the UI's filter state object, e.g.
    /// `{"country": "all", "gender": "F", "revenueRange": {"min": "100"}}`.
    ///
    /// Keys resolve through dimension and measure aliases. A key ending in
    /// `Range` takes `{min, max}` (or `{from, to}`); on the `Date` field the
    /// bounds are dates.
    pub fn from_json(state: &JsonValue) -> Result<Self> {
        let obj = state.as_object().ok_or_else(|| {
            PipelineError::FilterValidation("filter state must be a JSON object".to_string())
        })?;

        let mut spec = FilterSpec::new();
        for (key, raw) in obj {
            match strip_range_suffix(key) {
                Some(base) => {
                    let field = resolve_field(base);
                    let constraint = range_constraint(&field, raw)?;
                    spec.set(field, constraint);
                }
                None => {
                    let field = resolve_field(key);
                    let constraint = match raw {
                        JsonValue::Array(_) | JsonValue::Object(_) => {
                            return Err(PipelineError::FilterValidation(format!(
                                "filter '{}' expects a single value",
                                key
                            )))
                        }
                        scalar => Constraint::selection_on(&field, json_scalar(scalar))?,
                    };
                    spec.set(field, constraint);
                }
            }
        }
        Ok(spec)
    }
}

fn strip_range_suffix(key: &str) -> Option<&str> {
    let trimmed = key.trim();
    let split = trimmed.len().checked_sub("range".len())?;
    if split == 0 || !trimmed.is_char_boundary(split) {
        return None;
    }
    let (base, suffix) = trimmed.split_at(split);
    suffix.eq_ignore_ascii_case("range").then(|| base.trim_end_matches(|c: char| c == '_' || c == ' '))
}

fn resolve_field(name: &str) -> String {
    match Measure::from_name(name) {
        Some(measure) => measure.field_name().to_string(),
        None => Dimension::from_name(name).field_name().to_string(),
    }
}

fn range_constraint(field: &str, raw: &JsonValue) -> Result<Constraint> {
    match raw {
        JsonValue::Null => Ok(Constraint::Any),
        JsonValue::String(s) if s.trim().eq_ignore_ascii_case(MATCH_ALL) => Ok(Constraint::Any),
        JsonValue::Object(bounds) => {
            let lower = bounds.get("min").or_else(|| bounds.get("from"));
            let upper = bounds.get("max").or_else(|| bounds.get("to"));
            let lower = lower.map(json_scalar).unwrap_or(Value::Null);
            let upper = upper.map(json_scalar).unwrap_or(Value::Null);
            if field == fields::DATE {
                Constraint::date_range_from_values(lower, upper)
            } else {
                Constraint::range_from_values(lower, upper)
            }
        }
        other => Err(PipelineError::FilterValidation(format!(
            "range filter on '{}' expects an object with min/max, got {}",
            field, other
        ))),
    }
}

fn json_scalar(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        JsonValue::String(s) => Value::Text(s.clone()),
        nested => Value::Text(nested.to_string()),
    }
}

/// Apply a filter, preserving input order.
pub fn apply(records: &RecordSet, spec: &FilterSpec) -> RecordSet {
    if spec.is_unconstrained() {
        return records.clone();
    }

    let filtered: RecordSet = records
        .iter()
        .filter(|record| spec.matches(record))
        .cloned()
        .collect();

    debug!(
        input = records.len(),
        retained = filtered.len(),
        constraints = spec.active().count(),
        "applied filter"
    );
    filtered
}
