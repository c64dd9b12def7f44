//! Record Model - Schema-less records holding tagged scalar values
//!
//! A `Record` maps field names to `Value`s in insertion order. The canonical
//! sales fields get named accessors; anything else is reached through `get`.

use crate::ingestion::coercion::parse_amount_strict;
use crate::semantic::{Dimension, Measure};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical field names of the sales working set.
pub mod fields {
    pub const DATE: &str = "Date";
    pub const MONTH: &str = "Month";
    pub const YEAR: &str = "Year";
    pub const CUSTOMER_AGE: &str = "Customer_Age";
    pub const AGE_GROUP: &str = "Age_Group";
    pub const CUSTOMER_GENDER: &str = "Customer_Gender";
    pub const COUNTRY: &str = "Country";
    pub const STATE: &str = "State";
    pub const PRODUCT_CATEGORY: &str = "Product_Category";
    pub const ORDER_QUANTITY: &str = "Order_Quantity";
    pub const PROFIT: &str = "Profit";
    pub const COST: &str = "Cost";
    pub const REVENUE: &str = "Revenue";

    /// Fields that must hold numbers whenever they are present.
    pub const NUMERIC: [&str; 5] = [REVENUE, PROFIT, COST, ORDER_QUANTITY, CUSTOMER_AGE];

    pub fn is_numeric(name: &str) -> bool {
        NUMERIC.contains(&name)
    }
}

/// Tagged scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

static NULL: Value = Value::Null;

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null or empty text.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Type-aware equality used by exact-match filters.
    ///
    /// Numbers compare numerically, including against text that reads as an
    /// amount (`"1000"`, `"$1,000"`); everything else compares by variant and content.
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Number(n), Value::Text(s)) | (Value::Text(s), Value::Number(n)) => {
                parse_amount_strict(s) == Some(*n)
            }
            (a, b) => a == b,
        }
    }

    /// Hashable identity of this value, used for grouping and distinct sets.
    pub fn key(&self) -> ValueKey {
        match self {
            Value::Null => ValueKey::Null,
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Number(n) => {
                // -0.0 and 0.0 group together; every NaN shares one bucket
                let canonical = if *n == 0.0 {
                    0.0
                } else if n.is_nan() {
                    f64::NAN
                } else {
                    *n
                };
                ValueKey::Number(canonical.to_bits())
            }
            Value::Text(s) => ValueKey::Text(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    /// Plain rendering: empty for null, no currency formatting for numbers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Null,
    Bool(bool),
    Number(u64),
    Text(String),
}

/// One normalized transaction row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(name, value)` pairs, keeping their order.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Insert or replace a field. A replaced field keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field value, with missing fields reported as `Value::Null`.
    pub fn value(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&NULL)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when every field is null, absent or empty text.
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(Value::is_blank)
    }

    pub fn measure(&self, measure: Measure) -> Option<f64> {
        self.number(measure.field_name())
    }

    pub fn dimension(&self, dimension: &Dimension) -> &Value {
        self.value(dimension.field_name())
    }

    pub fn date(&self) -> Option<&str> {
        self.text(fields::DATE)
    }

    pub fn month(&self) -> Option<&str> {
        self.text(fields::MONTH)
    }

    pub fn year(&self) -> Option<f64> {
        self.number(fields::YEAR)
    }

    pub fn customer_age(&self) -> Option<f64> {
        self.number(fields::CUSTOMER_AGE)
    }

    pub fn age_group(&self) -> Option<&str> {
        self.text(fields::AGE_GROUP)
    }

    pub fn customer_gender(&self) -> Option<&str> {
        self.text(fields::CUSTOMER_GENDER)
    }

    pub fn country(&self) -> Option<&str> {
        self.text(fields::COUNTRY)
    }

    pub fn state(&self) -> Option<&str> {
        self.text(fields::STATE)
    }

    pub fn product_category(&self) -> Option<&str> {
        self.text(fields::PRODUCT_CATEGORY)
    }

    pub fn order_quantity(&self) -> Option<f64> {
        self.number(fields::ORDER_QUANTITY)
    }

    pub fn profit(&self) -> Option<f64> {
        self.number(fields::PROFIT)
    }

    pub fn cost(&self) -> Option<f64> {
        self.number(fields::COST)
    }

    pub fn revenue(&self) -> Option<f64> {
        self.number(fields::REVENUE)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Ordered collection of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Every field name seen across all records, in first-seen order.
    pub fn field_union(&self) -> Vec<String> {
        let mut seen: indexmap::IndexSet<&str> = indexmap::IndexSet::new();
        for record in &self.records {
            seen.extend(record.keys());
        }
        seen.into_iter().map(str::to_string).collect()
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RecordSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_reads_as_null() {
        let record = Record::from_pairs([("Country", "US")]);
        assert_eq!(record.value("Revenue"), &Value::Null);
        assert_eq!(record.country(), Some("US"));
    }

    #[test]
    fn test_numeric_match_against_text() {
        assert!(Value::Number(100.0).matches(&Value::text("100")));
        assert!(!Value::Number(100.0).matches(&Value::text("1e3")));
        assert!(Value::Number(1000.0).matches(&Value::text("$1,000")));
        assert!(!Value::text("US").matches(&Value::text("us")));
    }

    #[test]
    fn test_zero_keys_collapse() {
        assert_eq!(Value::Number(-0.0).key(), Value::Number(0.0).key());
    }

    #[test]
    fn test_display_renders_plain_numbers() {
        assert_eq!(Value::Number(2021.0).to_string(), "2021");
        assert_eq!(Value::Number(1234.5).to_string(), "1234.5");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_field_union_is_first_seen_order() {
        let set: RecordSet = vec![
            Record::from_pairs([("A", 1), ("B", 2)]),
            Record::from_pairs([("C", 3), ("A", 4)]),
        ]
        .into();
        assert_eq!(set.field_union(), vec!["A", "B", "C"]);
    }
}
