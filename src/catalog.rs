//! Dimension Catalog - Distinct values per dimension
//!
//! Feeds filter controls. Null and blank values are never offered as choices,
//! although records holding them still pass a "no constraint" filter.

use crate::record::{RecordSet, Value, ValueKey};
use crate::semantic::{Dimension, FieldRef};
use indexmap::{IndexMap, IndexSet};

/// Human-readable label for a dimension value: `M`/`F` genders are spelled
/// out, null reads `(blank)`, everything else renders plainly.
pub fn display_label(dimension: &Dimension, value: &Value) -> String {
    match (dimension, value) {
        (_, Value::Null) => "(blank)".to_string(),
        (Dimension::Gender, Value::Text(s)) => match s.trim() {
            "M" => "Male".to_string(),
            "F" => "Female".to_string(),
            other => other.to_string(),
        },
        (_, v) => v.to_string(),
    }
}

/// Distinct non-blank values of `field`, in first-seen order.
pub fn distinct_values(records: &RecordSet, field: impl FieldRef) -> Vec<Value> {
    let name = field.field_name();
    let mut seen: IndexSet<ValueKey> = IndexSet::new();
    let mut values = Vec::new();

    for value in records.iter().filter_map(|r| r.get(name)) {
        if value.is_blank() {
            continue;
        }
        if seen.insert(value.key()) {
            values.push(value.clone());
        }
    }
    values
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionCatalog {
    entries: IndexMap<Dimension, Vec<Value>>,
}

impl DimensionCatalog {
    pub fn build(records: &RecordSet, dimensions: &[Dimension]) -> Self {
        let entries = dimensions
            .iter()
            .map(|d| (d.clone(), distinct_values(records, d.clone())))
            .collect();
        Self { entries }
    }

    /// Catalog of every dimension offered as a filter control.
    pub fn filterable(records: &RecordSet) -> Self {
        Self::build(records, &Dimension::filterable())
    }

    /// Values for a dimension; empty when the dimension was not catalogued.
    pub fn values(&self, dimension: &Dimension) -> &[Value] {
        self.entries
            .get(dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, dimension: &Dimension, value: &Value) -> bool {
        self.values(dimension).iter().any(|v| v.matches(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Dimension, &[Value])> {
        self.entries.iter().map(|(d, v)| (d, v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_labels_spelled_out() {
        assert_eq!(display_label(&Dimension::Gender, &Value::text("M")), "Male");
        assert_eq!(display_label(&Dimension::Gender, &Value::text("F")), "Female");
        assert_eq!(display_label(&Dimension::Gender, &Value::text("X")), "X");
        assert_eq!(display_label(&Dimension::Country, &Value::text("M")), "M");
        assert_eq!(display_label(&Dimension::Year, &Value::Number(2021.0)), "2021");
    }
}
