pub mod metric;
pub mod dimension;

pub use metric::*;
pub use dimension::*;

/// Anything that names a record field: a typed dimension, a measure, or a raw name.
pub trait FieldRef {
    fn field_name(&self) -> &str;
}

impl FieldRef for Dimension {
    fn field_name(&self) -> &str {
        Dimension::field_name(self)
    }
}

impl FieldRef for Measure {
    fn field_name(&self) -> &str {
        Measure::field_name(*self)
    }
}

impl FieldRef for &str {
    fn field_name(&self) -> &str {
        self
    }
}

impl FieldRef for String {
    fn field_name(&self) -> &str {
        self.as_str()
    }
}

/// Fold a user-facing name (`ageGroup`, `Age_Group`, `age group`) to a lookup key.
pub(crate) fn fold_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
