//! Semantic Dimension Definition
//!
//! Typed selectors for the categorical fields that records are filtered and grouped by.

use super::fold_name;
use crate::record::fields;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimension selector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Date,
    Month,
    Year,
    CustomerAge,
    AgeGroup,
    Gender,
    Country,
    State,
    ProductCategory,
    /// Any other field, by its exact name
    Field(String),
}

impl Dimension {
    pub fn field_name(&self) -> &str {
        match self {
            Dimension::Date => fields::DATE,
            Dimension::Month => fields::MONTH,
            Dimension::Year => fields::YEAR,
            Dimension::CustomerAge => fields::CUSTOMER_AGE,
            Dimension::AgeGroup => fields::AGE_GROUP,
            Dimension::Gender => fields::CUSTOMER_GENDER,
            Dimension::Country => fields::COUNTRY,
            Dimension::State => fields::STATE,
            Dimension::ProductCategory => fields::PRODUCT_CATEGORY,
            Dimension::Field(name) => name,
        }
    }

    /// Resolve a canonical field name or a UI alias (`country`, `ageGroup`,
    /// `gender`, ...). Unknown names become `Dimension::Field`.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        match fold_name(trimmed).as_str() {
            "date" => Dimension::Date,
            "month" => Dimension::Month,
            "year" => Dimension::Year,
            "customerage" | "age" => Dimension::CustomerAge,
            "agegroup" => Dimension::AgeGroup,
            "customergender" | "gender" => Dimension::Gender,
            "country" => Dimension::Country,
            "state" => Dimension::State,
            "productcategory" | "category" => Dimension::ProductCategory,
            _ => Dimension::Field(trimmed.to_string()),
        }
    }

    /// Dimensions offered as filter controls.
    pub fn filterable() -> Vec<Dimension> {
        vec![
            Dimension::Country,
            Dimension::AgeGroup,
            Dimension::Gender,
            Dimension::State,
            Dimension::ProductCategory,
            Dimension::Month,
            Dimension::Year,
        ]
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_canonical_fields() {
        assert_eq!(Dimension::from_name("ageGroup"), Dimension::AgeGroup);
        assert_eq!(Dimension::from_name("Age_Group"), Dimension::AgeGroup);
        assert_eq!(Dimension::from_name("gender").field_name(), "Customer_Gender");
        assert_eq!(Dimension::from_name(" Country "), Dimension::Country);
    }

    #[test]
    fn test_unknown_name_is_raw_field() {
        let dim = Dimension::from_name("Sales_Channel");
        assert_eq!(dim, Dimension::Field("Sales_Channel".to_string()));
        assert_eq!(dim.field_name(), "Sales_Channel");
    }
}
