//! Semantic Measure Definition
//!
//! Numeric fields subject to aggregation and range filtering.

use super::fold_name;
use crate::record::fields;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measure {
    Revenue,
    Profit,
    Cost,
    OrderQuantity,
    CustomerAge,
}

impl Measure {
    pub fn field_name(self) -> &'static str {
        match self {
            Measure::Revenue => fields::REVENUE,
            Measure::Profit => fields::PROFIT,
            Measure::Cost => fields::COST,
            Measure::OrderQuantity => fields::ORDER_QUANTITY,
            Measure::CustomerAge => fields::CUSTOMER_AGE,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match fold_name(name).as_str() {
            "revenue" => Some(Measure::Revenue),
            "profit" => Some(Measure::Profit),
            "cost" => Some(Measure::Cost),
            "orderquantity" | "quantity" => Some(Measure::OrderQuantity),
            "customerage" | "age" => Some(Measure::CustomerAge),
            _ => None,
        }
    }

    pub fn all() -> [Measure; 5] {
        [
            Measure::Revenue,
            Measure::Profit,
            Measure::Cost,
            Measure::OrderQuantity,
            Measure::CustomerAge,
        ]
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}
