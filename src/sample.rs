//! Built-in demo data
//!
//! A handful of bike sales used before any file is loaded.

use crate::record::{fields, Record, RecordSet, Value};

pub const SAMPLE_SOURCE: &str = "Sample Bike Sales Data";

// (age, age group, gender, country, state, quantity, profit, cost, revenue)
const SAMPLE_ROWS: [(i32, &str, &str, &str, &str, i32, i32, i32, i32); 5] = [
    (39, "Adults (35-64)", "F", "United States", "California", 4, 3988, 5008, 8996),
    (42, "Adults (35-64)", "M", "United States", "Washington", 3, 232, 1032, 1264),
    (36, "Adults (35-64)", "F", "Germany", "Brandenburg", 2, 792, 1426, 2218),
    (20, "Youth (<25)", "M", "Germany", "Hamburg", 1, 717, 1555, 2272),
    (23, "Youth (<25)", "M", "United Kingdom", "England", 1, 1264, 2171, 3435),
];

/// Five December 2021 bike orders across three countries.
pub fn sample_bike_sales() -> RecordSet {
    SAMPLE_ROWS
        .iter()
        .map(
            |&(age, age_group, gender, country, state, quantity, profit, cost, revenue)| {
                Record::from_pairs([
                    (fields::DATE, Value::from("12/1/2021")),
                    (fields::MONTH, Value::from("December")),
                    (fields::YEAR, Value::from(2021)),
                    (fields::CUSTOMER_AGE, Value::from(age)),
                    (fields::AGE_GROUP, Value::from(age_group)),
                    (fields::CUSTOMER_GENDER, Value::from(gender)),
                    (fields::COUNTRY, Value::from(country)),
                    (fields::STATE, Value::from(state)),
                    (fields::PRODUCT_CATEGORY, Value::from("Bikes")),
                    (fields::ORDER_QUANTITY, Value::from(quantity)),
                    (fields::PROFIT, Value::from(profit)),
                    (fields::COST, Value::from(cost)),
                    (fields::REVENUE, Value::from(revenue)),
                ])
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_consistent() {
        let sample = sample_bike_sales();
        assert_eq!(sample.len(), 5);
        for record in &sample {
            let profit = record.profit().unwrap_or_default();
            let cost = record.cost().unwrap_or_default();
            assert_eq!(record.revenue(), Some(profit + cost));
        }
    }
}
