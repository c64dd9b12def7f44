//! Filter Engine Tests

use sales_pipeline::filter::{self, Constraint};
use sales_pipeline::{Dimension, FilterSpec, Measure, PipelineError, Record, RecordSet, Value};
use serde_json::json;

fn sample() -> RecordSet {
    vec![
        Record::from_pairs([
            ("Date", Value::from("11/26/2021")),
            ("Country", Value::from("US")),
            ("Customer_Gender", Value::from("F")),
            ("Revenue", Value::from(100)),
            ("Profit", Value::from(10)),
        ]),
        Record::from_pairs([
            ("Date", Value::from("12/1/2021")),
            ("Country", Value::from("US")),
            ("Customer_Gender", Value::from("M")),
            ("Revenue", Value::from(50)),
            ("Profit", Value::from(5)),
        ]),
        Record::from_pairs([
            ("Date", Value::from("2021-12-15")),
            ("Country", Value::from("DE")),
            ("Customer_Gender", Value::from("F")),
            ("Revenue", Value::from(200)),
            ("Profit", Value::from(40)),
        ]),
    ]
    .into()
}

fn revenues(records: &RecordSet) -> Vec<f64> {
    records.iter().filter_map(Record::revenue).collect()
}

#[test]
fn test_unconstrained_filter_is_identity() {
    let records = sample();
    let spec = FilterSpec::new()
        .select(Dimension::Country, "all")
        .unwrap()
        .select(Dimension::Gender, Value::Null)
        .unwrap();

    assert!(spec.is_unconstrained());
    assert_eq!(filter::apply(&records, &spec), records);
    assert_eq!(filter::apply(&records, &FilterSpec::new()), records);
}

#[test]
fn test_exact_match_keeps_order() {
    let records = sample();
    let spec = FilterSpec::new().equals(Dimension::Country, "US").unwrap();

    let filtered = filter::apply(&records, &spec);
    assert_eq!(revenues(&filtered), vec![100.0, 50.0]);
}

#[test]
fn test_constraints_are_conjunctive() {
    let records = sample();
    let spec = FilterSpec::new()
        .equals(Dimension::Country, "US")
        .unwrap()
        .equals(Dimension::Gender, "F")
        .unwrap();

    let filtered = filter::apply(&records, &spec);
    assert_eq!(revenues(&filtered), vec![100.0]);
}

#[test]
fn test_revenue_range_from_ui_state() {
    let records = sample();
    let spec = FilterSpec::from_json(&json!({ "revenueRange": { "min": "100" } })).unwrap();

    let filtered = filter::apply(&records, &spec);
    assert_eq!(revenues(&filtered), vec![100.0, 200.0]);
}

#[test]
fn test_range_bounds_are_inclusive() {
    let records = sample();
    let spec = FilterSpec::new()
        .range(Measure::Revenue, 50, 100)
        .unwrap();

    assert_eq!(revenues(&filter::apply(&records, &spec)), vec![100.0, 50.0]);
}

#[test]
fn test_range_excludes_missing_and_text_values() {
    let records: RecordSet = vec![
        Record::from_pairs([("Revenue", Value::from(10))]),
        Record::from_pairs([("Country", Value::from("US"))]),
        Record::from_pairs([("Revenue", Value::from("ten"))]),
    ]
    .into();
    let spec = FilterSpec::new().range(Measure::Revenue, 0, Value::Null).unwrap();

    assert_eq!(filter::apply(&records, &spec).len(), 1);
}

#[test]
fn test_exact_match_on_missing_field_excludes() {
    let records: RecordSet = vec![
        Record::from_pairs([("Country", "US")]),
        Record::from_pairs([("State", "Bavaria")]),
    ]
    .into();
    let spec = FilterSpec::new().equals(Dimension::Country, "US").unwrap();

    assert_eq!(filter::apply(&records, &spec).len(), 1);
}

#[test]
fn test_numeric_selection_matches_numbers() {
    let records: RecordSet = vec![
        Record::from_pairs([("Year", 2021)]),
        Record::from_pairs([("Year", 2022)]),
    ]
    .into();
    let spec = FilterSpec::from_json(&json!({ "year": "2021" })).unwrap();

    let filtered = filter::apply(&records, &spec);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered.get(0).unwrap().year(), Some(2021.0));
}

#[test]
fn test_ui_aliases_resolve_to_fields() {
    let spec = FilterSpec::from_json(&json!({
        "country": "all",
        "gender": "F",
        "ageGroup": "Adults (35-64)",
        "category": "Bikes"
    }))
    .unwrap();

    assert_eq!(spec.constraint("Country"), Some(&Constraint::Any));
    assert_eq!(spec.constraint("Customer_Gender"), Some(&Constraint::equals("F")));
    assert_eq!(
        spec.constraint("Age_Group"),
        Some(&Constraint::equals("Adults (35-64)"))
    );
    assert_eq!(spec.constraint("Product_Category"), Some(&Constraint::equals("Bikes")));
}

#[test]
fn test_date_range_filter() {
    let records = sample();
    let spec = FilterSpec::from_json(&json!({
        "dateRange": { "from": "12/1/2021", "to": "2021-12-31" }
    }))
    .unwrap();

    assert_eq!(revenues(&filter::apply(&records, &spec)), vec![50.0, 200.0]);
}

#[test]
fn test_invalid_range_rejected() {
    let err = FilterSpec::from_json(&json!({ "revenueRange": { "min": "abc" } })).unwrap_err();
    assert!(matches!(err, PipelineError::FilterValidation(_)));

    let err = Constraint::range(Some(10.0), Some(1.0)).unwrap_err();
    assert!(matches!(err, PipelineError::FilterValidation(_)));

    let err = FilterSpec::from_json(&json!({ "revenueRange": 5 })).unwrap_err();
    assert!(matches!(err, PipelineError::FilterValidation(_)));

    let err = FilterSpec::from_json(&json!(["US"])).unwrap_err();
    assert!(matches!(err, PipelineError::FilterValidation(_)));
}

#[test]
fn test_filter_result_is_subsequence() {
    let records = sample();
    let spec = FilterSpec::new().equals(Dimension::Gender, "F").unwrap();
    let filtered = filter::apply(&records, &spec);

    let mut cursor = records.iter();
    for kept in &filtered {
        assert!(cursor.any(|r| r == kept));
    }
    assert!(filtered.iter().all(|r| spec.matches(r)));
}

#[test]
fn test_numeric_exact_match_rejects_non_numbers() {
    let err = FilterSpec::from_json(&json!({ "revenue": "abc" })).unwrap_err();
    assert!(matches!(err, PipelineError::FilterValidation(_)));

    let err = FilterSpec::from_json(&json!({ "Order_Quantity": true })).unwrap_err();
    assert!(matches!(err, PipelineError::FilterValidation(_)));

    let err = FilterSpec::new().equals(Measure::Profit, "lots").unwrap_err();
    assert!(matches!(err, PipelineError::FilterValidation(_)));

    // text dimensions still accept any value
    assert!(FilterSpec::from_json(&json!({ "country": "abc" })).is_ok());
}

#[test]
fn test_numeric_exact_match_reads_amounts_like_ranges() {
    let records: RecordSet = vec![
        Record::from_pairs([("Revenue", 1000)]),
        Record::from_pairs([("Revenue", 999)]),
    ]
    .into();

    let exact = FilterSpec::new().equals(Measure::Revenue, "$1,000").unwrap();
    let range = FilterSpec::new()
        .range(Measure::Revenue, "$1,000", "$1,000")
        .unwrap();
    let from_ui = FilterSpec::from_json(&json!({ "revenue": "1,000" })).unwrap();

    assert_eq!(revenues(&filter::apply(&records, &exact)), vec![1000.0]);
    assert_eq!(filter::apply(&records, &exact), filter::apply(&records, &range));
    assert_eq!(filter::apply(&records, &from_ui), filter::apply(&records, &range));
}
