//! Aggregation Engine - Group-by summaries and whole-set KPIs
//!
//! Everything here is recomputed from the input on each call. Absent or
//! non-numeric measures contribute `0`; ratios over an empty denominator are `0`.

use crate::record::{fields, Record, RecordSet, Value, ValueKey};
use crate::semantic::{Dimension, Measure};
use chrono::Month;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Tuple of dimension values identifying a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(pub Vec<Value>);

impl GroupKey {
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn first(&self) -> Option<&Value> {
        self.0.first()
    }

    /// Display label, components joined with ` / `.
    pub fn label(&self) -> String {
        self.0
            .iter()
            .map(|v| if v.is_null() { "(blank)".to_string() } else { v.to_string() })
            .join(" / ")
    }
}

/// Per-group summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub key: GroupKey,
    pub count: u64,
    pub revenue: f64,
    pub profit: f64,
    pub cost: f64,
    pub quantity: f64,
}

impl Aggregate {
    fn empty(key: GroupKey) -> Self {
        Self {
            key,
            count: 0,
            revenue: 0.0,
            profit: 0.0,
            cost: 0.0,
            quantity: 0.0,
        }
    }

    fn add(&mut self, record: &Record) {
        self.count += 1;
        accumulate(&mut self.revenue, record.measure(Measure::Revenue));
        accumulate(&mut self.profit, record.measure(Measure::Profit));
        accumulate(&mut self.cost, record.measure(Measure::Cost));
        accumulate(&mut self.quantity, record.measure(Measure::OrderQuantity));
    }

    /// Revenue per order in this group.
    pub fn avg_revenue(&self) -> f64 {
        ratio(self.revenue, self.count as f64)
    }

    /// Profit as a percentage of revenue.
    pub fn profit_margin(&self) -> f64 {
        100.0 * ratio(self.profit, self.revenue)
    }
}

fn accumulate(acc: &mut f64, value: Option<f64>) {
    if let Some(v) = value.filter(|v| v.is_finite()) {
        *acc += v;
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Partition by one dimension, groups in first-encountered order.
/// Records missing the field share a `Null` group.
pub fn group_by(records: &RecordSet, dimension: &Dimension) -> Vec<Aggregate> {
    group_by_many(records, std::slice::from_ref(dimension))
}

/// Partition by a composite key of several dimensions.
pub fn group_by_many(records: &RecordSet, dimensions: &[Dimension]) -> Vec<Aggregate> {
    let mut groups: IndexMap<Vec<ValueKey>, Aggregate> = IndexMap::new();

    for record in records {
        let values: Vec<Value> = dimensions
            .iter()
            .map(|d| record.dimension(d).clone())
            .collect();
        let key: Vec<ValueKey> = values.iter().map(Value::key).collect();

        groups
            .entry(key)
            .or_insert_with(|| Aggregate::empty(GroupKey(values)))
            .add(record);
    }

    groups.into_values().collect()
}

/// Order groups by descending revenue and keep the first `n`.
/// Equal revenues keep their first-encountered order.
pub fn rank_by_revenue(mut groups: Vec<Aggregate>, n: usize) -> Vec<Aggregate> {
    groups.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    groups.truncate(n);
    groups
}

pub fn top_by_revenue(records: &RecordSet, dimension: &Dimension, n: usize) -> Vec<Aggregate> {
    rank_by_revenue(group_by(records, dimension), n)
}

/// Revenue, profit and orders per (`Year`, `Month`), in calendar order.
///
/// Groups whose month cannot be read as a calendar month come last, in
/// first-encountered order.
pub fn monthly_trend(records: &RecordSet) -> Vec<Aggregate> {
    group_by_many(records, &[Dimension::Year, Dimension::Month])
        .into_iter()
        .sorted_by(|a, b| compare_periods(period_of(&a.key), period_of(&b.key)))
        .collect()
}

fn period_of(key: &GroupKey) -> Option<(f64, u32)> {
    let values = key.values();
    let month = values.get(1).and_then(month_number)?;
    let year = values
        .first()
        .and_then(|v| match v {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .unwrap_or(f64::NEG_INFINITY);
    Some((year, month))
}

fn compare_periods(a: Option<(f64, u32)>, b: Option<(f64, u32)>) -> Ordering {
    match (a, b) {
        (Some((ya, ma)), Some((yb, mb))) => ya.total_cmp(&yb).then(ma.cmp(&mb)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Calendar month number (1-12) from `December`, `Dec`, `12` or `12.0`.
pub fn month_number(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) if n.fract() == 0.0 => *n as i64,
        Value::Text(s) => match s.trim().parse::<Month>() {
            Ok(month) => return Some(month.number_from_month()),
            Err(_) => s.trim().parse::<i64>().ok()?,
        },
        _ => return None,
    };
    (1..=12).contains(&n).then_some(n as u32)
}

/// Whole-set summary statistics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub total_cost: f64,
    pub total_quantity: f64,
    pub total_orders: u64,
    /// Revenue per order; `0` with no orders
    pub avg_order_value: f64,
    /// Profit as a percentage of revenue; `0` with no revenue
    pub profit_margin: f64,
    /// Distinct (age, gender, country) tuples. A proxy, not a customer ID.
    pub total_customers: u64,
    /// Units per order; `0` with no orders
    pub avg_quantity: f64,
}

pub fn kpis(records: &RecordSet) -> Kpis {
    let mut totals = Aggregate::empty(GroupKey(Vec::new()));
    let mut customers: IndexSet<(ValueKey, ValueKey, ValueKey)> = IndexSet::new();

    for record in records {
        totals.add(record);
        customers.insert((
            record.value(fields::CUSTOMER_AGE).key(),
            record.value(fields::CUSTOMER_GENDER).key(),
            record.value(fields::COUNTRY).key(),
        ));
    }

    let orders = totals.count as f64;
    Kpis {
        total_revenue: totals.revenue,
        total_profit: totals.profit,
        total_cost: totals.cost,
        total_quantity: totals.quantity,
        total_orders: totals.count,
        avg_order_value: ratio(totals.revenue, orders),
        profit_margin: 100.0 * ratio(totals.profit, totals.revenue),
        total_customers: customers.len() as u64,
        avg_quantity: ratio(totals.quantity, orders),
    }
}
