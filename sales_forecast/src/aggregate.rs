//! Monthly aggregation of predicted and actual units

use crate::calendar::MonthKey;
use crate::data::SalesData;
use crate::error::{ForecastError, Result};
use crate::generator::SyntheticRow;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Units summed by (product, month)
pub type MonthlyTotals<T> = BTreeMap<(String, MonthKey), T>;

/// One line of the forecast summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    #[serde(rename = "Product_Name")]
    pub product_name: String,
    #[serde(rename = "Month")]
    pub month: MonthKey,
    #[serde(rename = "Predicted_Sales")]
    pub predicted_sales: u64,
    #[serde(rename = "Actual_Sales", serialize_with = "serialize_units")]
    pub actual_sales: f64,
}

/// Predicted and actual monthly totals, ordered by product then month
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyComparison {
    rows: Vec<ComparisonRow>,
}

/// Sum rounded predictions per (product, month)
pub fn monthly_predicted(rows: &[SyntheticRow], units: &[u64]) -> Result<MonthlyTotals<u64>> {
    if rows.len() != units.len() {
        return Err(ForecastError::DataError(format!(
            "{} synthetic rows but {} predictions",
            rows.len(),
            units.len()
        )));
    }

    let mut totals = MonthlyTotals::new();
    for (row, &predicted) in rows.iter().zip(units) {
        *totals
            .entry((row.product_name.clone(), MonthKey::of(row.date)))
            .or_insert(0) += predicted;
    }
    Ok(totals)
}

/// Sum `Units_Sold` per (product, month) for rows dated after `cutoff`
pub fn monthly_actual(data: &SalesData, cutoff: NaiveDate) -> MonthlyTotals<f64> {
    let mut totals = MonthlyTotals::new();
    for record in data.after(cutoff) {
        *totals
            .entry((record.product_name.clone(), MonthKey::of(record.date)))
            .or_insert(0.0) += record.units_sold;
    }
    totals
}

impl MonthlyComparison {
    /// Full outer join on (product, month); a missing side counts as zero
    pub fn merge(predicted: &MonthlyTotals<u64>, actual: &MonthlyTotals<f64>) -> Self {
        let keys: BTreeSet<&(String, MonthKey)> = predicted.keys().chain(actual.keys()).collect();

        let rows = keys
            .into_iter()
            .map(|key| ComparisonRow {
                product_name: key.0.clone(),
                month: key.1,
                predicted_sales: predicted.get(key).copied().unwrap_or(0),
                actual_sales: actual.get(key).copied().unwrap_or(0.0),
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct products, sorted
    pub fn products(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.rows.iter().map(|r| r.product_name.as_str()).collect();
        set.into_iter().collect()
    }

    /// Distinct months, sorted
    pub fn months(&self) -> Vec<MonthKey> {
        let set: BTreeSet<MonthKey> = self.rows.iter().map(|r| r.month).collect();
        set.into_iter().collect()
    }

    /// Rows of one product
    pub fn for_product<'a>(&'a self, product: &'a str) -> impl Iterator<Item = &'a ComparisonRow> {
        self.rows.iter().filter(move |r| r.product_name == product)
    }

    pub fn total_predicted(&self) -> u64 {
        self.rows.iter().map(|r| r.predicted_sales).sum()
    }

    pub fn total_actual(&self) -> f64 {
        self.rows.iter().map(|r| r.actual_sales).sum()
    }
}

/// Whole unit counts print without a fractional part
pub(crate) fn serialize_units<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
