//! Model feature schema

use crate::calendar::{CalendarFeatures, HolidayCalendar};
use crate::data::{SalesData, TransactionRecord};
use crate::encoding::CategoryEncoders;
use crate::error::Result;
use boost_math::FeatureMatrix;
use serde::Serialize;

/// Number of model inputs
pub const NUM_FEATURES: usize = 8;

/// Column order of the feature vector
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "Price_per_Unit",
    "Discount_%",
    "Stock_Available",
    "DayOfWeek",
    "Is_Weekend",
    "Is_Holiday",
    "Product_Name_enc",
    "Product_Category_enc",
];

/// One model input vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRow {
    pub price_per_unit: f64,
    pub discount_pct: f64,
    pub stock_available: f64,
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub product_code: u32,
    pub category_code: u32,
}

impl FeatureRow {
    /// Features of a historical record; calendar columns from the file win over derived ones
    pub fn from_record(
        record: &TransactionRecord,
        encoders: &CategoryEncoders,
        holidays: &HolidayCalendar,
    ) -> Result<Self> {
        let calendar = record
            .calendar
            .unwrap_or_else(|| CalendarFeatures::for_date(record.date, holidays));

        Ok(Self {
            price_per_unit: record.price_per_unit,
            discount_pct: record.discount_pct,
            stock_available: record.stock_available,
            day_of_week: calendar.day_of_week,
            is_weekend: calendar.is_weekend,
            is_holiday: calendar.is_holiday,
            product_code: encoders.product.transform(&record.product_name)?,
            category_code: encoders.category.transform(&record.product_category)?,
        })
    }

    pub fn to_array(&self) -> [f64; NUM_FEATURES] {
        [
            self.price_per_unit,
            self.discount_pct,
            self.stock_available,
            self.day_of_week as f64,
            f64::from(u8::from(self.is_weekend)),
            f64::from(u8::from(self.is_holiday)),
            self.product_code as f64,
            self.category_code as f64,
        ]
    }
}

/// Stack feature rows into a matrix; at least one row is required
pub fn to_matrix(rows: &[FeatureRow]) -> Result<FeatureMatrix> {
    let arrays: Vec<[f64; NUM_FEATURES]> = rows.iter().map(FeatureRow::to_array).collect();
    Ok(FeatureMatrix::from_rows(&arrays)?)
}

/// Feature rows and `Units_Sold` targets for every historical record
pub fn training_set(
    data: &SalesData,
    encoders: &CategoryEncoders,
    holidays: &HolidayCalendar,
) -> Result<(Vec<FeatureRow>, Vec<f64>)> {
    let rows = data
        .records()
        .iter()
        .map(|r| FeatureRow::from_record(r, encoders, holidays))
        .collect::<Result<Vec<_>>>()?;
    let targets = data.records().iter().map(|r| r.units_sold).collect();
    Ok((rows, targets))
}
