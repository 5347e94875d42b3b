//! Sales transaction data handling

use crate::calendar::CalendarFeatures;
use crate::error::{ForecastError, Result};
use crate::utils::parse_date;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Input column names
pub mod columns {
    pub const DATE: &str = "Date";
    pub const PRODUCT_NAME: &str = "Product_Name";
    pub const PRODUCT_CATEGORY: &str = "Product_Category";
    pub const PRICE_PER_UNIT: &str = "Price_per_Unit";
    pub const DISCOUNT_PCT: &str = "Discount_%";
    pub const STOCK_AVAILABLE: &str = "Stock_Available";
    pub const UNITS_SOLD: &str = "Units_Sold";
    pub const DAY_OF_WEEK: &str = "DayOfWeek";
    pub const IS_WEEKEND: &str = "Is_Weekend";
    pub const IS_HOLIDAY: &str = "Is_Holiday";

    /// Columns every input file must carry
    pub const REQUIRED: [&str; 7] = [
        DATE,
        PRODUCT_NAME,
        PRODUCT_CATEGORY,
        PRICE_PER_UNIT,
        DISCOUNT_PCT,
        STOCK_AVAILABLE,
        UNITS_SOLD,
    ];
}

/// One historical sale event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub product_name: String,
    pub product_category: String,
    pub price_per_unit: f64,
    /// Discount in percent, 0..100
    pub discount_pct: f64,
    pub stock_available: f64,
    pub units_sold: f64,
    /// Calendar columns carried by the file, if it has them
    pub calendar: Option<CalendarFeatures>,
}

/// Historical sales, in file order
#[derive(Debug, Clone)]
pub struct SalesData {
    records: Vec<TransactionRecord>,
}

/// Loader for sales transaction files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load the uploaded file when one is given, the bundled default otherwise
    pub fn load(upload: Option<&Path>, default_path: &Path) -> Result<SalesData> {
        match upload {
            Some(path) => {
                info!(path = %path.display(), "loading uploaded sales file");
                Self::from_csv(path)
            }
            None => {
                info!(path = %default_path.display(), "no file uploaded, using sample data");
                Self::from_csv(default_path)
            }
        }
    }

    /// Load sales data from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesData> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Load sales data from an in-memory CSV upload
    pub fn from_bytes(bytes: Vec<u8>) -> Result<SalesData> {
        let df = CsvReader::new(Cursor::new(bytes))
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df)
    }

    /// Convert an existing DataFrame into typed records
    pub fn from_dataframe(df: DataFrame) -> Result<SalesData> {
        for name in columns::REQUIRED {
            if df.column(name).is_err() {
                return Err(ForecastError::MissingColumn(name.to_string()));
            }
        }

        let dates = column_as_strings(&df, columns::DATE)?
            .iter()
            .enumerate()
            .map(|(row, raw)| {
                parse_date(raw).map_err(|e| {
                    ForecastError::ParseError(format!("row {}: {}", row + 1, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let names = column_as_strings(&df, columns::PRODUCT_NAME)?;
        let categories = column_as_strings(&df, columns::PRODUCT_CATEGORY)?;
        let prices = column_as_f64(&df, columns::PRICE_PER_UNIT)?;
        let discounts = column_as_f64(&df, columns::DISCOUNT_PCT)?;
        let stock = column_as_f64(&df, columns::STOCK_AVAILABLE)?;
        let units = column_as_f64(&df, columns::UNITS_SOLD)?;
        let calendar = calendar_columns(&df)?;

        let records = (0..df.height())
            .map(|i| TransactionRecord {
                date: dates[i],
                product_name: names[i].clone(),
                product_category: categories[i].clone(),
                price_per_unit: prices[i],
                discount_pct: discounts[i],
                stock_available: stock[i],
                units_sold: units[i],
                calendar: calendar.as_ref().map(|c| c[i]),
            })
            .collect();

        let data = SalesData::new(records)?;
        debug!(
            rows = data.len(),
            products = data.products().len(),
            has_calendar = calendar.is_some(),
            "parsed sales data"
        );
        Ok(data)
    }
}

impl SalesData {
    /// Wrap records; at least one record is required
    pub fn new(records: Vec<TransactionRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(ForecastError::DataError(
                "Sales data contains no rows".to_string(),
            ));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent sale date
    pub fn latest_date(&self) -> NaiveDate {
        self.records
            .iter()
            .map(|r| r.date)
            .max()
            .unwrap_or(NaiveDate::MIN)
    }

    /// Earliest sale date
    pub fn earliest_date(&self) -> NaiveDate {
        self.records
            .iter()
            .map(|r| r.date)
            .min()
            .unwrap_or(NaiveDate::MIN)
    }

    /// Distinct product names in order of first appearance
    pub fn products(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .map(|r| r.product_name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// The product's last row in file order
    pub fn last_record_for(&self, product: &str) -> Option<&TransactionRecord> {
        self.records.iter().rev().find(|r| r.product_name == product)
    }

    /// Records dated strictly after `cutoff`
    pub fn after(&self, cutoff: NaiveDate) -> impl Iterator<Item = &TransactionRecord> {
        self.records.iter().filter(move |r| r.date > cutoff)
    }
}

fn null_cell(column: &str, row: usize) -> ForecastError {
    ForecastError::DataError(format!(
        "Column '{}' has a missing or invalid value at row {}",
        column,
        row + 1
    ))
}

fn column_as_strings(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = df
        .column(name)
        .map_err(|_| ForecastError::MissingColumn(name.to_string()))?
        .cast(&DataType::Utf8)?;

    series
        .utf8()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .map(str::to_string)
                .ok_or_else(|| null_cell(name, row))
        })
        .collect()
}

fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)
        .map_err(|_| ForecastError::MissingColumn(name.to_string()))?
        .cast(&DataType::Float64)?;

    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .filter(|v| v.is_finite())
                .ok_or_else(|| null_cell(name, row))
        })
        .collect()
}

fn column_as_flags(df: &DataFrame, name: &str) -> Result<Vec<bool>> {
    column_as_strings(df, name)?
        .iter()
        .enumerate()
        .map(|(row, raw)| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "1.0" | "true" => Ok(true),
            "0" | "0.0" | "false" => Ok(false),
            _ => Err(null_cell(name, row)),
        })
        .collect()
}

/// Read `DayOfWeek`, `Is_Weekend` and `Is_Holiday` when all three are present
fn calendar_columns(df: &DataFrame) -> Result<Option<Vec<CalendarFeatures>>> {
    let present = [columns::DAY_OF_WEEK, columns::IS_WEEKEND, columns::IS_HOLIDAY]
        .iter()
        .all(|name| df.column(name).is_ok());
    if !present {
        return Ok(None);
    }

    let days = column_as_f64(df, columns::DAY_OF_WEEK)?;
    let weekends = column_as_flags(df, columns::IS_WEEKEND)?;
    let holidays = column_as_flags(df, columns::IS_HOLIDAY)?;

    days.iter()
        .zip(weekends.iter().zip(&holidays))
        .enumerate()
        .map(|(row, (&day, (&is_weekend, &is_holiday)))| {
            if !(0.0..=6.0).contains(&day) || day.fract() != 0.0 {
                return Err(null_cell(columns::DAY_OF_WEEK, row));
            }
            Ok(CalendarFeatures {
                day_of_week: day as u32,
                is_weekend,
                is_holiday,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}
