//! Label encoding of nominal columns

use crate::data::{columns, SalesData};
use crate::error::{ForecastError, Result};
use std::collections::BTreeMap;

/// Bijective map from category value to a dense code `0..n`
///
/// Codes follow the sorted order of the distinct values seen while fitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    column: String,
    codes: BTreeMap<String, u32>,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit an encoder over every value of a column
    pub fn fit<I, S>(column: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes: BTreeMap<String, u32> = values
            .into_iter()
            .map(|v| (v.as_ref().to_string(), 0))
            .collect();
        if codes.is_empty() {
            return Err(ForecastError::DataError(format!(
                "Cannot fit an encoder for {} without values",
                column
            )));
        }

        let mut classes = Vec::with_capacity(codes.len());
        for (code, (value, slot)) in codes.iter_mut().enumerate() {
            *slot = code as u32;
            classes.push(value.clone());
        }

        Ok(Self {
            column: column.to_string(),
            codes,
            classes,
        })
    }

    /// Code of a value seen during fitting
    pub fn transform(&self, value: &str) -> Result<u32> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| ForecastError::UnseenCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    /// Value behind a code
    pub fn inverse_transform(&self, code: u32) -> Result<&str> {
        self.classes
            .get(code as usize)
            .map(String::as_str)
            .ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "code {} is out of range for {}",
                    code, self.column
                ))
            })
    }

    /// Distinct values in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// The two encoders fitted once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEncoders {
    pub product: LabelEncoder,
    pub category: LabelEncoder,
}

impl CategoryEncoders {
    /// Fit both encoders over the full history
    pub fn fit(data: &SalesData) -> Result<Self> {
        let records = data.records();
        Ok(Self {
            product: LabelEncoder::fit(
                columns::PRODUCT_NAME,
                records.iter().map(|r| r.product_name.as_str()),
            )?,
            category: LabelEncoder::fit(
                columns::PRODUCT_CATEGORY,
                records.iter().map(|r| r.product_category.as_str()),
            )?,
        })
    }
}
