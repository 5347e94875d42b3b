//! Synthetic future feature rows
//!
//! For each product and each day of the forecast window a feature row is
//! fabricated from the product's last known record plus random draws of
//! discount and stock.

use crate::calendar::{CalendarFeatures, HolidayCalendar};
use crate::data::{SalesData, TransactionRecord};
use crate::encoding::CategoryEncoders;
use crate::error::{ForecastError, Result};
use crate::features::FeatureRow;
use crate::horizon::ForecastWindow;
use crate::utils::round_to;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What to do when a product's base price cannot be reconstructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricePolicy {
    /// Fail the whole run
    #[default]
    Abort,
    /// Leave the product out of the forecast
    SkipProduct,
}

/// Distributions the random features are drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Discount percentages drawn uniformly
    pub discount_choices: Vec<f64>,
    /// Inclusive lower bound of stock
    pub stock_min: u32,
    /// Exclusive upper bound of stock
    pub stock_max: u32,
    pub price_policy: PricePolicy,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            discount_choices: vec![0.0, 5.0, 10.0, 15.0],
            stock_min: 20,
            stock_max: 100,
            price_policy: PricePolicy::Abort,
        }
    }
}

impl SamplingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.discount_choices.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "discount_choices must not be empty".to_string(),
            ));
        }
        if let Some(bad) = self
            .discount_choices
            .iter()
            .find(|d| !(0.0..100.0).contains(*d))
        {
            return Err(ForecastError::InvalidParameter(format!(
                "discount choice {} is outside [0, 100)",
                bad
            )));
        }
        if self.stock_min >= self.stock_max {
            return Err(ForecastError::InvalidParameter(format!(
                "stock range [{}, {}) is empty",
                self.stock_min, self.stock_max
            )));
        }
        Ok(())
    }
}

/// A fabricated input row for one product on one future day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticRow {
    pub date: NaiveDate,
    pub product_name: String,
    pub features: FeatureRow,
}

/// Rows produced for a window, plus any products left out
#[derive(Debug, Clone, Default)]
pub struct GeneratedFeatures {
    pub rows: Vec<SyntheticRow>,
    pub skipped_products: Vec<String>,
}

/// Draws synthetic feature rows from a random source
#[derive(Debug, Clone)]
pub struct FeatureGenerator<R: Rng> {
    rng: R,
    sampling: SamplingConfig,
}

impl FeatureGenerator<StdRng> {
    /// Reproducible with a seed, entropy-seeded otherwise
    pub fn seeded(sampling: SamplingConfig, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(sampling, rng)
    }
}

impl<R: Rng> FeatureGenerator<R> {
    pub fn with_rng(sampling: SamplingConfig, rng: R) -> Result<Self> {
        sampling.validate()?;
        Ok(Self { rng, sampling })
    }

    /// One row per (product, day); products in order of first appearance
    pub fn generate(
        &mut self,
        data: &SalesData,
        encoders: &CategoryEncoders,
        window: &ForecastWindow,
        holidays: &HolidayCalendar,
    ) -> Result<GeneratedFeatures> {
        let mut generated = GeneratedFeatures {
            rows: Vec::with_capacity(data.products().len() * window.num_days()),
            skipped_products: Vec::new(),
        };

        for product in data.products() {
            let last = data.last_record_for(product).ok_or_else(|| {
                ForecastError::DataError(format!("no records for product '{}'", product))
            })?;

            let base_price = match base_price(last) {
                Ok(price) => price,
                Err(err) if self.sampling.price_policy == PricePolicy::SkipProduct => {
                    warn!(product, error = %err, "skipping product");
                    generated.skipped_products.push(product.to_string());
                    continue;
                }
                Err(err) => return Err(err),
            };

            let product_code = encoders.product.transform(product)?;
            let category_code = encoders.category.transform(&last.product_category)?;
            debug!(product, base_price, product_code, category_code, "generating rows");

            for date in window.days() {
                let calendar = CalendarFeatures::for_date(date, holidays);
                let discount = self.draw_discount();
                let stock = self
                    .rng
                    .gen_range(self.sampling.stock_min..self.sampling.stock_max);

                generated.rows.push(SyntheticRow {
                    date,
                    product_name: product.to_string(),
                    features: FeatureRow {
                        price_per_unit: round_to(base_price * (1.0 - discount / 100.0), 2),
                        discount_pct: discount,
                        stock_available: f64::from(stock),
                        day_of_week: calendar.day_of_week,
                        is_weekend: calendar.is_weekend,
                        is_holiday: calendar.is_holiday,
                        product_code,
                        category_code,
                    },
                });
            }
        }

        Ok(generated)
    }

    fn draw_discount(&mut self) -> f64 {
        // validate() guarantees at least one choice
        self.sampling
            .discount_choices
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Undo the last observed discount: `price / (1 - discount/100)`
pub fn base_price(record: &TransactionRecord) -> Result<f64> {
    let remaining = 1.0 - record.discount_pct / 100.0;
    if remaining <= 0.0 {
        return Err(ForecastError::InvalidDiscount {
            product: record.product_name.clone(),
            discount: record.discount_pct,
        });
    }
    Ok(record.price_per_unit / remaining)
}
