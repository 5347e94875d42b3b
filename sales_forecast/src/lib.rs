//! # Sales Forecast
//!
//! Monthly unit-sales forecasting from a retail transaction log.
//!
//! ## Pipeline
//!
//! - Load a transaction CSV (uploaded file or bundled sample)
//! - Label-encode product name and category
//! - Fit a gradient-boosted tree regressor on daily units sold
//! - Synthesize one feature row per product and future day
//! - Predict, round and sum by product and month
//! - Outer-join against recent actual sales and present the result
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_forecast::{DataLoader, ForecastConfig, ForecastPipeline};
//! use sales_forecast::horizon::ForecastHorizon;
//!
//! let data = DataLoader::from_csv("data/supermarket_sales_data.csv")?;
//!
//! let config = ForecastConfig {
//!     horizon: ForecastHorizon::ThreeMonths,
//!     seed: Some(7),
//!     ..ForecastConfig::default()
//! };
//! let report = ForecastPipeline::new(config)?.run(data)?;
//!
//! for row in report.comparison.rows() {
//!     println!("{} {} {}", row.product_name, row.month, row.predicted_sales);
//! }
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod data;
pub mod encoding;
pub mod error;
pub mod features;
pub mod generator;
pub mod horizon;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use crate::aggregate::{ComparisonRow, MonthlyComparison};
pub use crate::config::ForecastConfig;
pub use crate::data::{DataLoader, SalesData, TransactionRecord};
pub use crate::error::ForecastError;
pub use crate::models::{SalesModel, TrainedSalesModel};
pub use crate::pipeline::{ForecastPipeline, ForecastReport, PipelineContext};

// Version information, logged by the binary at startup
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
