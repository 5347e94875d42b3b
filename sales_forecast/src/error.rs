//! Error types for the sales_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// A required input column is absent
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    /// A value could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A category value that was never seen while fitting an encoder
    #[error("Unseen category '{value}' for {column}")]
    UnseenCategory { column: String, value: String },

    /// The last observed discount cannot be inverted into a base price
    #[error("Invalid discount {discount}% for product '{product}': base price is undefined")]
    InvalidDiscount { product: String, discount: f64 },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from configuration loading
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error from model fitting or evaluation
    #[error("Model error: {0}")]
    ModelError(#[from] boost_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV writing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<chrono::ParseError> for ForecastError {
    fn from(err: chrono::ParseError) -> Self {
        ForecastError::ParseError(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::DataError(err.to_string())
    }
}
