//! # Boost Math
//!
//! Numerical building blocks for tabular regression.
//! This crate provides a dense row-major feature matrix, a second-order
//! regression tree learner and a gradient-boosted ensemble built on top of it.

use thiserror::Error;

pub mod boosting;
pub mod matrix;
pub mod tree;

pub use boosting::{FittedGradientBoosting, GradientBoostingRegressor};
pub use matrix::FeatureMatrix;
pub use tree::{Node, RegressionTree, TreeParams};

/// Errors that can occur while fitting or evaluating models
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for boosting math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Arithmetic mean of a slice, `None` when empty
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
