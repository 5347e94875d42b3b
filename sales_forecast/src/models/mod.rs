//! Regression models for daily unit sales

use crate::error::Result;
use crate::features::FeatureRow;
use crate::utils::{forecast_accuracy, ForecastAccuracy};
use std::fmt::Debug;

/// Trained sales model
pub trait TrainedSalesModel: Debug {
    /// Predict daily units for each feature row
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;

    /// In-sample fit against known targets
    fn evaluate(&self, rows: &[FeatureRow], targets: &[f64]) -> Result<ForecastAccuracy> {
        let predicted = self.predict(rows)?;
        forecast_accuracy(&predicted, targets)
    }
}

/// Sales model that can be trained on historical feature rows
pub trait SalesModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedSalesModel;

    /// Train the model on feature rows and unit targets
    fn train(&self, rows: &[FeatureRow], targets: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod gradient_boosting;

pub use gradient_boosting::{GradientBoosting, ModelConfig, TrainedGradientBoosting};
