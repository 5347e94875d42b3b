//! Gradient-boosted tree model

use crate::error::{ForecastError, Result};
use crate::features::{to_matrix, FeatureRow};
use crate::models::{SalesModel, TrainedSalesModel};
use boost_math::{FittedGradientBoosting, GradientBoostingRegressor, TreeParams};
use serde::{Deserialize, Serialize};

/// Hyperparameters of the boosted ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_child_weight: f64,
    pub lambda: f64,
    pub gamma: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let tree = TreeParams::default();
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: tree.max_depth,
            min_child_weight: tree.min_child_weight,
            lambda: tree.lambda,
            gamma: tree.gamma,
        }
    }
}

/// Gradient boosting regressor over the sales feature schema
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    /// Name of the model
    name: String,
    regressor: GradientBoostingRegressor,
}

/// Trained gradient boosting model
#[derive(Debug, Clone)]
pub struct TrainedGradientBoosting {
    /// Name of the model
    name: String,
    fitted: FittedGradientBoosting,
}

impl GradientBoosting {
    /// Create a new model from its hyperparameters
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let regressor = GradientBoostingRegressor::new(config.n_estimators, config.learning_rate)?
            .with_tree_params(TreeParams {
                max_depth: config.max_depth,
                min_child_weight: config.min_child_weight,
                lambda: config.lambda,
                gamma: config.gamma,
            })?;

        Ok(Self {
            name: format!(
                "Gradient Boosting (trees={}, learning_rate={})",
                config.n_estimators, config.learning_rate
            ),
            regressor,
        })
    }
}

impl SalesModel for GradientBoosting {
    type Trained = TrainedGradientBoosting;

    fn train(&self, rows: &[FeatureRow], targets: &[f64]) -> Result<Self::Trained> {
        if rows.is_empty() {
            return Err(ForecastError::DataError(
                "No training rows available".to_string(),
            ));
        }

        let x = to_matrix(rows)?;
        let fitted = self.regressor.fit(&x, targets)?;

        Ok(TrainedGradientBoosting {
            name: self.name.clone(),
            fitted,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSalesModel for TrainedGradientBoosting {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let x = to_matrix(rows)?;
        Ok(self.fitted.predict(&x)?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedGradientBoosting {
    /// Number of trees in the ensemble
    pub fn n_trees(&self) -> usize {
        self.fitted.trees().len()
    }
}
