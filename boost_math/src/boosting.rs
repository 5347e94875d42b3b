//! Gradient-boosted regression trees with a squared-error objective

use crate::matrix::FeatureMatrix;
use crate::tree::{RegressionTree, TreeParams};
use crate::{mean, MathError, Result};
use serde::{Deserialize, Serialize};

/// Unfitted gradient boosting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingRegressor {
    n_estimators: usize,
    learning_rate: f64,
    tree_params: TreeParams,
}

/// Fitted ensemble: `base_score + learning_rate * Σ tree(x)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedGradientBoosting {
    base_score: f64,
    learning_rate: f64,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl GradientBoostingRegressor {
    /// Create a new regressor with the given number of trees and shrinkage
    pub fn new(n_estimators: usize, learning_rate: f64) -> Result<Self> {
        if n_estimators == 0 {
            return Err(MathError::InvalidInput(
                "Number of estimators must be greater than zero".to_string(),
            ));
        }
        if !(learning_rate > 0.0 && learning_rate <= 1.0) {
            return Err(MathError::InvalidInput(format!(
                "Learning rate must be in (0, 1], got {}",
                learning_rate
            )));
        }

        Ok(Self {
            n_estimators,
            learning_rate,
            tree_params: TreeParams::default(),
        })
    }

    /// Replace the per-tree growth parameters
    pub fn with_tree_params(mut self, tree_params: TreeParams) -> Result<Self> {
        tree_params.validate()?;
        self.tree_params = tree_params;
        Ok(self)
    }

    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn tree_params(&self) -> &TreeParams {
        &self.tree_params
    }

    /// Fit the ensemble to `x` and `y`
    pub fn fit(&self, x: &FeatureMatrix, y: &[f64]) -> Result<FittedGradientBoosting> {
        if y.len() != x.n_rows() {
            return Err(MathError::DimensionMismatch {
                expected: x.n_rows(),
                actual: y.len(),
            });
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Target values must be finite".to_string(),
            ));
        }
        let base_score = mean(y).ok_or_else(|| {
            MathError::InsufficientData("Cannot fit a model without samples".to_string())
        })?;

        let n = x.n_rows();
        let hess = vec![1.0; n];
        let mut predictions = vec![base_score; n];
        let mut trees = Vec::with_capacity(self.n_estimators);

        for _ in 0..self.n_estimators {
            let grad: Vec<f64> = predictions
                .iter()
                .zip(y)
                .map(|(pred, target)| pred - target)
                .collect();

            let tree = RegressionTree::fit(x, &grad, &hess, &self.tree_params)?;
            for (i, pred) in predictions.iter_mut().enumerate() {
                *pred += self.learning_rate * tree.predict_row(x.row(i));
            }
            trees.push(tree);
        }

        Ok(FittedGradientBoosting {
            base_score,
            learning_rate: self.learning_rate,
            n_features: x.n_cols(),
            trees,
        })
    }
}

impl FittedGradientBoosting {
    /// Predict a single sample
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(MathError::DimensionMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }

        let boost: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        Ok(self.base_score + self.learning_rate * boost)
    }

    /// Predict every row of a matrix
    pub fn predict(&self, x: &FeatureMatrix) -> Result<Vec<f64>> {
        x.rows().map(|row| self.predict_row(row)).collect()
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}
