//! Dense row-major feature matrix

use crate::{MathError, Result};

/// Row-major matrix of `f64` features, one row per sample
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    n_cols: usize,
    values: Vec<f64>,
}

impl FeatureMatrix {
    /// Create an empty matrix with a fixed number of columns
    pub fn new(n_cols: usize) -> Result<Self> {
        if n_cols == 0 {
            return Err(MathError::InvalidInput(
                "Feature matrix needs at least one column".to_string(),
            ));
        }

        Ok(Self {
            n_cols,
            values: Vec::new(),
        })
    }

    /// Create an empty matrix with room for `rows` samples
    pub fn with_capacity(n_cols: usize, rows: usize) -> Result<Self> {
        let mut matrix = Self::new(n_cols)?;
        matrix.values.reserve(rows * n_cols);
        Ok(matrix)
    }

    /// Build a matrix from equally sized rows
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let n_cols = rows
            .first()
            .map(|r| r.as_ref().len())
            .ok_or_else(|| MathError::InsufficientData("No rows supplied".to_string()))?;

        let mut matrix = Self::with_capacity(n_cols, rows.len())?;
        for row in rows {
            matrix.push_row(row.as_ref())?;
        }
        Ok(matrix)
    }

    /// Append a sample
    pub fn push_row(&mut self, row: &[f64]) -> Result<()> {
        if row.len() != self.n_cols {
            return Err(MathError::DimensionMismatch {
                expected: self.n_cols,
                actual: row.len(),
            });
        }
        if let Some(bad) = row.iter().find(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(format!(
                "Feature values must be finite, got {}",
                bad
            )));
        }

        self.values.extend_from_slice(row);
        Ok(())
    }

    /// Number of samples
    pub fn n_rows(&self) -> usize {
        self.values.len() / self.n_cols
    }

    /// Number of features per sample
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow one sample
    pub fn row(&self, index: usize) -> &[f64] {
        let start = index * self.n_cols;
        &self.values[start..start + self.n_cols]
    }

    /// Single cell lookup
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.n_cols + col]
    }

    /// Iterate over samples in order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.n_cols)
    }
}
