//! Regression tree grown on first and second order gradients
//!
//! Split gain and leaf weights follow the regularised second-order objective
//! used by modern gradient boosting libraries:
//! - leaf weight `w = -G / (H + lambda)`
//! - split gain `0.5 * (GL²/(HL+λ) + GR²/(HR+λ) - G²/(H+λ)) - gamma`

use crate::matrix::FeatureMatrix;
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Growth limits and regularisation for a single tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth of the tree (root is depth 0)
    pub max_depth: usize,
    /// Minimum hessian sum required in each child
    pub min_child_weight: f64,
    /// L2 regularisation on leaf weights
    pub lambda: f64,
    /// Minimum loss reduction required to make a split
    pub gamma: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 6,
            min_child_weight: 1.0,
            lambda: 1.0,
            gamma: 0.0,
        }
    }
}

impl TreeParams {
    /// Check that the parameters describe a growable tree
    pub fn validate(&self) -> Result<()> {
        if self.lambda < 0.0 || !self.lambda.is_finite() {
            return Err(MathError::InvalidInput(
                "lambda must be a non-negative number".to_string(),
            ));
        }
        if self.gamma < 0.0 || !self.gamma.is_finite() {
            return Err(MathError::InvalidInput(
                "gamma must be a non-negative number".to_string(),
            ));
        }
        if self.min_child_weight < 0.0 || !self.min_child_weight.is_finite() {
            return Err(MathError::InvalidInput(
                "min_child_weight must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

/// A node in a fitted tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        value: f64,
    },
    /// Samples with `row[feature] < threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Fitted regression tree stored as a flat node arena, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

struct Grower<'a> {
    x: &'a FeatureMatrix,
    grad: &'a [f64],
    hess: &'a [f64],
    params: &'a TreeParams,
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Grow a tree that approximates the negative gradient step
    pub fn fit(
        x: &FeatureMatrix,
        grad: &[f64],
        hess: &[f64],
        params: &TreeParams,
    ) -> Result<Self> {
        if x.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot grow a tree without samples".to_string(),
            ));
        }
        if grad.len() != x.n_rows() {
            return Err(MathError::DimensionMismatch {
                expected: x.n_rows(),
                actual: grad.len(),
            });
        }
        if hess.len() != x.n_rows() {
            return Err(MathError::DimensionMismatch {
                expected: x.n_rows(),
                actual: hess.len(),
            });
        }
        params.validate()?;

        let mut grower = Grower {
            x,
            grad,
            hess,
            params,
            nodes: Vec::new(),
        };
        grower.grow((0..x.n_rows()).collect(), 0);

        Ok(Self {
            nodes: grower.nodes,
        })
    }

    #[cfg(test)]
    fn from_nodes(nodes: Vec<Node>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(MathError::InvalidInput("A tree needs a root".to_string()));
        }
        for node in &nodes {
            if let Node::Split { left, right, .. } = node {
                if *left >= nodes.len() || *right >= nodes.len() {
                    return Err(MathError::InvalidInput(format!(
                        "Child index out of range for {} nodes",
                        nodes.len()
                    )));
                }
            }
        }
        Ok(Self { nodes })
    }

    /// Evaluate the tree for one sample
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of leaves
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Depth of the deepest leaf
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

impl<'a> Grower<'a> {
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let (g_sum, h_sum) = self.sums(&indices);
        let node_index = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: self.leaf_weight(g_sum, h_sum),
        });

        if depth >= self.params.max_depth || indices.len() < 2 {
            return node_index;
        }

        let Some(split) = self.best_split(&indices, g_sum, h_sum) else {
            return node_index;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.x.get(i, split.feature) < split.threshold);

        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);
        self.nodes[node_index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };

        node_index
    }

    fn sums(&self, indices: &[usize]) -> (f64, f64) {
        indices.iter().fold((0.0, 0.0), |(g, h), &i| {
            (g + self.grad[i], h + self.hess[i])
        })
    }

    fn leaf_weight(&self, g: f64, h: f64) -> f64 {
        let denom = h + self.params.lambda;
        if denom <= 0.0 {
            0.0
        } else {
            -g / denom
        }
    }

    fn score(&self, g: f64, h: f64) -> f64 {
        let denom = h + self.params.lambda;
        if denom <= 0.0 {
            0.0
        } else {
            g * g / denom
        }
    }

    fn best_split(&self, indices: &[usize], g_sum: f64, h_sum: f64) -> Option<SplitCandidate> {
        let parent_score = self.score(g_sum, h_sum);
        let mut best: Option<SplitCandidate> = None;
        let mut sorted = indices.to_vec();

        for feature in 0..self.x.n_cols() {
            sorted.sort_by(|&a, &b| self.x.get(a, feature).total_cmp(&self.x.get(b, feature)));

            let mut g_left = 0.0;
            let mut h_left = 0.0;
            for pair in sorted.windows(2) {
                let (current, next) = (pair[0], pair[1]);
                g_left += self.grad[current];
                h_left += self.hess[current];

                let value = self.x.get(current, feature);
                let next_value = self.x.get(next, feature);
                if value >= next_value {
                    continue;
                }

                let g_right = g_sum - g_left;
                let h_right = h_sum - h_left;
                if h_left < self.params.min_child_weight || h_right < self.params.min_child_weight
                {
                    continue;
                }

                let gain = 0.5
                    * (self.score(g_left, h_left) + self.score(g_right, h_right) - parent_score)
                    - self.params.gamma;
                if gain <= 1e-12 {
                    continue;
                }

                if best.map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: value + (next_value - value) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}
