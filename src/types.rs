use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Numerical floor for the SICA shape parameter.
pub const SHAPE_FLOOR: f64 = 1e-3;

pub fn default_shape() -> f64 {
    1e-3
}

pub fn default_lambda() -> f64 {
    1e-2
}

pub fn default_max_iterations() -> usize {
    50
}

pub fn default_tolerance() -> f64 {
    1e-4
}

pub fn default_stabilize() -> bool {
    true
}

/// Solver configuration for one SICA fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SicaOptions {
    /// Requested penalty shape `a0`; small values approach the L0 penalty.
    #[serde(default = "default_shape")]
    pub a: f64,
    /// Penalty strength `λ`.
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    /// Columns considered in the first pass regardless of the optimality check.
    #[serde(default)]
    pub initial_active: Vec<usize>,
    /// Pass cap per stage.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Step-size tolerance between consecutive passes.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Run the multi-scale stabilization ladder before the final stage.
    #[serde(default = "default_stabilize")]
    pub stabilize: bool,
}

impl Default for SicaOptions {
    fn default() -> Self {
        Self {
            a: default_shape(),
            lambda: default_lambda(),
            initial_active: Vec::new(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            stabilize: default_stabilize(),
        }
    }
}

impl SicaOptions {
    pub fn new(a: f64, lambda: f64) -> Self {
        Self {
            a,
            lambda,
            ..Self::default()
        }
    }

    pub fn with_initial_active(mut self, columns: impl IntoIterator<Item = usize>) -> Self {
        self.initial_active = columns.into_iter().collect();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_stabilization(mut self, stabilize: bool) -> Self {
        self.stabilize = stabilize;
        self
    }

    /// Shape actually used by the final stage: `max(SHAPE_FLOOR, a)`.
    #[inline]
    pub fn effective_shape(&self) -> f64 {
        self.a.max(SHAPE_FLOOR)
    }

    /// Checks the options against a design with `n_columns` columns.
    pub fn validate(&self, n_columns: usize) -> Result<(), String> {
        if self.a.is_nan() {
            return Err("shape parameter a must not be NaN".to_string());
        }
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(format!(
                "lambda must be finite and non-negative, got {}",
                self.lambda
            ));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            ));
        }
        if let Some(&bad) = self.initial_active.iter().find(|&&j| j >= n_columns) {
            return Err(format!(
                "initial active column {bad} is out of range for {n_columns} columns"
            ));
        }
        Ok(())
    }
}

/// Indices of the nonzero entries of `beta`, ascending.
pub fn support_of(beta: &Array1<f64>) -> Vec<usize> {
    beta.iter()
        .enumerate()
        .filter_map(|(j, &b)| (b != 0.0).then_some(j))
        .collect()
}

/// Ordered, duplicate-free set of coordinate indices.
///
/// Coordinate updates visit indices in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSet(BTreeSet<usize>);

impl ActiveSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, index: usize) -> bool {
        self.0.insert(index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn extend_from(&mut self, other: &ActiveSet) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn is_subset(&self, other: &ActiveSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl FromIterator<usize> for ActiveSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How a coordinate-descent stage ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageStatus {
    /// Step size fell below the tolerance with a stable active set.
    Converged,
    /// Pass cap reached; the last iterate is returned as a best effort.
    MaxIterationsReached,
}
