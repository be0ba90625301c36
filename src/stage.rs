//! One coordinate-descent stage at a fixed penalty shape.
//!
//! Each pass sweeps the active set in ascending order and replaces `β_I` by the
//! scalar SICA minimizer of its partial residual. Updates are Gauss-Seidel: a new
//! `β_I` is seen by every later coordinate of the same pass. After the sweep the
//! active set is rebuilt from the nonzero coefficients, the zero coefficients that
//! violate the optimality condition at zero, and the persistent variable set.

use crate::design::StandardizedDesign;
use crate::linalg::utils::euclidean_distance;
use crate::threshold::{interior_threshold, sica_threshold};
use crate::types::{ActiveSet, StageStatus, support_of};
use ndarray::{Array1, Array2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageParams {
    /// Penalty shape used by every update in this stage.
    pub a: f64,
    pub lambda: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

#[derive(Clone, Debug)]
pub struct StageOutcome {
    pub beta: Array1<f64>,
    /// Active set after the last pass; seeds the next stage.
    pub active: ActiveSet,
    pub status: StageStatus,
    pub iterations: usize,
    /// Euclidean step between consecutive passes, one entry per pass.
    pub step_history: Vec<f64>,
}

impl StageOutcome {
    pub fn last_step(&self) -> f64 {
        self.step_history.last().copied().unwrap_or(0.0)
    }
}

/// `|c_j − Σ_k G[j,k]·β_k|` over the nonzero coefficients `support`.
#[inline]
pub fn kkt_statistic(
    gram: &Array2<f64>,
    correlation: &Array1<f64>,
    beta: &Array1<f64>,
    support: &[usize],
    j: usize,
) -> f64 {
    let row = gram.row(j);
    let fitted: f64 = support.iter().map(|&k| row[k] * beta[k]).sum();
    (correlation[j] - fitted).abs()
}

/// Active set for the next pass.
///
/// Union of the nonzero coordinates, the zero coordinates whose KKT statistic
/// exceeds `λ(1 + 1/a)` and `varset`.
pub fn refresh_active_set(
    design: &StandardizedDesign,
    beta: &Array1<f64>,
    a: f64,
    lambda: f64,
    varset: &ActiveSet,
) -> ActiveSet {
    let gram = design.gram();
    let correlation = design.correlation();
    let support = support_of(beta);
    let threshold = interior_threshold(a, lambda);

    let mut active: ActiveSet = support.iter().copied().collect();
    for (j, &b) in beta.iter().enumerate() {
        if b == 0.0 && kkt_statistic(gram, correlation, beta, &support, j) > threshold {
            active.insert(j);
        }
    }
    active.extend_from(varset);
    active
}

/// One Gauss-Seidel sweep over `active`, updating `beta` in place.
pub fn coordinate_pass(
    design: &StandardizedDesign,
    beta: &mut Array1<f64>,
    active: &ActiveSet,
    a: f64,
    lambda: f64,
) {
    let gram = design.gram();
    let correlation = design.correlation();
    let indices = active.to_vec();
    for &i in &indices {
        let row = gram.row(i);
        let mut z = correlation[i];
        for &j in &indices {
            if j != i {
                z -= row[j] * beta[j];
            }
        }
        beta[i] = sica_threshold(z, a, lambda);
    }
}

/// Runs passes until the step between passes drops below `tolerance` with no
/// new coordinate entering the active set, or until `max_iterations` passes.
///
/// The caller's `active` set is first merged with a refresh at `beta_init`, so a
/// stage started from an empty set still sees the violating coordinates.
pub fn run_stage(
    design: &StandardizedDesign,
    beta_init: Array1<f64>,
    active: ActiveSet,
    varset: &ActiveSet,
    params: &StageParams,
) -> StageOutcome {
    let StageParams {
        a,
        lambda,
        max_iterations,
        tolerance,
    } = *params;

    let mut beta = beta_init;
    let mut active = active;
    active.extend_from(&refresh_active_set(design, &beta, a, lambda, varset));

    let mut status = StageStatus::MaxIterationsReached;
    let mut step_history = Vec::with_capacity(max_iterations.min(64));
    let mut iterations = 0usize;

    for pass in 1..=max_iterations {
        iterations = pass;
        let previous = beta.clone();
        coordinate_pass(design, &mut beta, &active, a, lambda);

        let refreshed = refresh_active_set(design, &beta, a, lambda, varset);
        let grew = !refreshed.is_subset(&active);
        active = refreshed;

        let step = euclidean_distance(&beta, &previous);
        step_history.push(step);
        if step < tolerance && !grew {
            status = StageStatus::Converged;
            break;
        }
    }

    if status == StageStatus::MaxIterationsReached {
        log::warn!(
            "[SICA] stage a={:.3e} hit {} passes without reaching tol {:.1e} (last step {:.3e})",
            a,
            max_iterations,
            tolerance,
            step_history.last().copied().unwrap_or(f64::NAN)
        );
    }

    StageOutcome {
        beta,
        active,
        status,
        iterations,
        step_history,
    }
}
