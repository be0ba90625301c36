//! Public SICA fitting entry points.
//!
//! The pipeline is: validate inputs, rescale columns to norm `√n`, build the
//! Gram matrix and correlation vector, run the stabilization ladder and the final
//! stage at the requested shape, then map coefficients back to the caller's units.

use crate::continuation::{ContinuationSettings, StageReport, run_continuation};
use crate::design::StandardizedDesign;
use crate::linalg::faer_ndarray::FaerLinalgError;
use crate::types::{ActiveSet, SicaOptions, StageStatus, support_of};
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SicaError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A linear system solve failed. The support Gram block may be singular. Error: {0}")]
    LinearSystemSolveFailed(#[from] FaerLinalgError),
}

/// Result of one SICA fit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SicaFit {
    /// Coefficients for the caller's (unscaled) design.
    pub beta: Array1<f64>,
    /// Coefficients for the rescaled design with column norms `√n`.
    pub beta_scaled: Array1<f64>,
    /// Per-column factors `‖x_j‖/√n`; `beta = beta_scaled / scale_factors`.
    pub scale_factors: Array1<f64>,
    /// Shape used by the final stage, after flooring.
    pub a: f64,
    pub lambda: f64,
    /// Every executed stage in order; the last one ran at `a`.
    pub stages: Vec<StageReport>,
    /// Penalized objective of `beta_scaled` on the rescaled design.
    pub objective: f64,
    /// More nonzero coefficients than `n/2`: the fit is likely not sparse at this `λ`.
    pub oversized_support: bool,
}

impl SicaFit {
    pub fn support(&self) -> Vec<usize> {
        support_of(&self.beta)
    }

    pub fn nonzero_count(&self) -> usize {
        self.beta.iter().filter(|&&b| b != 0.0).count()
    }

    /// Status of the final stage.
    pub fn status(&self) -> StageStatus {
        self.stages
            .last()
            .map(|s| s.status)
            .unwrap_or(StageStatus::MaxIterationsReached)
    }

    pub fn converged(&self) -> bool {
        self.status() == StageStatus::Converged
    }
}

/// Fits SICA-penalized least squares starting from `β = 0`.
pub fn fit_sica(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    options: &SicaOptions,
) -> Result<SicaFit, SicaError> {
    let design = StandardizedDesign::new(x, y)?;
    fit_standardized(&design, options, None)
}

/// Fits SICA-penalized least squares from a caller-supplied starting point given
/// in the original column units.
pub fn fit_sica_warm_start(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    options: &SicaOptions,
    beta_init: ArrayView1<'_, f64>,
) -> Result<SicaFit, SicaError> {
    let design = StandardizedDesign::new(x, y)?;
    fit_standardized(&design, options, Some(beta_init))
}

/// Shorthand for [`fit_sica`] with default options, returning only the coefficients.
pub fn solve(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<Array1<f64>, SicaError> {
    fit_sica(x, y, &SicaOptions::default()).map(|fit| fit.beta)
}

/// Fits on an already rescaled design. The design is only read.
pub fn fit_standardized(
    design: &StandardizedDesign,
    options: &SicaOptions,
    beta_init: Option<ArrayView1<'_, f64>>,
) -> Result<SicaFit, SicaError> {
    let p = design.n_features();
    options.validate(p).map_err(SicaError::InvalidInput)?;

    let beta_start = match beta_init {
        Some(init) => {
            if init.len() != p {
                return Err(SicaError::InvalidInput(format!(
                    "initial coefficient length {} does not match {} columns",
                    init.len(),
                    p
                )));
            }
            if init.iter().any(|v| !v.is_finite()) {
                return Err(SicaError::InvalidInput(
                    "initial coefficients contain non-finite values".to_string(),
                ));
            }
            &init * design.scale_factors()
        }
        None => Array1::zeros(p),
    };

    let a0 = options.effective_shape();
    let settings = ContinuationSettings {
        a0,
        lambda: options.lambda,
        max_iterations: options.max_iterations,
        tolerance: options.tolerance,
        stabilize: options.stabilize,
    };
    let initial_active: ActiveSet = options.initial_active.iter().copied().collect();
    let outcome = run_continuation(design, beta_start, initial_active, &settings);

    let beta_scaled = outcome.beta;
    let beta = design.to_original_scale(&beta_scaled);
    let objective = design.objective(&beta_scaled, a0, options.lambda);

    let n = design.n_obs();
    let nonzero = beta.iter().filter(|&&b| b != 0.0).count();
    let oversized_support = 2 * nonzero > n;
    if oversized_support {
        log::warn!(
            "[SICA] {} nonzero coefficients exceed n/2 = {:.1}; the fit is likely not sparse at lambda={:.3e}",
            nonzero,
            n as f64 / 2.0,
            options.lambda
        );
    }

    Ok(SicaFit {
        beta,
        beta_scaled,
        scale_factors: design.scale_factors().clone(),
        a: a0,
        lambda: options.lambda,
        stages: outcome.stages,
        objective,
        oversized_support,
    })
}
