//! Multi-scale stabilization: a short ladder of less concave stages run before
//! the requested shape `a0`.
//!
//! Concave penalties trap coordinate descent in poor local optima when started
//! cold. Each rung solves at a larger `a` (closer to the Lasso), hands its
//! coefficients to the next rung as a warm start, and pins every coordinate it
//! found nonzero into a persistent variable set that all later stages must keep
//! active. The concavity of `λ·ρ_a` scales as `λ·2(1/a + 1/a²)`, so a rung only
//! runs when `λ` times its activation constant is large enough to matter.

use crate::design::StandardizedDesign;
use crate::stage::{StageParams, run_stage};
use crate::types::{ActiveSet, StageStatus, support_of};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StabilizationRung {
    pub a: f64,
    pub activation: f64,
}

pub const STABILIZATION_LADDER: [StabilizationRung; 3] = [
    StabilizationRung {
        a: 1.0,
        activation: 4.0,
    },
    StabilizationRung {
        a: 1.0 / 3.0,
        activation: 24.0,
    },
    StabilizationRung {
        a: 0.1,
        activation: 220.0,
    },
];

/// `λ·activation` must exceed this for a rung to run.
pub const ACTIVATION_THRESHOLD: f64 = 1e-2;

impl StabilizationRung {
    /// A rung runs when it is less concave than the target and the penalty at
    /// this `λ` is concave enough to need it.
    #[inline]
    pub fn is_active(&self, a0: f64, lambda: f64) -> bool {
        a0 < self.a && lambda * self.activation > ACTIVATION_THRESHOLD
    }
}

/// Shapes of the stabilization stages that will run, in order.
pub fn stabilization_schedule(a0: f64, lambda: f64) -> Vec<f64> {
    STABILIZATION_LADDER
        .iter()
        .filter(|rung| rung.is_active(a0, lambda))
        .map(|rung| rung.a)
        .collect()
}

/// Summary of one executed stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    pub a: f64,
    /// True for ladder rungs, false for the final stage at `a0`.
    pub stabilization: bool,
    pub status: StageStatus,
    pub iterations: usize,
    pub step_history: Vec<f64>,
    /// Nonzero coordinates at the end of the stage.
    pub support: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct ContinuationOutcome {
    /// Coefficients of the final stage in rescaled units.
    pub beta: Array1<f64>,
    pub stages: Vec<StageReport>,
    /// Coordinates pinned active by the stabilization stages.
    pub varset: ActiveSet,
}

impl ContinuationOutcome {
    pub fn final_stage(&self) -> Option<&StageReport> {
        self.stages.last()
    }
}

#[derive(Clone, Debug)]
pub struct ContinuationSettings {
    pub a0: f64,
    pub lambda: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
    /// When false the ladder is skipped and only the final stage runs.
    pub stabilize: bool,
}

/// Runs the active ladder rungs and then the final stage at `a0`.
pub fn run_continuation(
    design: &StandardizedDesign,
    beta_init: Array1<f64>,
    initial_active: ActiveSet,
    settings: &ContinuationSettings,
) -> ContinuationOutcome {
    let mut beta = beta_init;
    let mut active = initial_active;
    let mut varset = ActiveSet::new();
    let mut stages = Vec::with_capacity(STABILIZATION_LADDER.len() + 1);

    let schedule = if settings.stabilize {
        for rung in STABILIZATION_LADDER.iter() {
            if !rung.is_active(settings.a0, settings.lambda) {
                log::debug!(
                    "[SICA] skipping stabilization rung a={:.4} (a0={:.3e}, lambda*{}={:.3e})",
                    rung.a,
                    settings.a0,
                    rung.activation,
                    settings.lambda * rung.activation
                );
            }
        }
        stabilization_schedule(settings.a0, settings.lambda)
    } else {
        Vec::new()
    };

    let stage_shapes = schedule
        .iter()
        .map(|&a| (a, true))
        .chain(std::iter::once((settings.a0, false)));

    for (a, stabilization) in stage_shapes {
        let params = StageParams {
            a,
            lambda: settings.lambda,
            max_iterations: settings.max_iterations,
            tolerance: settings.tolerance,
        };
        let outcome = run_stage(design, beta, active, &varset, &params);
        let support = support_of(&outcome.beta);
        log::debug!(
            "[SICA] stage a={:.4e} ({}) finished after {} passes, last step {:.3e}, support {}",
            a,
            if stabilization { "stabilization" } else { "final" },
            outcome.iterations,
            outcome.last_step(),
            support.len()
        );
        if stabilization {
            for &j in &support {
                varset.insert(j);
            }
        }
        stages.push(StageReport {
            a,
            stabilization,
            status: outcome.status,
            iterations: outcome.iterations,
            step_history: outcome.step_history,
            support,
        });
        beta = outcome.beta;
        active = outcome.active;
    }

    ContinuationOutcome {
        beta,
        stages,
        varset,
    }
}
