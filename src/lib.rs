#![deny(dead_code)]
#![deny(unused_imports)]

//! Sparse linear regression with the SICA penalty.
//!
//! Minimizes `(1/2n)‖y − Xβ‖² + λ·Σ ρ_a(|β_j|)` with
//! `ρ_a(t) = (a + 1)t / (a + t)`, a concave penalty between the counting
//! penalty (`a → 0`) and the Lasso (`a → ∞`). The solver is active-set coordinate
//! descent with an exact scalar update and a continuation ladder over `a`.

pub mod continuation;
pub mod cubic;
pub mod design;
pub mod estimate;
pub mod linalg;
pub mod path;
pub mod penalty;
pub mod refit;
pub mod simulation;
pub mod stage;
pub mod threshold;
pub mod types;

pub use continuation::{STABILIZATION_LADDER, StageReport, stabilization_schedule};
pub use design::StandardizedDesign;
pub use estimate::{
    SicaError, SicaFit, fit_sica, fit_sica_warm_start, fit_standardized, solve,
};
pub use path::fit_sica_path;
pub use penalty::{penalized_objective, sica_penalty, soft_threshold};
pub use refit::refit_support;
pub use simulation::{SparseLinearSample, SparseLinearSpec, sample_sparse_linear};
pub use stage::{StageOutcome, StageParams, run_stage};
pub use threshold::sica_threshold;
pub use types::{ActiveSet, SHAPE_FLOOR, SicaOptions, StageStatus, support_of};
