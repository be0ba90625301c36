//! Exact minimizer of the scalar SICA-penalized quadratic.
//!
//! For a residual correlation `z` the coordinate update solves
//!
//! ```text
//! min_β  ½(β − z)² + λ·ρ_a(|β|),    ρ_a(t) = (a + 1)t / (a + t).
//! ```
//!
//! For `t = |β| > 0` the stationarity condition `t − |z| + λa(a+1)/(a+t)² = 0`
//! multiplied through by `(a + t)²` is the monic cubic
//! `t³ + (2a − |z|)t² + (a² − 2a|z|)t + (λa(a+1) − a²|z|) = 0`. Its largest real
//! root is the only interior local minimizer; the objective is nonconvex, so that
//! root still has to beat the zero solution. For `|z| > 1` the cubic is solved
//! in `u = t/|z|`.

use crate::cubic::DepressedCubic;
use crate::penalty::{hard_threshold_penalty, soft_threshold};

/// Above this shape the penalty is indistinguishable from L1 and the update is
/// a plain soft-threshold.
pub const L1_LIMIT_SHAPE: f64 = 1e4;

/// Margin the interior objective must win by; keeps rounding from flipping ties.
pub const OBJECTIVE_TIE_TOLERANCE: f64 = 1e-8;

/// `|z|` at or beyond which the interior root is the global minimizer:
/// `λ·ρ'_a(0) = λ(1 + 1/a)`.
#[inline]
pub fn interior_threshold(a: f64, lambda: f64) -> f64 {
    lambda * (1.0 + 1.0 / a)
}

/// Global minimizer of `½(β − z)² + λ·ρ_a(|β|)`.
///
/// `a` is expected to be floored by the caller; `lambda` must be non-negative.
/// The result has the sign of `z` (or is zero) and never exceeds `|z|` in magnitude.
pub fn sica_threshold(z: f64, a: f64, lambda: f64) -> f64 {
    if a > L1_LIMIT_SHAPE {
        return soft_threshold(z, lambda);
    }
    let abs_z = z.abs();
    if abs_z == 0.0 {
        return 0.0;
    }

    // Solve for u = t / m with m = max(|z|, 1) so the coefficients stay bounded
    // for huge |z|; with |z| <= 1 this is the unscaled cubic.
    let m = abs_z.max(1.0);
    let s = abs_z / m;
    let a_m = a / m;
    let b = 2.0 * a_m - s;
    let c = a_m * a_m - 2.0 * a_m * s;
    let d = lambda * a_m * ((a + 1.0) / m) / m - a_m * a_m * s;
    let cubic = DepressedCubic::new(b, c, d);
    let z0 = interior_threshold(a, lambda);

    if abs_z >= z0 {
        // Zero is not even a local minimum here, so an interior root exists; a
        // positive discriminant can only come from rounding.
        let u = cubic.three_roots()[2].clamp(0.0, s);
        return (u * m).copysign(z);
    }
    if cubic.has_single_real_root() {
        return 0.0;
    }

    let roots = cubic.three_roots();
    let u = roots[2];
    let ordered = roots[0] <= roots[1] && roots[1] <= roots[2];
    if !(ordered && u >= 0.0 && u <= s) {
        return 0.0;
    }
    // Both objectives are divided by m².
    let zero_objective = 0.5 * s * s;
    let gap = s - u;
    let interior_objective = 0.5 * gap * gap + hard_threshold_penalty(u, lambda / m);
    if zero_objective - interior_objective > OBJECTIVE_TIE_TOLERANCE / (m * m) {
        (u * m).copysign(z)
    } else {
        0.0
    }
}
