//! SICA penalty and the objectives built from it.

use crate::linalg::utils::KahanSum;
use ndarray::{ArrayBase, Data, Ix1, Ix2};

/// SICA penalty `ρ_a(t) = (a + 1)·t / (a + t)` for `t ≥ 0`.
///
/// Tends to the indicator `1{t ≠ 0}` as `a → 0` and to `t` as `a → ∞`.
#[inline]
pub fn sica_penalty(t: f64, a: f64) -> f64 {
    let t = t.abs();
    (a + 1.0) * t / (a + t)
}

/// Hard-threshold surrogate `(λ² − max(0, λ − t)²) / 2` used when deciding
/// between the zero solution and the interior root of the scalar problem.
#[inline]
pub fn hard_threshold_penalty(t: f64, lambda: f64) -> f64 {
    let gap = (lambda - t).max(0.0);
    0.5 * (lambda * lambda - gap * gap)
}

/// Soft-thresholding operator, the exact scalar solution in the L1 limit.
#[inline]
pub fn soft_threshold(z: f64, lambda: f64) -> f64 {
    let shrunk = z.abs() - lambda;
    if shrunk > 0.0 { shrunk.copysign(z) } else { 0.0 }
}

/// Penalized least-squares objective `(1/2n)‖y − Xβ‖² + λ·Σ ρ_a(|β_j|)`.
pub fn penalized_objective<S1, S2, S3>(
    x: &ArrayBase<S1, Ix2>,
    y: &ArrayBase<S2, Ix1>,
    beta: &ArrayBase<S3, Ix1>,
    a: f64,
    lambda: f64,
) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    S3: Data<Elem = f64>,
{
    let n = x.nrows().max(1) as f64;
    let fitted = x.dot(beta);
    let mut rss = KahanSum::default();
    for (yi, fi) in y.iter().zip(fitted.iter()) {
        let r = yi - fi;
        rss.add(r * r);
    }
    let penalty: f64 = beta.iter().map(|&b| sica_penalty(b, a)).sum();
    0.5 * rss.sum() / n + lambda * penalty
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn sica_interpolates_between_counting_and_l1() {
        assert_eq!(sica_penalty(0.0, 0.5), 0.0);
        // a -> 0 approaches the counting penalty.
        assert_abs_diff_eq!(sica_penalty(2.0, 1e-9), 1.0, epsilon = 1e-8);
        // a -> inf approaches |t|.
        assert_abs_diff_eq!(sica_penalty(-2.0, 1e9), 2.0, epsilon = 1e-6);
        // rho_a(1) = 1 for every a.
        assert_abs_diff_eq!(sica_penalty(1.0, 0.3), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn hard_threshold_penalty_saturates_at_half_lambda_squared() {
        let lambda = 0.8;
        assert_eq!(hard_threshold_penalty(0.0, lambda), 0.0);
        assert_abs_diff_eq!(hard_threshold_penalty(0.4, lambda), 0.5 * (0.64 - 0.16), epsilon = 1e-14);
        assert_abs_diff_eq!(hard_threshold_penalty(5.0, lambda), 0.32, epsilon = 1e-14);
    }

    #[test]
    fn soft_threshold_shrinks_toward_zero() {
        assert_eq!(soft_threshold(3.0, 1.0), 2.0);
        assert_eq!(soft_threshold(-3.0, 1.0), -2.0);
        assert_eq!(soft_threshold(0.5, 1.0), 0.0);
        assert!(soft_threshold(-0.5, 1.0).is_sign_positive());
    }

    #[test]
    fn objective_combines_fit_and_penalty() {
        let x = array![[1.0, 0.0], [0.0, 1.0]];
        let y = array![1.0, 2.0];
        let beta = array![1.0, 0.0];
        // residual (0, 2): rss / 2n = 4 / 4 = 1; penalty = lambda * rho_a(1) = 0.5.
        let value = penalized_objective(&x, &y, &beta, 0.2, 0.5);
        assert_abs_diff_eq!(value, 1.5, epsilon = 1e-12);
    }
}
