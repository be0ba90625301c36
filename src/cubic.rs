//! Closed-form real roots of monic cubics `t³ + b·t² + c·t + d`.
//!
//! The cubic is shifted to depressed form through the classical quantities
//! `q = (3c − b²)/9`, `r = (9bc − 27d − 2b³)/54` and `D = q³ + r²`. A positive
//! `D` means one real root (Cardano); otherwise all three roots are real and are
//! read off the trigonometric form.

use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepressedCubic {
    pub q: f64,
    pub r: f64,
    pub discriminant: f64,
    shift: f64,
}

impl DepressedCubic {
    pub fn new(b: f64, c: f64, d: f64) -> Self {
        let q = (3.0 * c - b * b) / 9.0;
        let r = (9.0 * b * c - 27.0 * d - 2.0 * b * b * b) / 54.0;
        Self {
            q,
            r,
            discriminant: q * q * q + r * r,
            shift: b / 3.0,
        }
    }

    #[inline]
    pub fn has_single_real_root(&self) -> bool {
        self.discriminant > 0.0
    }

    /// Cardano's formula. Exact when `D ≥ 0`.
    pub fn single_root(&self) -> f64 {
        let sqrt_d = self.discriminant.max(0.0).sqrt();
        (self.r + sqrt_d).cbrt() + (self.r - sqrt_d).cbrt() - self.shift
    }

    /// All three real roots sorted ascending, treating `D` as zero if rounding
    /// pushed it slightly positive.
    pub fn three_roots(&self) -> [f64; 3] {
        if self.q >= 0.0 {
            // Only q = r = 0 reaches here with D <= 0: a triple root.
            let t = self.single_root();
            return [t, t, t];
        }
        let s = (-self.q).sqrt();
        let ratio = (self.r / (s * s * s)).clamp(-1.0, 1.0);
        let theta = ratio.acos();
        let mut roots = [0.0; 3];
        for (k, root) in roots.iter_mut().enumerate() {
            *root = 2.0 * s * ((theta + 2.0 * PI * k as f64) / 3.0).cos() - self.shift;
        }
        roots.sort_by(f64::total_cmp);
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn eval(b: f64, c: f64, d: f64, t: f64) -> f64 {
        ((t + b) * t + c) * t + d
    }

    #[test]
    fn three_distinct_roots_are_sorted() {
        // (t - 1)(t - 2)(t - 3)
        let cubic = DepressedCubic::new(-6.0, 11.0, -6.0);
        assert!(!cubic.has_single_real_root());
        let roots = cubic.three_roots();
        assert_abs_diff_eq!(roots[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(roots[1], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(roots[2], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn single_root_branch_solves_the_cubic() {
        let (b, c, d) = (0.0, 1.0, 1.0);
        let cubic = DepressedCubic::new(b, c, d);
        assert!(cubic.has_single_real_root());
        let t = cubic.single_root();
        assert_abs_diff_eq!(eval(b, c, d, t), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t, -0.682_327_803_828_019_3, epsilon = 1e-12);
    }

    #[test]
    fn repeated_roots_are_recovered() {
        // (t - 2)^3
        let cubic = DepressedCubic::new(-6.0, 12.0, -8.0);
        for t in cubic.three_roots() {
            assert_abs_diff_eq!(t, 2.0, epsilon = 1e-6);
        }
        // (t + 1)^2 (t - 4)
        let roots = DepressedCubic::new(-2.0, -7.0, -4.0).three_roots();
        assert_abs_diff_eq!(roots[0], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(roots[1], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(roots[2], 4.0, epsilon = 1e-9);
    }
}
