use crate::design::validate_inputs;
use crate::estimate::SicaError;
use crate::linalg::faer_ndarray::{FaerCholesky, fast_ata, fast_atv};
use faer::Side;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

/// Unpenalized least-squares refit on the columns listed in `support`.
///
/// Removes the shrinkage the penalty puts on the selected coefficients. Columns
/// outside `support` get coefficient 0. Fails when the support columns are
/// linearly dependent.
pub fn refit_support(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    support: &[usize],
) -> Result<Array1<f64>, SicaError> {
    validate_inputs(x, y)?;
    let p = x.ncols();
    if let Some(&bad) = support.iter().find(|&&j| j >= p) {
        return Err(SicaError::InvalidInput(format!(
            "support column {bad} is out of range for {p} columns"
        )));
    }
    let mut beta = Array1::<f64>::zeros(p);
    if support.is_empty() {
        return Ok(beta);
    }

    let x_support = x.select(Axis(1), support);
    let xtx = fast_ata(&x_support);
    let xty = fast_atv(&x_support, &y);
    let coef = xtx.cholesky(Side::Lower)?.solve_vec(&xty);
    for (&j, &b) in support.iter().zip(coef.iter()) {
        beta[j] = b;
    }
    Ok(beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    #[test]
    fn exact_linear_model_is_recovered_on_its_support() {
        let x = Array2::from_shape_fn((12, 4), |(i, j)| ((i * (j + 1) + j) % 5) as f64 - 2.0 + 0.1 * i as f64);
        let y = Array1::from_shape_fn(12, |i| 2.0 * x[[i, 0]] - 3.0 * x[[i, 2]]);
        let beta = refit_support(x.view(), y.view(), &[0, 2]).unwrap();
        assert_abs_diff_eq!(beta[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(beta[1], 0.0);
        assert_abs_diff_eq!(beta[2], -3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(beta[3], 0.0);
    }

    #[test]
    fn empty_support_gives_zero_vector() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![1.0, 1.0];
        assert_eq!(refit_support(x.view(), y.view(), &[]).unwrap(), array![0.0, 0.0]);
    }

    #[test]
    fn collinear_support_is_an_error() {
        // X'X = [[4, 4], [4, 4]]: the second Cholesky pivot is exactly zero.
        let x = array![[1.0, 1.0], [1.0, 1.0], [1.0, 1.0], [1.0, 1.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];
        let err = refit_support(x.view(), y.view(), &[0, 1]).unwrap_err();
        assert!(matches!(err, SicaError::LinearSystemSolveFailed(_)));
    }

    #[test]
    fn out_of_range_support_is_rejected() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![1.0, 1.0];
        assert!(matches!(
            refit_support(x.view(), y.view(), &[2]),
            Err(SicaError::InvalidInput(_))
        ));
    }
}
