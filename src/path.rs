use crate::design::StandardizedDesign;
use crate::estimate::{SicaError, SicaFit, fit_standardized};
use crate::types::SicaOptions;
use ndarray::{ArrayView1, ArrayView2};
use rayon::prelude::*;

/// Fits SICA at every `λ` in `lambdas`, in parallel.
///
/// The rescaled design is built once and shared read-only; every solve owns its
/// own iterate and active sets, so the fits are identical to sequential
/// [`crate::estimate::fit_sica`] calls. `options.lambda` is ignored. Fits are
/// returned in grid order.
pub fn fit_sica_path(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
    lambdas: &[f64],
    options: &SicaOptions,
) -> Result<Vec<SicaFit>, SicaError> {
    if lambdas.is_empty() {
        return Err(SicaError::InvalidInput(
            "lambda grid must contain at least one value".to_string(),
        ));
    }
    let design = StandardizedDesign::new(x, y)?;
    lambdas
        .par_iter()
        .map(|&lambda| {
            let opts = SicaOptions {
                lambda,
                ..options.clone()
            };
            fit_standardized(&design, &opts, None)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::fit_sica;
    use ndarray::{Array1, Array2};

    fn problem() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((60, 7), |(i, j)| {
            (((i + 2) * (3 * j + 1)) % 19) as f64 - 9.0 + 0.3 * j as f64
        });
        let y = Array1::from_shape_fn(60, |i| x[[i, 1]] - 0.7 * x[[i, 6]] + ((i % 7) as f64 - 3.0) * 0.05);
        (x, y)
    }

    #[test]
    fn parallel_path_matches_sequential_fits() {
        let (x, y) = problem();
        let lambdas = [0.5, 0.1, 0.02, 0.0];
        let opts = SicaOptions::new(0.1, 1.0);
        let path = fit_sica_path(x.view(), y.view(), &lambdas, &opts).unwrap();
        assert_eq!(path.len(), lambdas.len());
        for (fit, &lambda) in path.iter().zip(lambdas.iter()) {
            assert_eq!(fit.lambda, lambda);
            let single = fit_sica(x.view(), y.view(), &SicaOptions::new(0.1, lambda)).unwrap();
            assert_eq!(fit.beta, single.beta);
        }
    }

    #[test]
    fn larger_lambda_gives_no_larger_support_at_the_extremes() {
        let (x, y) = problem();
        let path = fit_sica_path(x.view(), y.view(), &[50.0, 0.0], &SicaOptions::new(0.1, 1.0)).unwrap();
        assert_eq!(path[0].nonzero_count(), 0);
        assert!(path[1].nonzero_count() > 0);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let (x, y) = problem();
        assert!(fit_sica_path(x.view(), y.view(), &[], &SicaOptions::default()).is_err());
    }

    #[test]
    fn any_invalid_lambda_fails_the_path() {
        let (x, y) = problem();
        assert!(fit_sica_path(x.view(), y.view(), &[0.1, -1.0], &SicaOptions::default()).is_err());
    }
}
