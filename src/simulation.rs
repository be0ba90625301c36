use crate::estimate::SicaError;
use crate::types::support_of;
use ndarray::{Array1, Array2};
use rand_distr::{Distribution, Normal, StandardNormal};

/// Sparse Gaussian linear model `y = Xβ* + ε` with independent standard-normal
/// design entries and `ε ~ N(0, noise_sd²)`.
#[derive(Clone, Debug)]
pub struct SparseLinearSpec {
    pub n_obs: usize,
    /// True coefficients; zeros mark inactive columns.
    pub beta: Array1<f64>,
    pub noise_sd: f64,
}

impl SparseLinearSpec {
    /// Places `values` at `support` in a length-`n_features` coefficient vector.
    pub fn with_support(
        n_obs: usize,
        n_features: usize,
        support: &[usize],
        values: &[f64],
        noise_sd: f64,
    ) -> Result<Self, SicaError> {
        if support.len() != values.len() {
            return Err(SicaError::InvalidInput(format!(
                "support has {} indices but {} values were given",
                support.len(),
                values.len()
            )));
        }
        let mut beta = Array1::<f64>::zeros(n_features);
        for (&j, &v) in support.iter().zip(values.iter()) {
            if j >= n_features {
                return Err(SicaError::InvalidInput(format!(
                    "support index {j} is out of range for {n_features} features"
                )));
            }
            beta[j] = v;
        }
        Ok(Self {
            n_obs,
            beta,
            noise_sd,
        })
    }

    pub fn n_features(&self) -> usize {
        self.beta.len()
    }

    pub fn support(&self) -> Vec<usize> {
        support_of(&self.beta)
    }
}

/// One synthetic data set drawn from a [`SparseLinearSpec`].
#[derive(Clone, Debug)]
pub struct SparseLinearSample {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
}

/// Draws a design matrix and response from `spec`.
pub fn sample_sparse_linear<R: rand::Rng + ?Sized>(
    spec: &SparseLinearSpec,
    rng: &mut R,
) -> Result<SparseLinearSample, SicaError> {
    if spec.n_obs == 0 || spec.n_features() == 0 {
        return Err(SicaError::InvalidInput(format!(
            "simulated design must be non-empty, got {}x{}",
            spec.n_obs,
            spec.n_features()
        )));
    }
    if spec.beta.iter().any(|b| !b.is_finite()) {
        return Err(SicaError::InvalidInput(
            "true coefficients contain non-finite values".to_string(),
        ));
    }
    let noise = Normal::new(0.0, spec.noise_sd).map_err(|e| {
        SicaError::InvalidInput(format!("invalid noise sd {}: {e}", spec.noise_sd))
    })?;

    let (n, p) = (spec.n_obs, spec.n_features());
    let mut x = Array2::<f64>::zeros((n, p));
    for v in x.iter_mut() {
        *v = StandardNormal.sample(rng);
    }
    let mut y = x.dot(&spec.beta);
    for v in y.iter_mut() {
        *v += noise.sample(rng);
    }
    Ok(SparseLinearSample { x, y })
}
