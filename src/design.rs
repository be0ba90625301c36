use crate::estimate::SicaError;
use crate::linalg::faer_ndarray::{fast_ata, fast_atv};
use crate::linalg::utils::column_norms;
use crate::penalty::penalized_objective;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Rejects inputs the solver cannot handle before any work is done.
pub fn validate_inputs(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<(), SicaError> {
    let (n, p) = x.dim();
    if n == 0 || p == 0 {
        return Err(SicaError::InvalidInput(format!(
            "design matrix must be non-empty, got {n}x{p}"
        )));
    }
    if y.len() != n {
        return Err(SicaError::InvalidInput(format!(
            "response length {} does not match design rows {}",
            y.len(),
            n
        )));
    }
    if let Some(((i, j), _)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(SicaError::InvalidInput(format!(
            "design matrix contains a non-finite value at ({i}, {j})"
        )));
    }
    if let Some((i, _)) = y.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(SicaError::InvalidInput(format!(
            "response contains a non-finite value at index {i}"
        )));
    }
    Ok(())
}

/// Column-rescaled copy of the design together with its normal-equation pieces.
///
/// Every nonzero column of the rescaled matrix has Euclidean norm `√n`, so the
/// Gram matrix `G = XᵀX/n` has a unit diagonal and the scalar update needs no
/// curvature division. Zero columns keep a scale factor of 1.
#[derive(Clone, Debug)]
pub struct StandardizedDesign {
    x_scaled: Array2<f64>,
    y: Array1<f64>,
    scale_factors: Array1<f64>,
    gram: Array2<f64>,
    correlation: Array1<f64>,
}

impl StandardizedDesign {
    pub fn new(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<Self, SicaError> {
        validate_inputs(x, y)?;
        let n = x.nrows() as f64;
        let sqrt_n = n.sqrt();
        let scale_factors: Array1<f64> = column_norms(&x)
            .into_iter()
            .map(|norm| if norm > 0.0 { norm / sqrt_n } else { 1.0 })
            .collect();

        let mut x_scaled = x.to_owned();
        for (mut col, &s) in x_scaled.axis_iter_mut(Axis(1)).zip(scale_factors.iter()) {
            col.mapv_inplace(|v| v / s);
        }
        let y = y.to_owned();
        let gram = fast_ata(&x_scaled) / n;
        let correlation = fast_atv(&x_scaled, &y) / n;

        Ok(Self {
            x_scaled,
            y,
            scale_factors,
            gram,
            correlation,
        })
    }

    pub fn n_obs(&self) -> usize {
        self.x_scaled.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x_scaled.ncols()
    }

    pub fn x_scaled(&self) -> &Array2<f64> {
        &self.x_scaled
    }

    /// Per-column factors `‖x_j‖/√n`.
    pub fn scale_factors(&self) -> &Array1<f64> {
        &self.scale_factors
    }

    /// `G = XᵀX/n` of the rescaled design.
    pub fn gram(&self) -> &Array2<f64> {
        &self.gram
    }

    /// `c = Xᵀy/n` of the rescaled design.
    pub fn correlation(&self) -> &Array1<f64> {
        &self.correlation
    }

    /// Maps rescaled-unit coefficients back to the caller's column units.
    pub fn to_original_scale(&self, beta_scaled: &Array1<f64>) -> Array1<f64> {
        beta_scaled / &self.scale_factors
    }

    /// Penalized objective of a rescaled-unit coefficient vector.
    pub fn objective(&self, beta_scaled: &Array1<f64>, a: f64, lambda: f64) -> f64 {
        penalized_objective(&self.x_scaled, &self.y, beta_scaled, a, lambda)
    }
}
