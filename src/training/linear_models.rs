//! Ordinary least squares regression
//!
//! Solves the normal equations with a Cholesky factorization. When the
//! Gram matrix is not positive definite a small ridge term is added to
//! the diagonal and the solve retried once.

use crate::error::{OtofiyatError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Linear regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted coefficients (weights)
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept (bias)
    pub intercept: Option<f64>,
    /// Whether to fit an intercept by centering the data
    pub fit_intercept: bool,
    is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            is_fitted: false,
        }
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Fit the model to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(OtofiyatError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 || x.ncols() == 0 {
            return Err(OtofiyatError::TrainingError(
                "cannot fit on an empty matrix".to_string(),
            ));
        }

        // Center data if fitting an intercept
        let (x_centered, y_centered, x_mean, y_mean) = if self.fit_intercept {
            let x_mean = x.mean_axis(Axis(0)).ok_or_else(|| {
                OtofiyatError::TrainingError("cannot compute feature means".to_string())
            })?;
            let y_mean = y.mean().unwrap_or(0.0);

            let x_centered = x - &x_mean.clone().insert_axis(Axis(0));
            let y_centered = y - y_mean;

            (x_centered, y_centered, Some(x_mean), Some(y_mean))
        } else {
            (x.to_owned(), y.to_owned(), None, None)
        };

        // Normal equations: (X^T X) w = X^T y
        let xtx = x_centered.t().dot(&x_centered);
        let xty = x_centered.t().dot(&y_centered);
        let coefficients = solve_normal_equations(&xtx, &xty)?;

        let intercept = match (x_mean, y_mean) {
            (Some(xm), Some(ym)) => ym - coefficients.dot(&xm),
            _ => 0.0,
        };

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        self.is_fitted = true;

        Ok(self)
    }

    /// Make predictions
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(OtofiyatError::ModelNotFitted)?;
        if x.ncols() != coefficients.len() {
            return Err(OtofiyatError::ShapeError {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        let intercept = self.intercept.unwrap_or(0.0);
        Ok(x.dot(coefficients) + intercept)
    }

    /// R^2 score on the given data
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;

        let y_mean = y.mean().unwrap_or(0.0);
        let ss_res = (&y_pred - y).mapv(|v| v * v).sum();
        let ss_tot = y.mapv(|v| (v - y_mean) * (v - y_mean)).sum();

        if ss_tot == 0.0 {
            return Ok(1.0);
        }
        Ok(1.0 - ss_res / ss_tot)
    }
}

fn solve_normal_equations(xtx: &Array2<f64>, xty: &Array1<f64>) -> Result<Array1<f64>> {
    if let Some(solution) = cholesky_solve(xtx, xty) {
        return Ok(solution);
    }

    // Not positive definite; regularize the diagonal and retry
    let n = xtx.nrows();
    let ridge = 1e-8 * (xtx.diag().iter().map(|v| v.abs()).sum::<f64>() / n as f64).max(1.0);
    let mut regularized = xtx.clone();
    for i in 0..n {
        regularized[[i, i]] += ridge;
    }

    cholesky_solve(&regularized, xty).ok_or_else(|| {
        OtofiyatError::TrainingError("normal equations are singular".to_string())
    })
}

/// Solve A x = b for symmetric positive-definite A via A = L * L^T.
/// Returns None if the decomposition hits a non-positive pivot.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    let mut l = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L z = b
    let mut z = Array1::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T w = z
    let mut w = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * w[j];
        }
        w[i] = (z[i] - sum) / l[[i, i]];
    }

    Some(w)
}
