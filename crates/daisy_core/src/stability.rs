//! Local stability from a finite-difference Jacobian.

use crate::parameters::ParameterSet;
use crate::traits::VectorField;
use anyhow::{bail, Result};
use nalgebra::DMatrix;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// Row-major Jacobian `J[i * dim + j] = df_i/dx_j` by symmetric differences:
/// `(f_i(x + dx e_j) - f_i(x - dx e_j)) / (2 dx)`.
pub fn finite_difference_jacobian<F: VectorField>(
    field: &F,
    params: &ParameterSet,
    point: &[f64],
    dx: f64,
) -> Result<Vec<f64>> {
    let dim = field.dimension();
    if point.len() != dim {
        bail!(
            "Point dimension mismatch. Expected {}, got {}.",
            dim,
            point.len()
        );
    }
    if !(dx > 0.0) {
        bail!("Finite-difference step must be positive.");
    }

    let mut jacobian = vec![0.0; dim * dim];
    let mut probe = point.to_vec();
    let mut forward = vec![0.0; dim];
    let mut backward = vec![0.0; dim];

    for j in 0..dim {
        probe[j] = point[j] + dx;
        field.evaluate(&probe, params, &mut forward);
        probe[j] = point[j] - dx;
        field.evaluate(&probe, params, &mut backward);
        probe[j] = point[j];

        for i in 0..dim {
            jacobian[i * dim + j] = (forward[i] - backward[i]) / (2.0 * dx);
        }
    }

    Ok(jacobian)
}

/// Eigenvalues of a row-major square matrix. Empty when any entry is not
/// finite, since the Schur iteration has no meaning there.
pub fn eigenvalues(dim: usize, jacobian: &[f64]) -> Vec<Complex<f64>> {
    if dim == 0 || jacobian.len() != dim * dim || jacobian.iter().any(|v| !v.is_finite()) {
        return Vec::new();
    }
    if dim == 1 {
        return vec![Complex::new(jacobian[0], 0.0)];
    }
    let matrix = DMatrix::from_row_slice(dim, dim, jacobian);
    matrix.complex_eigenvalues().iter().copied().collect()
}

/// Stable iff every eigenvalue has a strictly negative real part. Zero, positive
/// or undefined spectra all classify as unstable.
pub fn is_stable(eigenvalues: &[Complex<f64>]) -> bool {
    !eigenvalues.is_empty() && eigenvalues.iter().all(|lambda| lambda.re < 0.0)
}

/// Linearization of a field at one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linearization {
    pub jacobian: Vec<f64>,
    pub eigenvalues: Vec<Complex<f64>>,
    pub stable: bool,
}

pub fn classify<F: VectorField>(
    field: &F,
    params: &ParameterSet,
    point: &[f64],
    dx: f64,
) -> Result<Linearization> {
    let jacobian = finite_difference_jacobian(field, params, point, dx)?;
    let eigenvalues = eigenvalues(field.dimension(), &jacobian);
    let stable = is_stable(&eigenvalues);
    Ok(Linearization {
        jacobian,
        eigenvalues,
        stable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// `dx/dt = A (x - c)` for a fixed 2x2 matrix `A`.
    struct Linear2 {
        a: [f64; 4],
    }

    impl VectorField for Linear2 {
        fn dimension(&self) -> usize {
            2
        }

        fn evaluate(&self, state: &[f64], _params: &ParameterSet, out: &mut [f64]) {
            let (x, y) = (state[0] - 0.25, state[1] - 0.5);
            out[0] = self.a[0] * x + self.a[1] * y;
            out[1] = self.a[2] * x + self.a[3] * y;
        }
    }

    fn classify_linear(a: [f64; 4]) -> Linearization {
        classify(&Linear2 { a }, &ParameterSet::new(), &[0.25, 0.5], 1e-5)
            .expect("classification")
    }

    #[test]
    fn jacobian_matches_linear_coefficients() {
        let lin = classify_linear([-1.0, 2.0, 0.5, -3.0]);
        for (got, expected) in lin.jacobian.iter().zip([-1.0, 2.0, 0.5, -3.0]) {
            assert_abs_diff_eq!(*got, expected, epsilon = 1e-8);
        }
    }

    #[test]
    fn sink_is_stable() {
        assert!(classify_linear([-1.0, 0.0, 0.0, -2.0]).stable);
    }

    #[test]
    fn saddle_is_unstable() {
        let lin = classify_linear([-1.0, 0.0, 0.0, 2.0]);
        assert!(!lin.stable);
        let mut re: Vec<f64> = lin.eigenvalues.iter().map(|l| l.re).collect();
        re.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_abs_diff_eq!(re[0], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(re[1], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn stable_focus_uses_real_parts() {
        // Eigenvalues -0.5 +/- 2i.
        let lin = classify_linear([-0.5, 2.0, -2.0, -0.5]);
        assert!(lin.stable);
        assert!(lin.eigenvalues.iter().all(|l| l.im.abs() > 1.0));
    }

    #[test]
    fn center_is_not_stable() {
        // Purely imaginary spectrum: real parts are zero, not negative.
        assert!(!is_stable(&[Complex::new(0.0, 1.0), Complex::new(0.0, -1.0)]));
    }

    #[test]
    fn non_finite_jacobian_is_unstable() {
        assert!(eigenvalues(2, &[f64::NAN, 0.0, 0.0, -1.0]).is_empty());
        assert!(!is_stable(&[]));
    }

    #[test]
    fn rejects_bad_inputs() {
        let field = Linear2 { a: [0.0; 4] };
        let params = ParameterSet::new();
        assert!(finite_difference_jacobian(&field, &params, &[0.1], 1e-5).is_err());
        assert!(finite_difference_jacobian(&field, &params, &[0.1, 0.2], 0.0).is_err());
    }
}
