//! Linear algebra operations
//!
//! This module provides a unified interface for matrix operations.
//! nalgebra is the backend; all ndarray <-> nalgebra conversions live here
//! so callers only ever see `ndarray` types.

use nalgebra::DMatrix;
use ndarray::Array2;
use num_complex::Complex64;

// ============================================================================
// Conversion helpers (internal)
// ============================================================================

/// Convert ndarray Array2<Complex64> to nalgebra DMatrix<Complex<f64>>
#[inline]
fn to_na_complex(a: &Array2<Complex64>) -> DMatrix<nalgebra::Complex<f64>> {
    let (m, n) = a.dim();
    DMatrix::from_fn(m, n, |i, j| nalgebra::Complex::new(a[[i, j]].re, a[[i, j]].im))
}

/// Convert nalgebra DMatrix<Complex<f64>> to ndarray Array2<Complex64>
#[inline]
fn from_na_complex(m: &DMatrix<nalgebra::Complex<f64>>) -> Array2<Complex64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| {
        Complex64::new(m[(i, j)].re, m[(i, j)].im)
    })
}

// ============================================================================
// Matrix inversion
// ============================================================================

/// Invert a complex matrix
///
/// Returns None if the matrix is non-square, singular, or the inverse is not
/// finite (pivot underflow).
pub fn inv_complex(a: &Array2<Complex64>) -> Option<Array2<Complex64>> {
    let (m, n) = a.dim();
    if m != n || m == 0 {
        return None;
    }

    let inv = to_na_complex(a).try_inverse()?;
    if inv.iter().any(|c| !c.re.is_finite() || !c.im.is_finite()) {
        return None;
    }
    Some(from_na_complex(&inv))
}

// ============================================================================
// Singular Value Decomposition
// ============================================================================

/// Compute singular values of a complex matrix (descending)
pub fn singular_values(a: &Array2<Complex64>) -> Vec<f64> {
    let (m, n) = a.dim();
    if m == 0 || n == 0 {
        return Vec::new();
    }

    let svd = to_na_complex(a).svd(false, false);
    let mut sv: Vec<f64> = svd.singular_values.iter().cloned().collect();
    sv.sort_by(|x, y| y.total_cmp(x));
    sv
}

/// Spectral norm (largest singular value)
pub fn spectral_norm(a: &Array2<Complex64>) -> f64 {
    singular_values(a).first().copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inv_complex() {
        let mut a = Array2::<Complex64>::zeros((2, 2));
        a[[0, 0]] = Complex64::new(1.0, 0.0);
        a[[0, 1]] = Complex64::new(2.0, 1.0);
        a[[1, 0]] = Complex64::new(3.0, 0.0);
        a[[1, 1]] = Complex64::new(4.0, -1.0);

        let inv = inv_complex(&a).unwrap();

        // A * A^(-1) should be identity
        let product = a.dot(&inv);
        assert_relative_eq!(product[[0, 0]].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(product[[1, 1]].re, 1.0, epsilon = 1e-12);
        assert!(product[[0, 1]].norm() < 1e-12);
        assert!(product[[1, 0]].norm() < 1e-12);
    }

    #[test]
    fn test_inv_complex_singular() {
        let one = Complex64::new(1.0, 0.0);
        let a = Array2::from_shape_vec((2, 2), vec![one, -one, -one, one]).unwrap();
        assert!(inv_complex(&a).is_none());
        assert!(inv_complex(&Array2::<Complex64>::zeros((2, 3))).is_none());
    }

    #[test]
    fn test_singular_values() {
        let mut a = Array2::<Complex64>::zeros((2, 2));
        a[[0, 0]] = Complex64::new(3.0, 0.0);
        a[[1, 1]] = Complex64::new(0.0, 4.0);

        let sv = singular_values(&a);
        assert_eq!(sv.len(), 2);
        assert_relative_eq!(sv[0], 4.0, epsilon = 1e-10);
        assert_relative_eq!(sv[1], 3.0, epsilon = 1e-10);
        assert_relative_eq!(spectral_norm(&a), 4.0, epsilon = 1e-10);
    }
}
