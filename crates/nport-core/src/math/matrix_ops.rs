//! Matrix operation helpers
//!
//! Provides utility functions for common matrix operations to reduce
//! boilerplate nested loops in transform functions.

use ndarray::{s, Array2, Array3, ArrayView1};
use num_complex::Complex64;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{NetworkError, Result};

/// Create a diagonal matrix from a slice of values
#[inline]
pub fn diag_matrix(values: &[Complex64]) -> Array2<Complex64> {
    let n = values.len();
    let mut m = Array2::<Complex64>::zeros((n, n));
    for (i, &v) in values.iter().enumerate() {
        m[[i, i]] = v;
    }
    m
}

/// Diagonal matrix from a per-port view, mapped element-wise
#[inline]
pub fn diag_from_fn(
    z0: ArrayView1<'_, Complex64>,
    f: impl Fn(Complex64) -> Complex64,
) -> Array2<Complex64> {
    let vals: Vec<Complex64> = z0.iter().map(|&z| f(z)).collect();
    diag_matrix(&vals)
}

/// Identity matrix of given size
#[inline]
pub fn identity(n: usize) -> Array2<Complex64> {
    Array2::<Complex64>::eye(n)
}

/// Check that every reference impedance in a per-port view is non-zero and finite
pub fn check_z0(z0: ArrayView1<'_, Complex64>) -> Result<()> {
    for (port, &z) in z0.iter().enumerate() {
        if !z.re.is_finite() || !z.im.is_finite() || z.norm() == 0.0 {
            return Err(NetworkError::InvalidImpedance {
                freq_index: None,
                port,
                value: z,
            });
        }
    }
    Ok(())
}

/// Evaluate `op` on every frequency index and stack the resulting
/// `nports_out x nports_out` slices into an `[nfreq, nports_out, nports_out]` array.
///
/// Frequency slices are independent. With the `parallel` feature they are
/// computed on the rayon pool. Errors are tagged with their frequency index.
pub fn try_map_freq<F>(nfreq: usize, nports_out: usize, op: F) -> Result<Array3<Complex64>>
where
    F: Fn(usize) -> Result<Array2<Complex64>> + Sync + Send,
{
    let eval = |f: usize| op(f).map_err(|e| e.at_frequency(f));

    #[cfg(feature = "parallel")]
    let slices: Vec<Array2<Complex64>> = (0..nfreq)
        .into_par_iter()
        .map(eval)
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let slices: Vec<Array2<Complex64>> = (0..nfreq).map(eval).collect::<Result<Vec<_>>>()?;

    let mut out = Array3::<Complex64>::zeros((nfreq, nports_out, nports_out));
    for (f, m) in slices.iter().enumerate() {
        if m.dim() != (nports_out, nports_out) {
            return Err(NetworkError::shape(
                format!("{0}x{0} slice", nports_out),
                format!("{}x{} slice", m.nrows(), m.ncols()),
            ));
        }
        out.slice_mut(s![f, .., ..]).assign(m);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn test_diag_matrix() {
        let vals = vec![
            Complex64::new(1.0, 0.0),
            Complex64::new(2.0, 0.0),
            Complex64::new(3.0, 0.0),
        ];
        let m = diag_matrix(&vals);
        assert_eq!(m[[0, 0]], Complex64::new(1.0, 0.0));
        assert_eq!(m[[1, 1]], Complex64::new(2.0, 0.0));
        assert_eq!(m[[2, 2]], Complex64::new(3.0, 0.0));
        assert_eq!(m[[0, 1]], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_diag_from_fn_sqrt() {
        let z0 = Array1::from_vec(vec![Complex64::new(100.0, 0.0), Complex64::new(25.0, 0.0)]);
        let m = diag_from_fn(z0.view(), |z| z.sqrt());
        assert!((m[[0, 0]].re - 10.0).abs() < 1e-10);
        assert!((m[[1, 1]].re - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_check_z0() {
        let good = Array1::from_vec(vec![Complex64::new(50.0, 0.0), Complex64::new(0.0, 30.0)]);
        assert!(check_z0(good.view()).is_ok());

        let bad = Array1::from_vec(vec![Complex64::new(50.0, 0.0), Complex64::new(0.0, 0.0)]);
        assert!(matches!(
            check_z0(bad.view()),
            Err(NetworkError::InvalidImpedance { port: 1, .. })
        ));
    }

    #[test]
    fn test_try_map_freq_tags_frequency() {
        let result = try_map_freq(4, 1, |f| {
            if f == 2 {
                Err(NetworkError::singular("test"))
            } else {
                Ok(identity(1))
            }
        });
        assert_eq!(
            result.unwrap_err(),
            NetworkError::SingularMatrix {
                operation: "test",
                freq_index: Some(2)
            }
        );
    }
}
