//! Network property checks
//!
//! Provides methods to test network properties like passivity and reciprocity.

use ndarray::s;

use super::core::Network;
use crate::constants::PROPERTY_TOL;
use crate::math::linalg::spectral_norm;

impl Network {
    /// Test if network is reciprocal
    ///
    /// A network is reciprocal if S = S^T (transpose).
    pub fn is_reciprocal(&self, tol: Option<f64>) -> bool {
        let tol = tol.unwrap_or(PROPERTY_TOL);
        let nports = self.nports();

        for f in 0..self.nfreq() {
            for i in 0..nports {
                for j in i + 1..nports {
                    let diff = (self.s[[f, i, j]] - self.s[[f, j, i]]).norm();
                    if diff > tol {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Test if network is passive
    ///
    /// A network is passive if I - S^H * S is positive semi-definite, i.e. the
    /// largest singular value of S is at most 1 at every frequency.
    pub fn is_passive(&self, tol: Option<f64>) -> bool {
        let tol = tol.unwrap_or(PROPERTY_TOL);
        (0..self.nfreq()).all(|f| {
            spectral_norm(&self.s.slice(s![f, .., ..]).to_owned()) <= 1.0 + tol
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{Frequency, FrequencyUnit, SweepType};
    use ndarray::{Array1, Array3};
    use num_complex::Complex64;

    fn two_port(s12: Complex64, s21: Complex64) -> Network {
        let freq = Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear).unwrap();
        let mut s = Array3::<Complex64>::zeros((1, 2, 2));
        s[[0, 0, 1]] = s12;
        s[[0, 1, 0]] = s21;
        let z0 = Array1::from_elem(2, Complex64::new(50.0, 0.0));
        Network::with_port_z0(freq, s, z0).unwrap()
    }

    #[test]
    fn test_is_reciprocal() {
        assert!(two_port(Complex64::new(0.5, 0.1), Complex64::new(0.5, 0.1)).is_reciprocal(None));
        assert!(!two_port(Complex64::new(0.5, 0.1), Complex64::new(0.1, 0.5)).is_reciprocal(None));
    }

    #[test]
    fn test_is_passive() {
        assert!(two_port(Complex64::new(0.9, 0.0), Complex64::new(0.9, 0.0)).is_passive(None));
        // Gain in one direction
        assert!(!two_port(Complex64::new(0.1, 0.0), Complex64::new(2.0, 0.0)).is_passive(None));
    }

    #[test]
    fn test_is_passive_uses_singular_values() {
        // Every column norm is below 1 but the matrix amplifies [1, 1]
        let freq = Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear).unwrap();
        let s = Array3::from_elem((1, 2, 2), Complex64::new(0.6, 0.0));
        let z0 = Array1::from_elem(2, Complex64::new(50.0, 0.0));
        let ntwk = Network::with_port_z0(freq, s, z0).unwrap();
        assert!(!ntwk.is_passive(None));
    }
}
