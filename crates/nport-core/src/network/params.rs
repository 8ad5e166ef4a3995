//! Network parameter properties (S, Z)
//!
//! Provides access to the S-parameter data and derived impedance parameters.

use ndarray::{Array2, Array3};
use num_complex::Complex64;

use super::core::Network;
use crate::error::Result;
use crate::frequency::Frequency;
use crate::math::conversions::{complex_2_db, complex_2_degree};
use crate::math::transforms::{s2z, WaveDefinition};

impl Network {
    /// Get reference impedance [nfreq, nports]
    pub fn z0(&self) -> &Array2<Complex64> {
        &self.z0
    }

    /// Get S-parameters
    pub fn s(&self) -> &Array3<Complex64> {
        &self.s
    }

    /// Get frequency object
    pub fn frequency(&self) -> &Frequency {
        &self.frequency
    }

    /// Get frequency vector in Hz
    pub fn f(&self) -> &[f64] {
        self.frequency.f()
    }

    /// Get Z-parameters (impedance), pseudo-wave definition
    pub fn z(&self) -> Result<Array3<Complex64>> {
        self.z_with(WaveDefinition::Pseudo)
    }

    /// Get Z-parameters assuming `s` follows the given wave definition
    pub fn z_with(&self, wave: WaveDefinition) -> Result<Array3<Complex64>> {
        s2z(&self.s, &self.z0, wave)
    }

    /// Get S-parameter magnitude in dB
    pub fn s_db(&self) -> Array3<f64> {
        self.s.mapv(complex_2_db)
    }

    /// Get S-parameter phase in degrees
    pub fn s_deg(&self) -> Array3<f64> {
        self.s.mapv(complex_2_degree)
    }

    /// Get S-parameter magnitude
    pub fn s_mag(&self) -> Array3<f64> {
        self.s.mapv(|c| c.norm())
    }
}
