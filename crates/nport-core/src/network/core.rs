//! Core Network struct and constructors
//!
//! Contains the fundamental Network data structure and factory methods.

use ndarray::{Array1, Array2, Array3};
use num_complex::Complex64;

use super::renormalize::ReferenceImpedance;
use crate::error::{NetworkError, Result};
use crate::frequency::Frequency;
use crate::math::transforms::{z2s, WaveDefinition};

/// An N-port electrical network
///
/// Networks are values: every transforming operation returns a new network,
/// except [`Network::renormalize`] which replaces `s`/`z0` only after the new
/// state has been computed successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    /// Frequency data
    pub frequency: Frequency,
    /// S-parameter data [nfreq, nports, nports]
    pub s: Array3<Complex64>,
    /// Reference impedance [nfreq, nports]
    pub z0: Array2<Complex64>,
    /// Network name
    pub name: Option<String>,
}

impl Network {
    /// Create a new Network from S-parameters
    ///
    /// Fails with `ShapeMismatch` unless `s` is [nfreq, n, n] and `z0` is
    /// [nfreq, n] with nfreq equal to the number of frequency points.
    pub fn new(frequency: Frequency, s: Array3<Complex64>, z0: Array2<Complex64>) -> Result<Self> {
        let (nfreq, n, m) = s.dim();
        if n != m {
            return Err(NetworkError::shape(
                "square S-matrices",
                format!("S of shape ({}, {}, {})", nfreq, n, m),
            ));
        }
        if nfreq != frequency.npoints() {
            return Err(NetworkError::shape(
                format!("{} frequency points", frequency.npoints()),
                format!("S with {} frequency points", nfreq),
            ));
        }
        if z0.dim() != (nfreq, n) {
            return Err(NetworkError::shape(
                format!("z0 of shape ({}, {})", nfreq, n),
                format!("z0 of shape {:?}", z0.dim()),
            ));
        }

        Ok(Self {
            frequency,
            s,
            z0,
            name: None,
        })
    }

    /// Create a Network whose per-port reference impedance is constant over frequency
    ///
    /// `z0` must hold exactly one impedance per port.
    pub fn with_port_z0(
        frequency: Frequency,
        s: Array3<Complex64>,
        z0: Array1<Complex64>,
    ) -> Result<Self> {
        let (nfreq, _, nports) = s.dim();
        let z0_full = ReferenceImpedance::PerPort(z0).resolve(nfreq, nports)?;
        Self::new(frequency, s, z0_full)
    }

    /// Create a Network from Z-parameters, referenced to `z0`
    pub fn from_z(
        frequency: Frequency,
        z: &Array3<Complex64>,
        z0: Array2<Complex64>,
    ) -> Result<Self> {
        let s = z2s(z, &z0, WaveDefinition::Pseudo)?;
        Self::new(frequency, s, z0)
    }

    /// Set the network name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Get the number of ports
    #[inline]
    pub fn nports(&self) -> usize {
        self.s.shape()[1]
    }

    /// Get the number of frequency points
    #[inline]
    pub fn nfreq(&self) -> usize {
        self.s.shape()[0]
    }

    /// Fail with `ShapeMismatch` unless `other` has the same frequency count
    pub(crate) fn check_same_nfreq(&self, other: &Network) -> Result<()> {
        if self.nfreq() != other.nfreq() {
            return Err(NetworkError::shape(
                format!("{} frequency points", self.nfreq()),
                format!("{} frequency points", other.nfreq()),
            ));
        }
        Ok(())
    }

    /// Fail with `PortIndexOutOfRange` unless `port` exists
    pub(crate) fn check_port(&self, port: usize) -> Result<()> {
        if port >= self.nports() {
            return Err(NetworkError::PortIndexOutOfRange {
                port,
                nports: self.nports(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{FrequencyUnit, SweepType};

    fn freq(n: usize) -> Frequency {
        Frequency::new(1.0, 10.0, n, FrequencyUnit::GHz, SweepType::Linear).unwrap()
    }

    #[test]
    fn test_network_creation() {
        let s = Array3::<Complex64>::zeros((10, 2, 2));
        let z0 = Array1::from_elem(2, Complex64::new(50.0, 0.0));
        let ntwk = Network::with_port_z0(freq(10), s, z0).unwrap();

        assert_eq!(ntwk.nports(), 2);
        assert_eq!(ntwk.nfreq(), 10);
        assert_eq!(ntwk.z0.dim(), (10, 2));
        assert_eq!(ntwk.z0[[9, 1]].re, 50.0);
    }

    #[test]
    fn test_network_shape_checks() {
        let z0 = Array2::from_elem((10, 2), Complex64::new(50.0, 0.0));

        let non_square = Array3::<Complex64>::zeros((10, 2, 3));
        assert!(matches!(
            Network::new(freq(10), non_square, z0.clone()),
            Err(NetworkError::ShapeMismatch { .. })
        ));

        let wrong_nfreq = Array3::<Complex64>::zeros((9, 2, 2));
        assert!(matches!(
            Network::new(freq(10), wrong_nfreq, z0),
            Err(NetworkError::ShapeMismatch { .. })
        ));

        let s = Array3::<Complex64>::zeros((10, 2, 2));
        let z0_bad = Array1::from_elem(3, Complex64::new(50.0, 0.0));
        assert!(matches!(
            Network::with_port_z0(freq(10), s, z0_bad),
            Err(NetworkError::ShapeMismatch { .. })
        ));

        // A single impedance is not spread over several ports
        let three_port = Array3::<Complex64>::zeros((10, 3, 3));
        let z0_one = Array1::from_elem(1, Complex64::new(50.0, 0.0));
        assert!(matches!(
            Network::with_port_z0(freq(10), three_port, z0_one),
            Err(NetworkError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_z_series_resistor() {
        // Z of a single 100 ohm resistor to ground; S11 at 50 ohm = 1/3
        let z = Array3::from_elem((1, 1, 1), Complex64::new(100.0, 0.0));
        let z0 = Array2::from_elem((1, 1), Complex64::new(50.0, 0.0));
        let ntwk = Network::from_z(freq(1), &z, z0).unwrap().named("r100");

        assert!((ntwk.s[[0, 0, 0]] - Complex64::new(1.0 / 3.0, 0.0)).norm() < 1e-12);
        assert_eq!(ntwk.name.as_deref(), Some("r100"));
    }
}
