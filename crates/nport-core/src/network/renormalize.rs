//! Reference impedance renormalization
//!
//! Recomputes S-parameters for a new set of port reference impedances. Each
//! frequency point goes S(old z0) -> Z -> S(new z0), so the impedance matrix,
//! i.e. the electrical behavior of the network, is unchanged.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use super::core::Network;
use crate::error::{NetworkError, Result};
use crate::math::transforms::{renormalize_s, WaveDefinition};

/// Target reference impedance for renormalization
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceImpedance {
    /// Same impedance on every port at every frequency (e.g. a 50 ohm system)
    Uniform(Complex64),
    /// One impedance per port, constant over frequency
    PerPort(Array1<Complex64>),
    /// Full [nfreq, nports] array
    PerFrequency(Array2<Complex64>),
}

impl ReferenceImpedance {
    /// Expand to a full [nfreq, nports] array
    pub fn resolve(&self, nfreq: usize, nports: usize) -> Result<Array2<Complex64>> {
        match self {
            ReferenceImpedance::Uniform(z) => Ok(Array2::from_elem((nfreq, nports), *z)),
            ReferenceImpedance::PerPort(z) => {
                if z.len() != nports {
                    return Err(NetworkError::shape(
                        format!("{} port impedances", nports),
                        format!("{} port impedances", z.len()),
                    ));
                }
                Ok(Array2::from_shape_fn((nfreq, nports), |(_, p)| z[p]))
            }
            ReferenceImpedance::PerFrequency(z) => {
                if z.dim() != (nfreq, nports) {
                    return Err(NetworkError::shape(
                        format!("z0 of shape ({}, {})", nfreq, nports),
                        format!("z0 of shape {:?}", z.dim()),
                    ));
                }
                Ok(z.clone())
            }
        }
    }
}

impl From<f64> for ReferenceImpedance {
    fn from(z: f64) -> Self {
        ReferenceImpedance::Uniform(Complex64::new(z, 0.0))
    }
}

impl From<Complex64> for ReferenceImpedance {
    fn from(z: Complex64) -> Self {
        ReferenceImpedance::Uniform(z)
    }
}

impl From<Array1<Complex64>> for ReferenceImpedance {
    fn from(z: Array1<Complex64>) -> Self {
        ReferenceImpedance::PerPort(z)
    }
}

impl From<Array2<Complex64>> for ReferenceImpedance {
    fn from(z: Array2<Complex64>) -> Self {
        ReferenceImpedance::PerFrequency(z)
    }
}

impl Network {
    /// Return a copy renormalized to `z0` (pseudo-wave definition)
    ///
    /// # Example
    /// ```
    /// use ndarray::{Array1, Array3};
    /// use num_complex::Complex64;
    /// use nport_core::frequency::{Frequency, FrequencyUnit, SweepType};
    /// use nport_core::Network;
    ///
    /// let freq = Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear).unwrap();
    /// let s = Array3::<Complex64>::zeros((1, 1, 1));
    /// let z0 = Array1::from_elem(1, Complex64::new(50.0, 0.0));
    /// let matched = Network::with_port_z0(freq, s, z0).unwrap();
    ///
    /// // A 50 ohm termination seen from 25 ohm reflects 1/3
    /// let renorm = matched.renormalized(25.0).unwrap();
    /// assert!((renorm.s[[0, 0, 0]].re - 1.0 / 3.0).abs() < 1e-12);
    /// ```
    pub fn renormalized(&self, z0: impl Into<ReferenceImpedance>) -> Result<Network> {
        self.renormalized_with(z0, WaveDefinition::Pseudo)
    }

    /// Return a copy renormalized to `z0` using the given wave definition
    pub fn renormalized_with(
        &self,
        z0: impl Into<ReferenceImpedance>,
        wave: WaveDefinition,
    ) -> Result<Network> {
        let z_new = z0.into().resolve(self.nfreq(), self.nports())?;
        let s = renormalize_s(&self.s, &self.z0, &z_new, wave)?;
        Ok(Network {
            frequency: self.frequency.clone(),
            s,
            z0: z_new,
            name: self.name.clone(),
        })
    }

    /// Renormalize in place (pseudo-wave definition)
    ///
    /// On error the network is left unchanged.
    pub fn renormalize(&mut self, z0: impl Into<ReferenceImpedance>) -> Result<()> {
        self.renormalize_with(z0, WaveDefinition::Pseudo)
    }

    /// Renormalize in place using the given wave definition
    pub fn renormalize_with(
        &mut self,
        z0: impl Into<ReferenceImpedance>,
        wave: WaveDefinition,
    ) -> Result<()> {
        let z_new = z0.into().resolve(self.nfreq(), self.nports())?;
        let s = renormalize_s(&self.s, &self.z0, &z_new, wave)?;
        self.s = s;
        self.z0 = z_new;
        Ok(())
    }
}
