//! One-port terminations
//!
//! A load is an ordinary 1-port [`Network`]. This module builds them from
//! reflection coefficients or impedances and recovers the impedance a load
//! presents at each frequency.

use ndarray::{s, Array1, Array3};
use num_complex::Complex64;

use crate::constants::FULL_REFLECTION_TOL;
use crate::error::{NetworkError, Result};
use crate::frequency::Frequency;
use crate::math::conversions::{dbdeg_2_reim, gamma_2_z, z_2_gamma};
use crate::network::Network;

/// Constructors for 1-port load networks
pub struct Load;

impl Load {
    /// Reflection-free termination (Γ = 0) referenced to `z0`
    pub fn matched(frequency: &Frequency, z0: impl Into<Complex64>) -> Result<Network> {
        Self::uniform_gamma(frequency, Complex64::new(0.0, 0.0), z0)
    }

    /// Load with the same reflection coefficient at every frequency
    pub fn uniform_gamma(
        frequency: &Frequency,
        gamma: Complex64,
        z0: impl Into<Complex64>,
    ) -> Result<Network> {
        let gamma = vec![gamma; frequency.npoints()];
        Self::from_gamma(frequency, &gamma, z0)
    }

    /// Load from a per-frequency reflection coefficient
    pub fn from_gamma(
        frequency: &Frequency,
        gamma: &[Complex64],
        z0: impl Into<Complex64>,
    ) -> Result<Network> {
        let nfreq = frequency.npoints();
        if gamma.len() != nfreq {
            return Err(NetworkError::shape(
                format!("{} reflection coefficients", nfreq),
                format!("{} reflection coefficients", gamma.len()),
            ));
        }
        let s = Array3::from_shape_fn((nfreq, 1, 1), |(f, _, _)| gamma[f]);
        Network::with_port_z0(frequency.clone(), s, Array1::from_elem(1, z0.into()))
    }

    /// Load with constant |Γ| in dB and phase in degrees
    pub fn from_gamma_db_deg(
        frequency: &Frequency,
        db: f64,
        deg: f64,
        z0: impl Into<Complex64>,
    ) -> Result<Network> {
        Self::uniform_gamma(frequency, dbdeg_2_reim(db, deg), z0)
    }

    /// Load presenting impedance `z[f]`, described against `z0`
    pub fn from_impedance(
        frequency: &Frequency,
        z: &[Complex64],
        z0: impl Into<Complex64>,
    ) -> Result<Network> {
        let z0 = z0.into();
        let gamma: Vec<Complex64> = z
            .iter()
            .enumerate()
            .map(|(f, &zf)| {
                let g = z_2_gamma(zf, z0);
                if g.re.is_finite() && g.im.is_finite() {
                    Ok(g)
                } else {
                    Err(NetworkError::InvalidImpedance {
                        freq_index: Some(f),
                        port: 0,
                        value: zf,
                    })
                }
            })
            .collect::<Result<_>>()?;
        Self::from_gamma(frequency, &gamma, z0)
    }
}

fn check_one_port(load: &Network) -> Result<()> {
    if load.nports() != 1 {
        return Err(NetworkError::shape(
            "1-port load",
            format!("{}-port network", load.nports()),
        ));
    }
    Ok(())
}

/// Reflection coefficient of a 1-port load at each frequency
pub fn load_gamma(load: &Network) -> Result<Array1<Complex64>> {
    check_one_port(load)?;
    Ok(load.s.slice(s![.., 0, 0]).to_owned())
}

/// Impedance presented by a 1-port load at each frequency
///
/// Z = z0 (1 + Γ) / (1 - Γ). Fails with `InvalidImpedance` where the result is
/// zero or not finite (ideal short or open).
pub fn load_impedance(load: &Network) -> Result<Array1<Complex64>> {
    let gamma = load_gamma(load)?;
    let mut z = Array1::<Complex64>::zeros(gamma.len());
    for (f, &g) in gamma.iter().enumerate() {
        let zf = gamma_2_z(g, load.z0[[f, 0]]);
        if !zf.re.is_finite() || !zf.im.is_finite() || zf.norm() == 0.0 {
            return Err(NetworkError::InvalidImpedance {
                freq_index: Some(f),
                port: 0,
                value: zf,
            });
        }
        z[f] = zf;
    }
    Ok(z)
}

/// Per-frequency flags: true where |Γ| = 1 within `FULL_REFLECTION_TOL`
pub fn fully_reflective(load: &Network) -> Result<Vec<bool>> {
    let gamma = load_gamma(load)?;
    Ok(gamma
        .iter()
        .map(|g| (g.norm() - 1.0).abs() <= FULL_REFLECTION_TOL)
        .collect())
}
