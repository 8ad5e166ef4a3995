//! Synthetic networks
//!
//! Known devices used to exercise and benchmark reconstruction: seeded random
//! passive reciprocal n-ports, the ideal tee junction and an ideal thru.

use ndarray::{s, Array1, Array2, Array3};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

use crate::constants::{NEAR_ZERO, Z0_SYSTEM};
use crate::error::Result;
use crate::frequency::Frequency;
use crate::math::linalg::spectral_norm;
use crate::network::Network;

/// Largest singular value of a generated random network
const PASSIVE_MARGIN: f64 = 0.9;

/// Random reciprocal, strictly passive n-port at the system impedance
///
/// Each frequency slice is an independent symmetric complex matrix with
/// entries uniform in the unit square, scaled so its largest singular value is
/// 0.9. The same seed always yields the same network.
pub fn random_passive(frequency: &Frequency, nports: usize, seed: u64) -> Result<Network> {
    let nfreq = frequency.npoints();
    let mut rng = StdRng::seed_from_u64(seed);
    let unit = Uniform::new_inclusive(-1.0, 1.0);

    let mut s = Array3::<Complex64>::zeros((nfreq, nports, nports));
    for f in 0..nfreq {
        let mut m = Array2::<Complex64>::zeros((nports, nports));
        for i in 0..nports {
            for j in i..nports {
                let v = Complex64::new(unit.sample(&mut rng), unit.sample(&mut rng));
                m[[i, j]] = v;
                m[[j, i]] = v;
            }
        }
        let norm = spectral_norm(&m);
        if norm > NEAR_ZERO {
            m.mapv_inplace(|v| v * (PASSIVE_MARGIN / norm));
        }
        s.slice_mut(s![f, .., ..]).assign(&m);
    }

    let z0 = Array1::from_elem(nports, Complex64::new(Z0_SYSTEM, 0.0));
    Ok(Network::with_port_z0(frequency.clone(), s, z0)?.named(format!("random_{}port", nports)))
}

/// Ideal 3-port tee junction at 50 ohm
///
/// S_ii = -1/3 and S_ij = 2/3 at every frequency. All three ports share one
/// node, so the device has no impedance matrix.
pub fn ideal_tee(frequency: &Frequency) -> Result<Network> {
    let s = Array3::from_shape_fn((frequency.npoints(), 3, 3), |(_, i, j)| {
        if i == j {
            Complex64::new(-1.0 / 3.0, 0.0)
        } else {
            Complex64::new(2.0 / 3.0, 0.0)
        }
    });
    let z0 = Array1::from_elem(3, Complex64::new(Z0_SYSTEM, 0.0));
    Ok(Network::with_port_z0(frequency.clone(), s, z0)?.named("tee"))
}

/// Ideal 2-port thru (S21 = S12 = 1) at `z0`
pub fn thru(frequency: &Frequency, z0: impl Into<Complex64>) -> Result<Network> {
    let s = Array3::from_shape_fn((frequency.npoints(), 2, 2), |(_, i, j)| {
        if i == j {
            Complex64::new(0.0, 0.0)
        } else {
            Complex64::new(1.0, 0.0)
        }
    });
    let z0 = Array1::from_elem(2, z0.into());
    Ok(Network::with_port_z0(frequency.clone(), s, z0)?.named("thru"))
}
