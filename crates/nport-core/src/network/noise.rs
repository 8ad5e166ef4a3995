//! Measurement noise model
//!
//! Perturbs S-parameters in polar form to emulate instrument noise when
//! simulating sub-measurements.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use super::core::Network;
use crate::math::conversions::degree_2_radian;

/// Bounded uniform noise on magnitude and phase
///
/// Every S-parameter entry `s` becomes `(|s| + dm) * exp(j (arg s + dp))` with
/// `dm` uniform in `[-mag_dev, mag_dev]` and `dp` uniform in
/// `[-phase_dev_deg, phase_dev_deg]` degrees, drawn independently per entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarNoise {
    /// Magnitude deviation (linear)
    pub mag_dev: f64,
    /// Phase deviation in degrees
    pub phase_dev_deg: f64,
}

/// Largest magnitude deviation whose sampling span stays finite
const MAX_MAG_DEV: f64 = f64::MAX / 4.0;
/// Phase deviations beyond half a turn cover the full circle already
const MAX_PHASE_DEV_DEG: f64 = 180.0;

impl PolarNoise {
    /// Deviations are taken as absolute values; non-finite values mean no noise.
    ///
    /// Magnitude deviation is capped at `f64::MAX / 4`, phase at 180 degrees.
    pub fn new(mag_dev: f64, phase_dev_deg: f64) -> Self {
        Self {
            mag_dev: bounded(mag_dev, MAX_MAG_DEV),
            phase_dev_deg: bounded(phase_dev_deg, MAX_PHASE_DEV_DEG),
        }
    }

    /// True if applying this noise leaves data unchanged
    pub fn is_zero(&self) -> bool {
        self.mag_dev == 0.0 && self.phase_dev_deg == 0.0
    }

    // Fields are public, so bound them again here
    fn distributions(&self) -> (Uniform<f64>, Uniform<f64>) {
        let mag = bounded(self.mag_dev, MAX_MAG_DEV);
        let phase = bounded(self.phase_dev_deg, MAX_PHASE_DEV_DEG);
        (
            Uniform::new_inclusive(-mag, mag),
            Uniform::new_inclusive(-phase, phase),
        )
    }

    /// Perturb a single complex value
    pub fn perturb<R: Rng + ?Sized>(&self, value: Complex64, rng: &mut R) -> Complex64 {
        let (mag, phase) = self.distributions();
        perturb_with(value, &mag, &phase, rng)
    }

    /// Return a noisy copy of `ntwk`; frequency grid and z0 are kept
    pub fn apply<R: Rng + ?Sized>(&self, ntwk: &Network, rng: &mut R) -> Network {
        let mut noisy = ntwk.clone();
        if self.is_zero() {
            return noisy;
        }
        let (mag, phase) = self.distributions();
        noisy
            .s
            .mapv_inplace(|v| perturb_with(v, &mag, &phase, &mut *rng));
        noisy
    }
}

fn bounded(x: f64, cap: f64) -> f64 {
    if x.is_finite() {
        x.abs().min(cap)
    } else {
        0.0
    }
}

fn perturb_with<R: Rng + ?Sized>(
    value: Complex64,
    mag: &Uniform<f64>,
    phase: &Uniform<f64>,
    rng: &mut R,
) -> Complex64 {
    let (r, theta) = value.to_polar();
    Complex64::from_polar(
        r + mag.sample(rng),
        theta + degree_2_radian(phase.sample(rng)),
    )
}

impl Network {
    /// Copy with polar noise drawn from a generator seeded with `seed`
    pub fn with_polar_noise(&self, noise: &PolarNoise, seed: u64) -> Network {
        let mut rng = StdRng::seed_from_u64(seed);
        noise.apply(self, &mut rng)
    }
}
