//! Unit conversion functions
//!
//! Conversions between complex-number representations (magnitude, dB, phase)
//! and between reflection coefficient and impedance.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Convert complex number to dB (20*log10(|z|))
pub fn complex_2_db(z: Complex64) -> f64 {
    20.0 * z.norm().log10()
}

/// Convert complex number to phase in degrees
pub fn complex_2_degree(z: Complex64) -> f64 {
    z.arg() * 180.0 / PI
}

/// Convert dB to magnitude (10^(dB/20))
pub fn db_2_mag(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert (magnitude, degree) to complex
pub fn magdeg_2_reim(mag: f64, deg: f64) -> Complex64 {
    Complex64::from_polar(mag, degree_2_radian(deg))
}

/// Convert (dB, degree) to complex
pub fn dbdeg_2_reim(db: f64, deg: f64) -> Complex64 {
    magdeg_2_reim(db_2_mag(db), deg)
}

/// Convert degrees to radians
pub fn degree_2_radian(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Impedance seen through reflection coefficient `gamma` against `z0`
///
/// Z = z0 (1 + Γ) / (1 - Γ). Γ = 1 (open) gives a non-finite result.
pub fn gamma_2_z(gamma: Complex64, z0: Complex64) -> Complex64 {
    let one = Complex64::new(1.0, 0.0);
    z0 * (one + gamma) / (one - gamma)
}

/// Reflection coefficient of impedance `z` against `z0`
///
/// Γ = (Z - z0) / (Z + z0)
pub fn z_2_gamma(z: Complex64, z0: Complex64) -> Complex64 {
    (z - z0) / (z + z0)
}
