//! S-parameter transformation functions
//!
//! Conversions between scattering (S) and impedance (Z) matrices at arbitrary,
//! possibly complex and frequency-dependent, port reference impedances.
//!
//! Per-frequency functions (`s_to_z`, `z_to_s`) operate on a single n x n
//! matrix; the batch functions (`s2z`, `z2s`, `renormalize_s`) apply them to
//! every slice of an `[nfreq, nports, nports]` array with an `[nfreq, nports]`
//! reference impedance array.

use ndarray::{s, Array2, Array3, ArrayView1, ArrayView2};
use num_complex::Complex64;

use super::linalg::inv_complex;
use super::matrix_ops::{check_z0, diag_from_fn, identity, try_map_freq};
use crate::error::{NetworkError, Result};

/// Wave definition used to relate S-parameters to port voltages and currents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveDefinition {
    /// Pseudo-waves normalized by sqrt(z0).
    ///
    /// a = (V + z0 I) / (2 sqrt(z0)), b = (V - z0 I) / (2 sqrt(z0)).
    /// Defined for every non-zero finite complex z0, including purely
    /// reactive references.
    #[default]
    Pseudo,
    /// Power waves (Kurokawa).
    ///
    /// a = (V + z0 I) / (2 sqrt|Re z0|), b = (V - z0* I) / (2 sqrt|Re z0|).
    /// Undefined when Re(z0) = 0.
    Power,
}

fn check_square(s: &ArrayView2<'_, Complex64>, z0: &ArrayView1<'_, Complex64>) -> Result<usize> {
    let (m, n) = s.dim();
    if m != n || n != z0.len() {
        return Err(NetworkError::shape(
            format!("{0}x{0} matrix with {0} reference impedances", z0.len()),
            format!("{}x{} matrix", m, n),
        ));
    }
    Ok(n)
}

/// Normalization matrix for power waves: diag(1 / (2 sqrt|Re z0|))
fn power_norm(z0: &ArrayView1<'_, Complex64>, operation: &'static str) -> Result<Array2<Complex64>> {
    if z0.iter().any(|z| z.re == 0.0) {
        return Err(NetworkError::singular(operation));
    }
    Ok(diag_from_fn(z0.view(), |z| {
        Complex64::new(1.0 / (2.0 * z.re.abs().sqrt()), 0.0)
    }))
}

/// Convert an S-matrix to a Z-matrix at one frequency point
///
/// Pseudo:  Z = F (I + S) (I - S)^-1 F,            F = diag(sqrt(z0))
/// Power:   Z = F^-1 (I - S)^-1 (S G + G*) F,      F = diag(1/(2 sqrt|Re z0|)), G = diag(z0)
///
/// Fails with `SingularMatrix` if (I - S) cannot be inverted.
pub fn s_to_z(
    s: ArrayView2<'_, Complex64>,
    z0: ArrayView1<'_, Complex64>,
    wave: WaveDefinition,
) -> Result<Array2<Complex64>> {
    let n = check_square(&s, &z0)?;
    check_z0(z0.view())?;
    let eye = identity(n);

    let inv_i_minus_s =
        inv_complex(&(&eye - &s)).ok_or_else(|| NetworkError::singular("s_to_z"))?;

    let z = match wave {
        WaveDefinition::Pseudo => {
            let f_mat = diag_from_fn(z0.view(), |z| z.sqrt());
            f_mat.dot(&(&eye + &s)).dot(&inv_i_minus_s).dot(&f_mat)
        }
        WaveDefinition::Power => {
            let f_mat = power_norm(&z0, "s_to_z")?;
            let f_inv = diag_from_fn(f_mat.diag(), |x| Complex64::new(1.0, 0.0) / x);
            let g = diag_from_fn(z0.view(), |z| z);
            let g_conj = diag_from_fn(z0.view(), |z| z.conj());
            let term = s.dot(&g) + &g_conj;
            f_inv.dot(&inv_i_minus_s).dot(&term).dot(&f_mat)
        }
    };
    Ok(z)
}

/// Convert a Z-matrix to an S-matrix at one frequency point
///
/// Pseudo:  S = F^-1 (Z - G) (Z + G)^-1 F,   F = diag(sqrt(z0))
/// Power:   S = F (Z - G*) (Z + G)^-1 F^-1,  F = diag(1/(2 sqrt|Re z0|))
///
/// Fails with `SingularMatrix` if (Z + G) cannot be inverted.
pub fn z_to_s(
    z: ArrayView2<'_, Complex64>,
    z0: ArrayView1<'_, Complex64>,
    wave: WaveDefinition,
) -> Result<Array2<Complex64>> {
    check_square(&z, &z0)?;
    check_z0(z0.view())?;

    let g = diag_from_fn(z0.view(), |z| z);
    let inv_z_plus_g = inv_complex(&(&z + &g)).ok_or_else(|| NetworkError::singular("z_to_s"))?;

    let s = match wave {
        WaveDefinition::Pseudo => {
            let f_mat = diag_from_fn(z0.view(), |z| z.sqrt());
            let f_inv = diag_from_fn(z0.view(), |z| Complex64::new(1.0, 0.0) / z.sqrt());
            f_inv.dot(&(&z - &g)).dot(&inv_z_plus_g).dot(&f_mat)
        }
        WaveDefinition::Power => {
            let f_mat = power_norm(&z0, "z_to_s")?;
            let f_inv = diag_from_fn(f_mat.diag(), |x| Complex64::new(1.0, 0.0) / x);
            let g_conj = diag_from_fn(z0.view(), |z| z.conj());
            f_mat.dot(&(&z - &g_conj)).dot(&inv_z_plus_g).dot(&f_inv)
        }
    };
    Ok(s)
}

fn check_batch(p: &Array3<Complex64>, z0: &Array2<Complex64>) -> Result<(usize, usize)> {
    let (nfreq, n, m) = p.dim();
    if n != m || z0.dim() != (nfreq, n) {
        return Err(NetworkError::shape(
            format!("z0 of shape ({}, {})", nfreq, n),
            format!("z0 of shape {:?}", z0.dim()),
        ));
    }
    Ok((nfreq, n))
}

/// Convert S-parameters to Z-parameters for every frequency point
pub fn s2z(
    s: &Array3<Complex64>,
    z0: &Array2<Complex64>,
    wave: WaveDefinition,
) -> Result<Array3<Complex64>> {
    let (nfreq, nports) = check_batch(s, z0)?;
    try_map_freq(nfreq, nports, |f| {
        s_to_z(s.slice(s![f, .., ..]), z0.row(f), wave)
    })
}

/// Convert Z-parameters to S-parameters for every frequency point
pub fn z2s(
    z: &Array3<Complex64>,
    z0: &Array2<Complex64>,
    wave: WaveDefinition,
) -> Result<Array3<Complex64>> {
    let (nfreq, nports) = check_batch(z, z0)?;
    try_map_freq(nfreq, nports, |f| {
        z_to_s(z.slice(s![f, .., ..]), z0.row(f), wave)
    })
}

/// Renormalize S-parameters from `z_old` to `z_new`, frequency by frequency
///
/// Each slice goes S(z_old) -> Z -> S(z_new); the impedance matrix is unchanged.
/// Slices whose reference impedances are identical are copied as-is, so
/// networks without an impedance matrix (e.g. an ideal shunt junction) survive
/// a renormalization to their own reference.
pub fn renormalize_s(
    s: &Array3<Complex64>,
    z_old: &Array2<Complex64>,
    z_new: &Array2<Complex64>,
    wave: WaveDefinition,
) -> Result<Array3<Complex64>> {
    let (nfreq, nports) = check_batch(s, z_old)?;
    check_batch(s, z_new)?;
    try_map_freq(nfreq, nports, |f| {
        if z_old.row(f) == z_new.row(f) {
            check_z0(z_new.row(f))?;
            return Ok(s.slice(s![f, .., ..]).to_owned());
        }
        let z = s_to_z(s.slice(s![f, .., ..]), z_old.row(f), wave)?;
        z_to_s(z.view(), z_new.row(f), wave)
    })
}
