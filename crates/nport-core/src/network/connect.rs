//! Network connection functions
//!
//! Provides algorithms for connecting n-port networks together and for
//! terminating a port with a 1-port load.
//!
//! Based on the "sub-network growth" algorithm described in:
//! - Filipsson, Gunnar, "A New General Computer Algorithm for S-Matrix Calculation
//!   of Interconnected Multiports", 11th European Microwave Conference, 1981.

use std::borrow::Cow;
use std::collections::BTreeSet;

use ndarray::{concatenate, s, Array2, Array3, ArrayView1, Axis};
use num_complex::Complex64;

use super::core::Network;
use crate::constants::NEAR_ZERO;
use crate::error::{NetworkError, Result};
use crate::math::linalg::inv_complex;
use crate::math::matrix_ops::{identity, try_map_freq};
use crate::math::transforms::WaveDefinition;

/// Generic S-parameter connection algorithm.
///
/// Connects multiple port pairs within a single network. Surviving ports keep
/// their original relative order.
///
/// # Arguments
/// * `a` - S-parameter matrix [nfreq, nports, nports]
/// * `connections` - List of port pairs to connect [(k, l), ...]
pub fn innerconnect_multi_s(
    a: &Array3<Complex64>,
    connections: &[(usize, usize)],
) -> Result<Array3<Complex64>> {
    let (nfreq, nports, _) = a.dim();

    if connections.is_empty() {
        return Ok(a.clone());
    }

    // Identify internal and external ports
    let mut internal_set = BTreeSet::new();
    for &(k, l) in connections {
        for port in [k, l] {
            if port >= nports {
                return Err(NetworkError::PortIndexOutOfRange { port, nports });
            }
        }
        if k == l {
            return Err(NetworkError::InvalidConnection(format!(
                "cannot connect port {} to itself",
                k
            )));
        }
        if !internal_set.insert(k) || !internal_set.insert(l) {
            return Err(NetworkError::InvalidConnection(
                "port connected more than once".to_string(),
            ));
        }
    }

    let ext_ports: Vec<usize> = (0..nports).filter(|p| !internal_set.contains(p)).collect();
    let int_ports: Vec<usize> = connections.iter().flat_map(|&(k, l)| [k, l]).collect();
    let n_ext = ext_ports.len();
    let n_int = int_ports.len();

    // Connection matrix M (permutation matrix for the pairs)
    // For each pair (k, l), M[k, l] = 1 and M[l, k] = 1
    let mut m = Array2::<Complex64>::zeros((n_int, n_int));
    for i in 0..connections.len() {
        m[[2 * i, 2 * i + 1]] = Complex64::new(1.0, 0.0);
        m[[2 * i + 1, 2 * i]] = Complex64::new(1.0, 0.0);
    }

    try_map_freq(nfreq, n_ext, |f| {
        let a_f = a.slice(s![f, .., ..]);
        let rows_e = a_f.select(Axis(0), &ext_ports);
        let rows_i = a_f.select(Axis(0), &int_ports);

        let s_ee = rows_e.select(Axis(1), &ext_ports);
        let s_ei = rows_e.select(Axis(1), &int_ports);
        let s_ie = rows_i.select(Axis(1), &ext_ports);
        let s_ii = rows_i.select(Axis(1), &int_ports);

        // S_new = S_ee + S_ei * (I - M * S_ii)^-1 * M * S_ie
        let inv_block = inv_complex(&(identity(n_int) - m.dot(&s_ii)))
            .ok_or_else(|| NetworkError::singular("connect"))?;

        Ok(s_ee + s_ei.dot(&inv_block).dot(&m).dot(&s_ie))
    })
}

/// Connect two ports of a single n-port network's s-matrix.
pub fn innerconnect_s(a: &Array3<Complex64>, k: usize, l: usize) -> Result<Array3<Complex64>> {
    innerconnect_multi_s(a, &[(k, l)])
}

/// Place two S-parameter arrays on the block diagonal of a larger one
fn block_diag(a: &Array3<Complex64>, b: &Array3<Complex64>) -> Array3<Complex64> {
    let (nfreq, na, _) = a.dim();
    let nb = b.shape()[1];
    let mut c = Array3::<Complex64>::zeros((nfreq, na + nb, na + nb));
    c.slice_mut(s![.., ..na, ..na]).assign(a);
    c.slice_mut(s![.., na.., na..]).assign(b);
    c
}

/// Connect two n-port networks' s-matrices together.
///
/// Connects port `k` on network `A` to port `l` on network `B`.
/// The resultant network has (nports_a + nports_b - 2) ports: A's ports
/// without `k`, followed by B's ports without `l`.
///
/// Both joined ports must share the same reference impedance.
pub fn connect_s(
    a: &Array3<Complex64>,
    k: usize,
    b: &Array3<Complex64>,
    l: usize,
) -> Result<Array3<Complex64>> {
    let nfreq = a.shape()[0];
    let nports_a = a.shape()[1];
    let nports_b = b.shape()[1];

    if k >= nports_a {
        return Err(NetworkError::PortIndexOutOfRange {
            port: k,
            nports: nports_a,
        });
    }
    if l >= nports_b {
        return Err(NetworkError::PortIndexOutOfRange {
            port: l,
            nports: nports_b,
        });
    }
    if b.shape()[0] != nfreq {
        return Err(NetworkError::shape(
            format!("{} frequency points", nfreq),
            format!("{} frequency points", b.shape()[0]),
        ));
    }

    // Connect port k on A to port (nports_a + l) on composite
    innerconnect_s(&block_diag(a, b), k, nports_a + l)
}

/// True if two impedance columns agree to within rounding
fn same_z0(a: ArrayView1<'_, Complex64>, b: ArrayView1<'_, Complex64>) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (x - y).norm() <= NEAR_ZERO * x.norm().max(1.0))
}

/// Renormalize `port` of `net` so it joins a port referenced to `near` without
/// reflection: same impedance for pseudo waves, conjugate for power waves
/// (no-op if it already matches)
fn match_port_z0<'a>(
    net: &'a Network,
    port: usize,
    near: ArrayView1<'_, Complex64>,
    wave: WaveDefinition,
) -> Result<Cow<'a, Network>> {
    let target = match wave {
        WaveDefinition::Pseudo => near.to_owned(),
        WaveDefinition::Power => near.mapv(|z| z.conj()),
    };
    if same_z0(net.z0.column(port), target.view()) {
        return Ok(Cow::Borrowed(net));
    }
    let mut z0 = net.z0.clone();
    z0.column_mut(port).assign(&target);
    Ok(Cow::Owned(net.renormalized_with(z0, wave)?))
}

impl Network {
    /// Connect two ports of this network together (innerconnect)
    ///
    /// Connects port `k` to port `l`, resulting in a (nports-2)-port network.
    /// S is taken as pseudo-wave data; see [`Network::innerconnect_with`].
    pub fn innerconnect(&self, k: usize, l: usize) -> Result<Network> {
        self.innerconnect_with(k, l, WaveDefinition::Pseudo)
    }

    /// Connect two ports of this network, with S in the given wave definition
    ///
    /// If the two ports' references do not already form a reflection-free
    /// junction, port `l` is renormalized to match port `k` first.
    pub fn innerconnect_with(&self, k: usize, l: usize, wave: WaveDefinition) -> Result<Network> {
        self.check_port(k)?;
        self.check_port(l)?;
        let matched = match_port_z0(self, l, self.z0.column(k), wave)?;

        let s_new = innerconnect_s(&matched.s, k, l)?;
        let keep: Vec<usize> = (0..self.nports()).filter(|&i| i != k && i != l).collect();
        let z0_new = matched.z0.select(Axis(1), &keep);

        Network::new(self.frequency.clone(), s_new, z0_new)
    }

    /// Connect this network's port `k` to another network's port `l`
    ///
    /// Returns a new network with (nports_self + nports_other - 2) ports,
    /// numbered as this network's ports without `k`, then `other`'s ports
    /// without `l`. Both networks are taken as pseudo-wave data; use
    /// [`Network::connect_with`] for power-wave S-parameters.
    pub fn connect(&self, k: usize, other: &Network, l: usize) -> Result<Network> {
        self.connect_with(k, other, l, WaveDefinition::Pseudo)
    }

    /// Connect port `k` to `other`'s port `l`, with S in the given wave definition
    ///
    /// `other` is renormalized at port `l` to port `k`'s impedance (pseudo
    /// waves) or to its conjugate (power waves) unless it already uses it.
    pub fn connect_with(
        &self,
        k: usize,
        other: &Network,
        l: usize,
        wave: WaveDefinition,
    ) -> Result<Network> {
        self.check_same_nfreq(other)?;
        self.check_port(k)?;
        other.check_port(l)?;

        let other = match_port_z0(other, l, self.z0.column(k), wave)?;
        let s_new = connect_s(&self.s, k, &other.s, l)?;

        // Build new z0 by combining both networks' z0, excluding connected ports
        let keep_a: Vec<usize> = (0..self.nports()).filter(|&i| i != k).collect();
        let keep_b: Vec<usize> = (0..other.nports()).filter(|&i| i != l).collect();
        let z0_new = concatenate(
            Axis(1),
            &[
                self.z0.select(Axis(1), &keep_a).view(),
                other.z0.select(Axis(1), &keep_b).view(),
            ],
        )
        .map_err(|e| NetworkError::shape("stackable z0 arrays", e.to_string()))?;

        Network::new(self.frequency.clone(), s_new, z0_new)
    }

    /// Terminate `port` with a 1-port `load`
    ///
    /// Returns an (nports-1)-port network; ports after `port` shift down by one.
    pub fn terminate(&self, port: usize, load: &Network) -> Result<Network> {
        if load.nports() != 1 {
            return Err(NetworkError::shape(
                "1-port load",
                format!("{}-port network", load.nports()),
            ));
        }
        self.connect(port, load, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{Frequency, FrequencyUnit, SweepType};
    use ndarray::Array1;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn freq() -> Frequency {
        Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear).unwrap()
    }

    fn thru() -> Network {
        // Thru: S12=S21=1, S11=S22=0
        let mut s = Array3::<Complex64>::zeros((1, 2, 2));
        s[[0, 0, 1]] = c(1.0, 0.0);
        s[[0, 1, 0]] = c(1.0, 0.0);
        Network::with_port_z0(freq(), s, Array1::from_elem(2, c(50.0, 0.0))).unwrap()
    }

    fn one_port(gamma: Complex64) -> Network {
        let s = Array3::from_elem((1, 1, 1), gamma);
        Network::with_port_z0(freq(), s, Array1::from_elem(1, c(50.0, 0.0))).unwrap()
    }

    #[test]
    fn test_connect_two_thrus() {
        let connected = thru().connect(1, &thru(), 0).unwrap();
        assert_eq!(connected.nports(), 2);
        assert!((connected.s[[0, 0, 1]] - c(1.0, 0.0)).norm() < 1e-12);
        assert!(connected.s[[0, 0, 0]].norm() < 1e-12);
    }

    #[test]
    fn test_thru_terminated_by_load_reflects_load() {
        let gamma = c(0.3, -0.4);
        let reduced = thru().terminate(1, &one_port(gamma)).unwrap();
        assert_eq!(reduced.nports(), 1);
        assert!((reduced.s[[0, 0, 0]] - gamma).norm() < 1e-12);
    }

    #[test]
    fn test_port_out_of_range() {
        assert_eq!(
            thru().connect(2, &thru(), 0).unwrap_err(),
            NetworkError::PortIndexOutOfRange { port: 2, nports: 2 }
        );
        assert_eq!(
            thru().terminate(0, &one_port(c(0.0, 0.0))).map(|n| n.nports()),
            Ok(1)
        );
        assert!(matches!(
            thru().innerconnect(0, 0),
            Err(NetworkError::InvalidConnection(_))
        ));
    }

    #[test]
    fn test_resonant_termination_is_singular() {
        // S11 = 1 on port 0 against a Γ = 1 load: 1 - S11 Γ = 0
        let mut s = Array3::<Complex64>::zeros((1, 2, 2));
        s[[0, 0, 0]] = c(1.0, 0.0);
        s[[0, 1, 1]] = c(0.2, 0.0);
        let ntwk = Network::with_port_z0(freq(), s, Array1::from_elem(2, c(50.0, 0.0))).unwrap();
        let err = ntwk.terminate(0, &one_port(c(1.0, 0.0))).unwrap_err();
        assert_eq!(
            err,
            NetworkError::SingularMatrix {
                operation: "connect",
                freq_index: Some(0)
            }
        );
    }

    #[test]
    fn test_innerconnect_thru_ends_gives_empty_network() {
        // Closing a lossless thru on itself leaves no external ports
        let mut s = Array3::<Complex64>::zeros((1, 2, 2));
        s[[0, 0, 1]] = c(0.5, 0.0);
        s[[0, 1, 0]] = c(0.5, 0.0);
        let ntwk = Network::with_port_z0(freq(), s, Array1::from_elem(2, c(50.0, 0.0))).unwrap();
        let closed = ntwk.innerconnect(0, 1).unwrap();
        assert_eq!(closed.nports(), 0);
    }

    #[test]
    fn test_connect_mismatched_reference_renormalizes() {
        // A 50 ohm matched load described in a 25 ohm reference (Γ = 1/3)
        // terminating a 50 ohm thru must look matched from the other end.
        let load_25 = one_port(c(0.0, 0.0)).renormalized(25.0).unwrap();
        let reduced = thru().terminate(1, &load_25).unwrap();
        assert!(reduced.s[[0, 0, 0]].norm() < 1e-12);
        assert_eq!(reduced.z0[[0, 0]], c(50.0, 0.0));
    }
}
