//! Network operations
//!
//! Port selection and reordering, element-wise arithmetic and comparison of
//! S-parameter data.

use std::ops::{Add, Sub};

use ndarray::{Array3, Axis};
use num_complex::Complex64;

use super::core::Network;
use crate::error::{NetworkError, Result};

impl Network {
    /// Renumber ports according to a mapping
    ///
    /// `from_ports` and `to_ports` specify the port renumbering: the port at
    /// `from_ports[i]` becomes port `to_ports[i]`.
    /// For example, renumbered(&[0,1], &[1,0]) swaps ports 0 and 1.
    pub fn renumbered(&self, from_ports: &[usize], to_ports: &[usize]) -> Result<Network> {
        let nports = self.nports();
        if from_ports.len() != nports || to_ports.len() != nports {
            return Err(NetworkError::shape(
                format!("{} port indices", nports),
                format!("{} -> {} port indices", from_ports.len(), to_ports.len()),
            ));
        }

        // Build reverse mapping: to_ports[i] -> from_ports[i]
        let mut mapping = vec![None; nports];
        for (&from, &to) in from_ports.iter().zip(to_ports) {
            for port in [from, to] {
                self.check_port(port)?;
            }
            mapping[to] = Some(from);
        }
        let mapping: Vec<usize> = mapping
            .into_iter()
            .collect::<Option<_>>()
            .ok_or_else(|| NetworkError::InvalidConnection("renumbering is not a permutation".into()))?;

        self.select_ports(&mapping)
    }

    /// Extract a subnetwork with specified ports
    ///
    /// Creates a new network containing only the specified ports, in the given
    /// order. Port indices are 0-based. No termination is applied: the
    /// remaining ports are simply ignored.
    pub fn subnetwork(&self, ports: &[usize]) -> Result<Network> {
        if ports.is_empty() {
            return Err(NetworkError::shape("at least one port", "empty port list"));
        }
        for &p in ports {
            self.check_port(p)?;
        }
        self.select_ports(ports)
    }

    fn select_ports(&self, ports: &[usize]) -> Result<Network> {
        let s_new = self.s.select(Axis(1), ports).select(Axis(2), ports);
        let z0_new = self.z0.select(Axis(1), ports);
        let mut ntwk = Network::new(self.frequency.clone(), s_new, z0_new)?;
        ntwk.name = self.name.clone();
        Ok(ntwk)
    }

    /// Largest element-wise |S_self - S_other| over all frequencies and ports
    pub fn max_abs_error(&self, other: &Network) -> Result<f64> {
        let diff = (self - other)?;
        Ok(diff.s.iter().fold(0.0_f64, |acc, c| acc.max(c.norm())))
    }

    /// True if both networks share shape and S agrees element-wise within `tol`
    ///
    /// Reference impedances are not compared.
    pub fn approx_eq(&self, other: &Network, tol: f64) -> bool {
        self.max_abs_error(other).map_or(false, |err| err <= tol)
    }

    fn check_same_shape(&self, other: &Network) -> Result<()> {
        self.check_same_nfreq(other)?;
        if self.nports() != other.nports() {
            return Err(NetworkError::shape(
                format!("{}-port network", self.nports()),
                format!("{}-port network", other.nports()),
            ));
        }
        Ok(())
    }

    fn with_s(&self, s: Array3<Complex64>) -> Result<Network> {
        Network::new(self.frequency.clone(), s, self.z0.clone())
    }
}

impl Add for &Network {
    type Output = Result<Network>;

    /// Element-wise addition of S-parameters
    fn add(self, other: &Network) -> Result<Network> {
        self.check_same_shape(other)?;
        self.with_s(&self.s + &other.s)
    }
}

impl Sub for &Network {
    type Output = Result<Network>;

    /// Element-wise subtraction of S-parameters
    fn sub(self, other: &Network) -> Result<Network> {
        self.check_same_shape(other)?;
        self.with_s(&self.s - &other.s)
    }
}
