//! N-port reconstruction from 2-port sub-measurements
//!
//! A vector network analyzer with two ports measures an n-port one port pair
//! at a time while the remaining ports are terminated by loads. This module
//! simulates such measurements and assembles the full n-port from them,
//! either by stitching the raw 2-ports (valid for matched terminations) or by
//! first renormalizing each 2-port to the impedances of the loads it was
//! measured against (Tippet's method), which is exact for any loads as long as
//! at most one of them reflects fully.

mod assemble;
mod measure;
mod pairs;

pub use assemble::{
    merge_two_ports, reconstruct, reconstruct_from_dut, CompositeAssembler, Reconstruction,
    ReconstructionOptions,
};
pub use measure::{measure_pair, simulate_measurements, simulate_measurements_with_rng};
pub use pairs::{port_pairs, PortMap, PortPair};

use crate::error::{NetworkError, Result};
use crate::network::Network;

/// Loads must be one 1-port per DUT port on the DUT's frequency grid
pub(crate) fn check_loads(dut: &Network, loads: &[Network]) -> Result<()> {
    if loads.len() != dut.nports() {
        return Err(NetworkError::shape(
            format!("{} loads", dut.nports()),
            format!("{} loads", loads.len()),
        ));
    }
    check_load_set(loads, dut.nfreq())
}

pub(crate) fn check_load_set(loads: &[Network], nfreq: usize) -> Result<()> {
    for (port, load) in loads.iter().enumerate() {
        if load.nports() != 1 {
            return Err(NetworkError::shape(
                format!("1-port load on port {}", port),
                format!("{}-port network", load.nports()),
            ));
        }
        if load.nfreq() != nfreq {
            return Err(NetworkError::shape(
                format!("load on port {} with {} frequency points", port, nfreq),
                format!("{} frequency points", load.nfreq()),
            ));
        }
    }
    Ok(())
}
