//! Simulated 2-port sub-measurements
//!
//! Reduces an n-port to the 2-port a vector network analyzer would see on a
//! port pair while every other port is terminated by its load.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::pairs::{port_pairs, PortMap, PortPair};
use crate::error::Result;
use crate::network::{Network, PolarNoise};

/// Terminate every port outside `pair` with its load, leaving the 2-port (a, b)
pub fn measure_pair(dut: &Network, loads: &[Network], pair: PortPair) -> Result<Network> {
    super::check_loads(dut, loads)?;
    reduce(dut, loads, pair)
}

fn reduce(dut: &Network, loads: &[Network], pair: PortPair) -> Result<Network> {
    let mut map = PortMap::new(dut.nports());
    let mut reduced = dut.clone();
    for port in pair.other_ports(dut.nports()) {
        let idx = map.remove(port)?;
        trace!(port, index = idx, "terminating port");
        reduced = reduced.terminate(idx, &loads[port])?;
    }
    Ok(reduced.named(format!("{}{}", dut.name.as_deref().unwrap_or("meas"), pair)))
}

/// Simulate all C(n, 2) sub-measurements of `dut`
///
/// With `noise`, each measurement is perturbed by [`PolarNoise`] drawn from a
/// single generator seeded with `seed`, in pair order.
pub fn simulate_measurements(
    dut: &Network,
    loads: &[Network],
    noise: Option<&PolarNoise>,
    seed: u64,
) -> Result<BTreeMap<PortPair, Network>> {
    let mut rng = StdRng::seed_from_u64(seed);
    simulate_measurements_with_rng(dut, loads, noise, &mut rng)
}

/// Like [`simulate_measurements`], drawing noise from a caller-supplied generator
pub fn simulate_measurements_with_rng<R: Rng + ?Sized>(
    dut: &Network,
    loads: &[Network],
    noise: Option<&PolarNoise>,
    rng: &mut R,
) -> Result<BTreeMap<PortPair, Network>> {
    super::check_loads(dut, loads)?;
    debug!(nports = dut.nports(), nfreq = dut.nfreq(), "simulating sub-measurements");

    let mut measurements = BTreeMap::new();
    for pair in port_pairs(dut.nports()) {
        let mut meas = reduce(dut, loads, pair)?;
        if let Some(noise) = noise {
            meas = noise.apply(&meas, &mut *rng);
        }
        measurements.insert(pair, meas);
    }
    Ok(measurements)
}
