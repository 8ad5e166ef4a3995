//! Python bindings for nport-core
//!
//! This module exposes nport-core functionality to Python via PyO3.
//!
//! ## Classes
//!
//! - `Frequency` - Frequency grid representation
//! - `Network` - N-port network with renormalization and port connection
//!
//! ## Functions
//!
//! - load constructors (`matched_load`, `load_from_gamma`, `load_from_impedance`)
//! - `reconstruct`, `reconstruct_measurements` - n-port reconstruction

use std::collections::{BTreeMap, HashMap};

use num_complex::Complex64;
use nport_core::load::Load;
use nport_core::multiport::{reconstruct as reconstruct_core, reconstruct_from_dut, PortPair};
use nport_core::{Network, NetworkError, PolarNoise, ReconstructionOptions};
use numpy::PyReadonlyArray1;
use pyo3::exceptions::{PyArithmeticError, PyIndexError, PyKeyError, PyValueError};
use pyo3::prelude::*;

mod frequency;
mod network;

pub use frequency::PyFrequency;
pub use network::PyNetwork;

/// Map core errors onto Python exception types
pub(crate) fn to_py_err(err: NetworkError) -> PyErr {
    let msg = err.to_string();
    match err {
        NetworkError::PortIndexOutOfRange { .. } => PyIndexError::new_err(msg),
        NetworkError::SingularMatrix { .. } => PyArithmeticError::new_err(msg),
        NetworkError::MissingMeasurement(_) | NetworkError::DuplicateMeasurement(_) => {
            PyKeyError::new_err(msg)
        }
        _ => PyValueError::new_err(msg),
    }
}

/// Reflection-free 1-port load
#[pyfunction]
#[pyo3(signature = (frequency, z0=Complex64::new(50.0, 0.0)))]
fn matched_load(frequency: &PyFrequency, z0: Complex64) -> PyResult<PyNetwork> {
    Load::matched(frequency.inner(), z0)
        .map(PyNetwork::from_network)
        .map_err(to_py_err)
}

/// 1-port load from reflection coefficients, one per frequency
#[pyfunction]
#[pyo3(signature = (frequency, gamma, z0=Complex64::new(50.0, 0.0)))]
fn load_from_gamma(
    frequency: &PyFrequency,
    gamma: PyReadonlyArray1<'_, Complex64>,
    z0: Complex64,
) -> PyResult<PyNetwork> {
    let gamma = gamma.as_array().to_vec();
    Load::from_gamma(frequency.inner(), &gamma, z0)
        .map(PyNetwork::from_network)
        .map_err(to_py_err)
}

/// 1-port load from impedances, one per frequency
#[pyfunction]
#[pyo3(signature = (frequency, z, z0=Complex64::new(50.0, 0.0)))]
fn load_from_impedance(
    frequency: &PyFrequency,
    z: PyReadonlyArray1<'_, Complex64>,
    z0: Complex64,
) -> PyResult<PyNetwork> {
    let z = z.as_array().to_vec();
    Load::from_impedance(frequency.inner(), &z, z0)
        .map(PyNetwork::from_network)
        .map_err(to_py_err)
}

fn build_options(
    renormalize: bool,
    z_system: Complex64,
    wave: &str,
    noise: Option<(f64, f64)>,
    seed: u64,
) -> PyResult<ReconstructionOptions> {
    let mut options = ReconstructionOptions::default()
        .with_renormalize(renormalize)
        .with_z_system(z_system)
        .with_wave(network::parse_wave(wave)?);
    if let Some((mag, phase_deg)) = noise {
        options = options.with_noise(PolarNoise::new(mag, phase_deg), seed);
    }
    Ok(options)
}

fn unwrap_loads(loads: &[PyRef<'_, PyNetwork>]) -> Vec<Network> {
    loads.iter().map(|l| l.inner().clone()).collect()
}

/// Simulate the 2-port sub-measurements of `dut` and reconstruct it
///
/// Args:
///     dut: n-port device
///     loads: n 1-port loads, one per port
///     renormalize: Tippet renormalization (True) or raw stitching (False)
///     z_system: Reference impedance of the result
///     wave: 'pseudo' or 'power'
///     noise: Optional (magnitude, phase_deg) deviations for simulated noise
///     seed: Noise seed
#[pyfunction]
#[pyo3(signature = (dut, loads, renormalize=true, z_system=Complex64::new(50.0, 0.0), wave="pseudo", noise=None, seed=0))]
fn reconstruct(
    dut: &PyNetwork,
    loads: Vec<PyRef<'_, PyNetwork>>,
    renormalize: bool,
    z_system: Complex64,
    wave: &str,
    noise: Option<(f64, f64)>,
    seed: u64,
) -> PyResult<PyNetwork> {
    let options = build_options(renormalize, z_system, wave, noise, seed)?;
    reconstruct_from_dut(dut.inner(), &unwrap_loads(&loads), options)
        .map(|r| PyNetwork::from_network(r.network))
        .map_err(to_py_err)
}

/// Reconstruct an n-port from measured 2-ports keyed by port pair
///
/// Args:
///     measurements: dict mapping (a, b) port tuples to 2-port Networks
///     loads: n 1-port loads, one per port
#[pyfunction]
#[pyo3(signature = (measurements, loads, renormalize=true, z_system=Complex64::new(50.0, 0.0), wave="pseudo"))]
fn reconstruct_measurements(
    measurements: HashMap<(usize, usize), PyRef<'_, PyNetwork>>,
    loads: Vec<PyRef<'_, PyNetwork>>,
    renormalize: bool,
    z_system: Complex64,
    wave: &str,
) -> PyResult<PyNetwork> {
    let mut meas = BTreeMap::new();
    for ((a, b), ntwk) in measurements {
        let pair = PortPair::new(a, b).ok_or_else(|| {
            PyValueError::new_err(format!("port pair ({}, {}) must name two ports", a, b))
        })?;
        let mut sub = ntwk.inner().clone();
        if a > b {
            sub = sub.renumbered(&[0, 1], &[1, 0]).map_err(to_py_err)?;
        }
        meas.insert(pair, sub);
    }
    let options = build_options(renormalize, z_system, wave, None, 0)?;
    reconstruct_core(&meas, &unwrap_loads(&loads), options)
        .map(|r| PyNetwork::from_network(r.network))
        .map_err(to_py_err)
}

/// nport_python - n-port S-parameter reconstruction in Rust
///
/// Example:
///     >>> import nport_python as nport
///     >>> freq = nport.Frequency(1, 10, 101, "GHz")
///     >>> loads = [nport.matched_load(freq) for _ in range(dut.nports)]
///     >>> rebuilt = nport.reconstruct(dut, loads)
#[pymodule]
fn nport_python(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Add classes with clean names (no Py prefix in Python)
    m.add_class::<PyFrequency>()?;
    m.add_class::<PyNetwork>()?;

    m.add_function(wrap_pyfunction!(matched_load, m)?)?;
    m.add_function(wrap_pyfunction!(load_from_gamma, m)?)?;
    m.add_function(wrap_pyfunction!(load_from_impedance, m)?)?;
    m.add_function(wrap_pyfunction!(reconstruct, m)?)?;
    m.add_function(wrap_pyfunction!(reconstruct_measurements, m)?)?;

    // Add module version
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
