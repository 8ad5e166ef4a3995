//! Python bindings for Network class

use ndarray::Array1;
use num_complex::Complex64;
use numpy::{PyArray1, PyArray2, PyArray3, PyReadonlyArray1, PyReadonlyArray2, PyReadonlyArray3, ToPyArray};
use pyo3::prelude::*;
use nport_core::network::{Network, ReferenceImpedance};
use nport_core::WaveDefinition;

use crate::frequency::PyFrequency;
use crate::to_py_err;

/// Reference impedance argument: scalar, per-port vector or [nfreq, nports] array
#[derive(FromPyObject)]
pub enum Z0Arg<'py> {
    Scalar(Complex64),
    PerPort(PyReadonlyArray1<'py, Complex64>),
    Full(PyReadonlyArray2<'py, Complex64>),
}

impl Z0Arg<'_> {
    pub fn to_reference(&self) -> ReferenceImpedance {
        match self {
            Z0Arg::Scalar(z) => ReferenceImpedance::Uniform(*z),
            Z0Arg::PerPort(z) => ReferenceImpedance::PerPort(z.as_array().to_owned()),
            Z0Arg::Full(z) => ReferenceImpedance::PerFrequency(z.as_array().to_owned()),
        }
    }
}

pub fn parse_wave(wave: &str) -> PyResult<WaveDefinition> {
    match wave.to_lowercase().as_str() {
        "pseudo" => Ok(WaveDefinition::Pseudo),
        "power" => Ok(WaveDefinition::Power),
        _ => Err(pyo3::exceptions::PyValueError::new_err(format!(
            "Invalid wave definition: {}. Use 'pseudo' or 'power'",
            wave
        ))),
    }
}

/// Python wrapper for Network
#[pyclass(name = "Network")]
#[derive(Clone)]
pub struct PyNetwork {
    inner: Network,
}

#[pymethods]
impl PyNetwork {
    /// Create a Network from S-parameters
    ///
    /// Args:
    ///     frequency: Frequency grid
    ///     s: Complex array [nfreq, nports, nports]
    ///     z0: Reference impedance (scalar, [nports] or [nfreq, nports]; default 50)
    ///     name: Optional network name
    #[new]
    #[pyo3(signature = (frequency, s, z0=None, name=None))]
    pub fn new(
        frequency: &PyFrequency,
        s: PyReadonlyArray3<'_, Complex64>,
        z0: Option<Z0Arg<'_>>,
        name: Option<String>,
    ) -> PyResult<Self> {
        let s = s.as_array().to_owned();
        let (nfreq, nports, _) = s.dim();
        let z0 = z0
            .map(|z| z.to_reference())
            .unwrap_or(ReferenceImpedance::Uniform(Complex64::new(50.0, 0.0)))
            .resolve(nfreq, nports)
            .map_err(to_py_err)?;
        let mut inner = Network::new(frequency.inner().clone(), s, z0).map_err(to_py_err)?;
        inner.name = name;
        Ok(Self { inner })
    }

    /// Get S-parameters as complex numpy array [nfreq, nports, nports]
    #[getter]
    pub fn s<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray3<Complex64>> {
        self.inner.s.to_pyarray(py)
    }

    /// Get S-parameters magnitude in dB as numpy array [nfreq, nports, nports]
    #[getter]
    pub fn s_db<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray3<f64>> {
        self.inner.s_db().to_pyarray(py)
    }

    /// Get S-parameters magnitude (linear) as numpy array [nfreq, nports, nports]
    #[getter]
    pub fn s_mag<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray3<f64>> {
        self.inner.s_mag().to_pyarray(py)
    }

    /// Get Z-parameters as complex numpy array [nfreq, nports, nports]
    #[getter]
    pub fn z<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray3<Complex64>>> {
        Ok(self.inner.z().map_err(to_py_err)?.to_pyarray(py))
    }

    /// Get reference impedance as numpy array [nfreq, nports]
    #[getter]
    pub fn z0<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<Complex64>> {
        self.inner.z0().to_pyarray(py)
    }

    /// Get frequency array in Hz as numpy array
    #[getter]
    pub fn f<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.f().to_pyarray(py)
    }

    /// Get the Frequency object
    #[getter]
    pub fn frequency(&self) -> PyFrequency {
        PyFrequency::from_frequency(self.inner.frequency.clone())
    }

    /// Number of ports
    #[getter]
    pub fn nports(&self) -> usize {
        self.inner.nports()
    }

    /// Number of frequency points
    #[getter]
    pub fn nfreq(&self) -> usize {
        self.inner.nfreq()
    }

    /// Network name
    #[getter]
    pub fn name(&self) -> Option<String> {
        self.inner.name.clone()
    }

    /// Check if network is reciprocal
    #[pyo3(signature = (tol=None))]
    pub fn is_reciprocal(&self, tol: Option<f64>) -> bool {
        self.inner.is_reciprocal(tol)
    }

    /// Check if network is passive
    #[pyo3(signature = (tol=None))]
    pub fn is_passive(&self, tol: Option<f64>) -> bool {
        self.inner.is_passive(tol)
    }

    /// Return a copy renormalized to new reference impedances
    ///
    /// Args:
    ///     z0: Scalar, [nports] or [nfreq, nports] impedances
    ///     wave: 'pseudo' (default) or 'power'
    #[pyo3(signature = (z0, wave="pseudo"))]
    pub fn renormalized(&self, z0: Z0Arg<'_>, wave: &str) -> PyResult<Self> {
        self.inner
            .renormalized_with(z0.to_reference(), parse_wave(wave)?)
            .map(Self::from_network)
            .map_err(to_py_err)
    }

    /// Connect port `k` of this network to port `l` of `other`
    ///
    /// Args:
    ///     wave: wave definition of both networks' S, 'pseudo' (default) or 'power'
    #[pyo3(signature = (k, other, l, wave="pseudo"))]
    pub fn connect(&self, k: usize, other: &PyNetwork, l: usize, wave: &str) -> PyResult<Self> {
        self.inner
            .connect_with(k, &other.inner, l, parse_wave(wave)?)
            .map(Self::from_network)
            .map_err(to_py_err)
    }

    /// Connect two ports of this network together
    #[pyo3(signature = (k, l, wave="pseudo"))]
    pub fn innerconnect(&self, k: usize, l: usize, wave: &str) -> PyResult<Self> {
        self.inner
            .innerconnect_with(k, l, parse_wave(wave)?)
            .map(Self::from_network)
            .map_err(to_py_err)
    }

    /// Terminate `port` with a 1-port load
    pub fn terminate(&self, port: usize, load: &PyNetwork) -> PyResult<Self> {
        self.inner
            .terminate(port, &load.inner)
            .map(Self::from_network)
            .map_err(to_py_err)
    }

    /// Keep only the listed ports
    pub fn subnetwork(&self, ports: Vec<usize>) -> PyResult<Self> {
        self.inner
            .subnetwork(&ports)
            .map(Self::from_network)
            .map_err(to_py_err)
    }

    /// Largest element-wise |S - S_other|
    pub fn max_abs_error(&self, other: &PyNetwork) -> PyResult<f64> {
        self.inner.max_abs_error(&other.inner).map_err(to_py_err)
    }

    /// Impedance presented by a 1-port load at each frequency
    pub fn load_impedance<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<Complex64>>> {
        let z: Array1<Complex64> = nport_core::load_impedance(&self.inner).map_err(to_py_err)?;
        Ok(z.to_pyarray(py))
    }

    fn __repr__(&self) -> String {
        let name = self.name().unwrap_or_else(|| "unnamed".to_string());
        format!(
            "Network('{}', {} ports, {} freqs, {:.3} GHz - {:.3} GHz)",
            name,
            self.nports(),
            self.nfreq(),
            self.inner.frequency.start() / 1e9,
            self.inner.frequency.stop() / 1e9
        )
    }
}

impl PyNetwork {
    /// Get the inner Network reference (for internal use)
    pub fn inner(&self) -> &Network {
        &self.inner
    }

    /// Create from existing Network
    pub fn from_network(network: Network) -> Self {
        Self { inner: network }
    }
}
