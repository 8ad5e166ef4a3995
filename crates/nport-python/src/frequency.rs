//! Python bindings for Frequency class

use numpy::{PyArray1, ToPyArray};
use pyo3::prelude::*;
use nport_core::frequency::{Frequency, FrequencyUnit, SweepType};

use crate::to_py_err;

fn parse_unit(unit: &str) -> PyResult<FrequencyUnit> {
    FrequencyUnit::parse(unit).ok_or_else(|| {
        pyo3::exceptions::PyValueError::new_err(format!(
            "Invalid frequency unit: {}. Use 'Hz', 'kHz', 'MHz', 'GHz', or 'THz'",
            unit
        ))
    })
}

fn unit_name(unit: FrequencyUnit) -> &'static str {
    match unit {
        FrequencyUnit::Hz => "Hz",
        FrequencyUnit::KHz => "kHz",
        FrequencyUnit::MHz => "MHz",
        FrequencyUnit::GHz => "GHz",
        FrequencyUnit::THz => "THz",
    }
}

/// Python wrapper for Frequency
#[pyclass(name = "Frequency")]
#[derive(Clone)]
pub struct PyFrequency {
    inner: Frequency,
}

#[pymethods]
impl PyFrequency {
    /// Create a new Frequency object
    ///
    /// Args:
    ///     start: Start frequency in `unit`
    ///     stop: Stop frequency in `unit`
    ///     npoints: Number of frequency points
    ///     unit: Frequency unit ('Hz', 'kHz', 'MHz', 'GHz', 'THz')
    ///     sweep_type: Sweep type ('linear' or 'log')
    #[new]
    #[pyo3(signature = (start, stop, npoints, unit="Hz", sweep_type="linear"))]
    pub fn new(
        start: f64,
        stop: f64,
        npoints: usize,
        unit: &str,
        sweep_type: &str,
    ) -> PyResult<Self> {
        let freq_unit = parse_unit(unit)?;
        let sweep = match sweep_type.to_lowercase().as_str() {
            "linear" | "lin" => SweepType::Linear,
            "log" | "logarithmic" => SweepType::Log,
            _ => {
                return Err(pyo3::exceptions::PyValueError::new_err(format!(
                    "Invalid sweep type: {}. Use 'linear' or 'log'",
                    sweep_type
                )))
            }
        };

        Frequency::new(start, stop, npoints, freq_unit, sweep)
            .map(Self::from_frequency)
            .map_err(to_py_err)
    }

    /// Create from an explicit, strictly increasing frequency vector
    ///
    /// Args:
    ///     f: Frequency points in `unit`
    ///     unit: Frequency unit (default 'Hz')
    #[staticmethod]
    #[pyo3(signature = (f, unit="Hz"))]
    pub fn from_f(f: Vec<f64>, unit: &str) -> PyResult<Self> {
        Frequency::from_f(f, parse_unit(unit)?)
            .map(Self::from_frequency)
            .map_err(to_py_err)
    }

    /// Get frequency array in Hz as numpy array
    #[getter]
    pub fn f<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.f().to_pyarray(py)
    }

    /// Get scaled frequency array (in the specified unit) as numpy array
    #[getter]
    pub fn f_scaled<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.f_scaled().to_pyarray(py)
    }

    /// Start frequency in Hz
    #[getter]
    pub fn start(&self) -> f64 {
        self.inner.start()
    }

    /// Stop frequency in Hz
    #[getter]
    pub fn stop(&self) -> f64 {
        self.inner.stop()
    }

    /// Number of frequency points
    #[getter]
    pub fn npoints(&self) -> usize {
        self.inner.npoints()
    }

    /// Frequency unit as string
    #[getter]
    pub fn unit(&self) -> &str {
        unit_name(self.inner.unit())
    }

    /// Sweep type as string
    #[getter]
    pub fn sweep_type(&self) -> &str {
        match self.inner.sweep_type() {
            SweepType::Linear => "linear",
            SweepType::Log => "log",
        }
    }

    /// Frequency span in Hz
    #[getter]
    pub fn span(&self) -> f64 {
        self.inner.span()
    }

    fn __repr__(&self) -> String {
        let mult = self.inner.unit().multiplier();
        format!(
            "Frequency({} {} - {} {}, {} points, {})",
            self.inner.start() / mult,
            self.unit(),
            self.inner.stop() / mult,
            self.unit(),
            self.npoints(),
            self.sweep_type()
        )
    }

    fn __len__(&self) -> usize {
        self.npoints()
    }
}

impl PyFrequency {
    /// Get the inner Frequency reference (for internal use)
    pub fn inner(&self) -> &Frequency {
        &self.inner
    }

    /// Create from existing Frequency
    pub fn from_frequency(freq: Frequency) -> Self {
        Self { inner: freq }
    }
}
