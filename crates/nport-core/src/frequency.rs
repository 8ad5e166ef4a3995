//! Frequency module - represents a frequency band
//!
//! Provides a convenient way to work with frequency vectors with units.
//! Every network is built on an explicit grid; there is no shared default grid.

use crate::error::{NetworkError, Result};

/// Frequency unit enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyUnit {
    #[default]
    Hz,
    KHz,
    MHz,
    GHz,
    THz,
}

impl FrequencyUnit {
    /// Get the multiplier to convert to Hz
    pub fn multiplier(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
            FrequencyUnit::THz => 1e12,
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hz" => Some(FrequencyUnit::Hz),
            "khz" => Some(FrequencyUnit::KHz),
            "mhz" => Some(FrequencyUnit::MHz),
            "ghz" => Some(FrequencyUnit::GHz),
            "thz" => Some(FrequencyUnit::THz),
            _ => None,
        }
    }
}

/// Sweep type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepType {
    #[default]
    Linear,
    Log,
}

/// A frequency band representation
#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    /// Frequency vector in Hz
    f: Vec<f64>,
    /// Display unit
    unit: FrequencyUnit,
    /// Sweep type (linear or log)
    sweep_type: SweepType,
}

/// Check that a grid in Hz is non-empty, finite, positive and strictly increasing
fn validate_grid(f_hz: &[f64]) -> Result<()> {
    if f_hz.is_empty() {
        return Err(NetworkError::InvalidFrequency(
            "frequency grid is empty".to_string(),
        ));
    }
    if let Some(bad) = f_hz.iter().find(|x| !x.is_finite() || **x <= 0.0) {
        return Err(NetworkError::InvalidFrequency(format!(
            "frequency {} Hz is not a positive finite value",
            bad
        )));
    }
    if let Some(i) = f_hz.windows(2).position(|w| w[1] <= w[0]) {
        return Err(NetworkError::InvalidFrequency(format!(
            "grid not strictly increasing at index {}",
            i + 1
        )));
    }
    Ok(())
}

impl Frequency {
    /// Create a new Frequency with start/stop/npoints
    ///
    /// # Arguments
    /// * `start` - Start frequency in the specified unit
    /// * `stop` - Stop frequency in the specified unit
    /// * `npoints` - Number of frequency points
    /// * `unit` - Frequency unit
    /// * `sweep_type` - Linear or logarithmic sweep
    ///
    /// The resulting grid must be positive and strictly increasing, so
    /// `start < stop` unless `npoints == 1`.
    ///
    /// # Example
    /// ```
    /// use nport_core::frequency::{Frequency, FrequencyUnit, SweepType};
    /// let freq = Frequency::new(1.0, 10.0, 10, FrequencyUnit::GHz, SweepType::Linear).unwrap();
    /// assert_eq!(freq.npoints(), 10);
    /// ```
    pub fn new(
        start: f64,
        stop: f64,
        npoints: usize,
        unit: FrequencyUnit,
        sweep_type: SweepType,
    ) -> Result<Self> {
        let mult = unit.multiplier();
        let start_hz = start * mult;
        let stop_hz = stop * mult;
        if npoints == 0 {
            return Err(NetworkError::InvalidFrequency(
                "frequency grid is empty".to_string(),
            ));
        }

        let f = match sweep_type {
            SweepType::Linear => {
                if npoints == 1 {
                    vec![start_hz]
                } else {
                    let step = (stop_hz - start_hz) / (npoints - 1) as f64;
                    (0..npoints).map(|i| start_hz + i as f64 * step).collect()
                }
            }
            SweepType::Log => {
                if npoints == 1 {
                    vec![start_hz]
                } else {
                    let log_start = start_hz.ln();
                    let log_stop = stop_hz.ln();
                    let log_step = (log_stop - log_start) / (npoints - 1) as f64;
                    (0..npoints)
                        .map(|i| (log_start + i as f64 * log_step).exp())
                        .collect()
                }
            }
        };
        validate_grid(&f)?;

        Ok(Self {
            f,
            unit,
            sweep_type,
        })
    }

    /// Create from a frequency vector given in `unit`
    ///
    /// The grid must be non-empty, finite, positive and strictly increasing.
    pub fn from_f(f: Vec<f64>, unit: FrequencyUnit) -> Result<Self> {
        let mult = unit.multiplier();
        let f_hz: Vec<f64> = f.iter().map(|&x| x * mult).collect();
        validate_grid(&f_hz)?;

        Ok(Self {
            f: f_hz,
            unit,
            sweep_type: SweepType::Linear, // default, actual sweep type unknown
        })
    }

    /// Get frequency vector in Hz
    #[inline]
    pub fn f(&self) -> &[f64] {
        &self.f
    }

    /// Get frequency vector in the current unit
    pub fn f_scaled(&self) -> Vec<f64> {
        let mult = self.unit.multiplier();
        self.f.iter().map(|&x| x / mult).collect()
    }

    /// Get the number of frequency points
    #[inline]
    pub fn npoints(&self) -> usize {
        self.f.len()
    }

    /// Get the start frequency in Hz
    #[inline]
    pub fn start(&self) -> f64 {
        *self.f.first().unwrap_or(&0.0)
    }

    /// Get the stop frequency in Hz
    #[inline]
    pub fn stop(&self) -> f64 {
        *self.f.last().unwrap_or(&0.0)
    }

    /// Get the current unit
    #[inline]
    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    /// Get the sweep type
    #[inline]
    pub fn sweep_type(&self) -> SweepType {
        self.sweep_type
    }

    /// Get the frequency span in Hz
    #[inline]
    pub fn span(&self) -> f64 {
        self.stop() - self.start()
    }
}
