//! Error types for network operations
//!
//! Every fallible operation in the crate returns [`NetworkError`]. Operations are
//! all-or-nothing: on error no partially transformed network is produced.

use num_complex::Complex64;
use thiserror::Error;

use crate::multiport::PortPair;

/// Network operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("port {port} out of range (network has {nports} ports)")]
    PortIndexOutOfRange { port: usize, nports: usize },

    #[error("singular matrix in {operation}{}", fmt_freq(.freq_index))]
    SingularMatrix {
        operation: &'static str,
        freq_index: Option<usize>,
    },

    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    #[error("invalid reference impedance {value} at port {port}{}", fmt_freq(.freq_index))]
    InvalidImpedance {
        freq_index: Option<usize>,
        port: usize,
        value: Complex64,
    },

    #[error("invalid connection: {0}")]
    InvalidConnection(String),

    #[error("invalid frequency grid: {0}")]
    InvalidFrequency(String),

    #[error("no measurement for port pair {0}")]
    MissingMeasurement(PortPair),

    #[error("port pair {0} measured more than once")]
    DuplicateMeasurement(PortPair),
}

fn fmt_freq(freq_index: &Option<usize>) -> String {
    match freq_index {
        Some(f) => format!(" at frequency index {}", f),
        None => String::new(),
    }
}

impl NetworkError {
    pub(crate) fn singular(operation: &'static str) -> Self {
        NetworkError::SingularMatrix {
            operation,
            freq_index: None,
        }
    }

    pub(crate) fn shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        NetworkError::ShapeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Attach a frequency index to errors raised by per-point routines.
    pub(crate) fn at_frequency(self, f: usize) -> Self {
        match self {
            NetworkError::SingularMatrix {
                operation,
                freq_index: None,
            } => NetworkError::SingularMatrix {
                operation,
                freq_index: Some(f),
            },
            NetworkError::InvalidImpedance {
                freq_index: None,
                port,
                value,
            } => NetworkError::InvalidImpedance {
                freq_index: Some(f),
                port,
                value,
            },
            other => other,
        }
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, NetworkError>;
