//! nport-core: N-port S-parameter reconstruction
//!
//! Rebuilds the scattering matrix of an n-port device from 2-port
//! sub-measurements taken while the unmeasured ports are terminated by known,
//! not necessarily matched, loads.
//!
//! ## Modules
//!
//! - `frequency` - Frequency grid representation
//! - `math` - Conversions, S/Z transforms and linear algebra helpers
//! - `network` - N-port network representation, renormalization and port connection
//! - `load` - One-port terminations
//! - `multiport` - Sub-measurement simulation and composite assembly
//! - `synth` - Synthetic reference networks

pub mod constants;
pub mod error;
pub mod frequency;
pub mod load;
pub mod math;
pub mod multiport;
pub mod network;
pub mod synth;

pub use error::{NetworkError, Result};
pub use frequency::Frequency;
pub use load::{load_impedance, Load};
pub use math::transforms::WaveDefinition;
pub use multiport::{
    reconstruct, reconstruct_from_dut, PortPair, Reconstruction, ReconstructionOptions,
};
pub use network::{Network, PolarNoise, ReferenceImpedance};
