//! Network module - N-port electrical network representation
//!
//! Provides the core Network struct and associated operations for
//! S-parameter manipulation: impedance conversion, renormalization,
//! port connection and termination.

mod connect;
mod core;
mod noise;
mod operators;
mod params;
mod properties;
mod renormalize;

pub use connect::{connect_s, innerconnect_multi_s, innerconnect_s};
pub use core::Network;
pub use noise::PolarNoise;
pub use renormalize::ReferenceImpedance;
