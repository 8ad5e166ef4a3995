//! Mathematical functions module
//!
//! Provides commonly used mathematical functions for RF/microwave engineering.

pub mod conversions;
pub mod linalg;
pub mod matrix_ops;
pub mod transforms;

pub use conversions::*;
pub use transforms::*;
