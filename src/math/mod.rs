//! Mathematical utilities: QR-based least squares.

pub mod ols;

pub use ols::*;
