//! Regression engine.
//!
//! Responsibilities:
//!
//! - build the design matrix and fit coefficients (`regression`)
//! - derive goodness of fit and a sample prediction for a course (`analysis`)

pub mod analysis;
pub mod regression;

pub use analysis::*;
pub use regression::*;
