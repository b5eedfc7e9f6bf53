//! `golf-regress` library crate.
//!
//! The binary (`golf`) is a thin wrapper around this library so that:
//!
//! - parsing and regression are testable without spawning processes
//! - the core (`io`, `fit`, `math`) stays free of printing; `app` and `report`
//!   own all user-facing output

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod report;
