//! Input/output helpers.
//!
//! - date resolution (`dates`)
//! - round-file ingest + validation (`ingest`)
//! - fitted-value exports (CSV) (`export`)

pub mod dates;
pub mod export;
pub mod ingest;

pub use dates::*;
pub use export::*;
pub use ingest::*;
