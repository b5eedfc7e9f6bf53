//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed observations (`Round`)
//! - regression outputs (`RegressionResult`, `SamplePrediction`, `AnalysisResult`)
//! - run configuration (`AnalysisConfig`, `CourseInput`)

pub mod types;

pub use types::*;
