//! Shared domain types.
//!
//! These types are intentionally small, immutable values so they can be:
//!
//! - produced by the parser and consumed by the regression engine
//! - rendered by the display layer
//! - exported alongside fitted values

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;

/// One parsed golf round.
///
/// `elapsed_days` is the calendar-day offset from the run's reference date and may
/// be negative for rounds played before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Round {
    pub elapsed_days: i64,
    pub shots: i32,
    pub condition: f64,
    pub multiplier: f64,
}

/// Fitted coefficients of
/// `shots ≈ β0 + β1·days + β2·condition + β3·multiplier`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionResult {
    pub intercept: f64,
    pub days_coef: f64,
    pub condition_coef: f64,
    pub multiplier_coef: f64,
    /// Number of rounds used to fit the coefficients.
    pub n: usize,
}

impl RegressionResult {
    /// Coefficients in design-matrix column order.
    pub fn coefficients(&self) -> [f64; 4] {
        [
            self.intercept,
            self.days_coef,
            self.condition_coef,
            self.multiplier_coef,
        ]
    }

    /// Human-readable model equation.
    ///
    /// The days coefficient is printed with six decimals: it multiplies day counts in
    /// the hundreds, so four decimals would round most real slopes to zero.
    pub fn equation(&self) -> String {
        format!(
            "shots = {:.4} + {:.6}*days + {:.4}*condition + {:.4}*multiplier",
            self.intercept, self.days_coef, self.condition_coef, self.multiplier_coef
        )
    }
}

impl fmt::Display for RegressionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Regression Result (n={}):", self.n)?;
        writeln!(f, "  Intercept = {:.4}", self.intercept)?;
        writeln!(f, "  Days coefficient = {:.6}", self.days_coef)?;
        writeln!(f, "  Condition coefficient = {:.4}", self.condition_coef)?;
        writeln!(f, "  Multiplier coefficient = {:.4}", self.multiplier_coef)?;
        write!(f, "  Equation: {}", self.equation())
    }
}

/// Model prediction for a single observed round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePrediction {
    pub round: Round,
    pub predicted: f64,
    pub actual: i32,
}

/// Everything computed for one course.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisResult {
    pub regression: RegressionResult,
    pub r_squared: f64,
    pub sample: SamplePrediction,
}

/// A named input file (one per course).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseInput {
    pub name: String,
    pub path: PathBuf,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, `.env` values and defaults.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub reference_date: NaiveDate,
    pub courses: Vec<CourseInput>,
    /// Read a literal `x`/`X` condition as `2.0` (legacy data files).
    pub legacy_x_condition: bool,
    pub show_data: bool,
    /// Directory for per-course fitted-value CSVs.
    pub export_dir: Option<PathBuf>,
}
