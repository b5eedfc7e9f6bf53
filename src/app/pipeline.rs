//! Shared "analysis pipeline" logic used by the `analyze` and `check` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! parse file -> show data -> fit -> R² -> sample prediction -> show results
//!
//! The pipeline depends only on the capability traits (`RoundSource`, `Regressor`,
//! `AnalysisDisplay`), so tests can drive it with in-memory collaborators.
//! Courses are processed one after another and independently: a missing file or
//! an unfittable course is reported and skipped, never aborting the others.

use tracing::{debug, info, warn};

use crate::domain::{AnalysisResult, CourseInput};
use crate::error::AppError;
use crate::fit::{RegressionError, Regressor, analyze};
use crate::io::{IngestError, ParseResult, RoundSource};
use crate::report::AnalysisDisplay;

/// What happened to one course.
#[derive(Debug)]
pub enum CourseOutcome {
    Analyzed(AnalysisResult),
    /// The file was parsed and no fit was requested (`check`).
    Parsed,
    /// The file could not be read; nothing was parsed.
    FileError(IngestError),
    /// The file was parsed but the model could not be fitted.
    FitError(RegressionError),
}

impl CourseOutcome {
    /// Process exit code this outcome contributes (`None` when analyzed).
    pub fn exit_code(&self) -> Option<u8> {
        match self {
            CourseOutcome::Analyzed(_) | CourseOutcome::Parsed => None,
            CourseOutcome::FileError(_) => Some(2),
            CourseOutcome::FitError(e) => Some(AppError::from(e.clone()).exit_code()),
        }
    }
}

/// Results for one course.
#[derive(Debug)]
pub struct CourseAnalysis {
    pub course: CourseInput,
    /// `None` when the file could not be read.
    pub parsed: Option<ParseResult>,
    pub outcome: CourseOutcome,
}

/// All computed outputs of a single run, in configured course order.
#[derive(Debug, Default)]
pub struct RunOutput {
    pub courses: Vec<CourseAnalysis>,
}

impl RunOutput {
    /// Courses that could not be analyzed (or read, for `check`).
    pub fn failures(&self) -> impl Iterator<Item = &CourseAnalysis> {
        self.courses
            .iter()
            .filter(|c| c.outcome.exit_code().is_some())
    }

    /// Convert per-course failures into a single process-level error.
    ///
    /// The highest failure exit code wins.
    pub fn into_result(self) -> Result<Self, AppError> {
        let failed: Vec<(String, u8)> = self
            .failures()
            .filter_map(|c| Some((c.course.name.clone(), c.outcome.exit_code()?)))
            .collect();

        let Some(code) = failed.iter().map(|(_, code)| *code).max() else {
            return Ok(self);
        };
        let names: Vec<&str> = failed.iter().map(|(name, _)| name.as_str()).collect();
        Err(AppError::new(
            code,
            format!(
                "{} of {} course(s) could not be analyzed: {}",
                failed.len(),
                self.courses.len(),
                names.join(", ")
            ),
        ))
    }
}

fn display_err(e: std::io::Error) -> AppError {
    AppError::new(1, format!("Failed to write output: {e}"))
}

/// Runs parse + fit for each course and reports through the display collaborator.
pub struct CourseAnalyzer<'a, S: ?Sized, R: ?Sized, D: ?Sized> {
    source: &'a S,
    regressor: &'a R,
    display: &'a mut D,
    show_data: bool,
}

impl<'a, S, R, D> CourseAnalyzer<'a, S, R, D>
where
    S: RoundSource + ?Sized,
    R: Regressor + ?Sized,
    D: AnalysisDisplay + ?Sized,
{
    pub fn new(source: &'a S, regressor: &'a R, display: &'a mut D, show_data: bool) -> Self {
        Self {
            source,
            regressor,
            display,
            show_data,
        }
    }

    /// Analyze every course in order.
    ///
    /// Only display failures are returned as errors; per-course problems are
    /// recorded in the returned `RunOutput`.
    pub fn run(&mut self, courses: &[CourseInput]) -> Result<RunOutput, AppError> {
        self.display.run_header().map_err(display_err)?;
        self.display.regression_header().map_err(display_err)?;

        let mut output = RunOutput::default();
        for course in courses {
            output.courses.push(self.analyze_course(course)?);
        }

        self.display.footer().map_err(display_err)?;
        Ok(output)
    }

    fn analyze_course(&mut self, course: &CourseInput) -> Result<CourseAnalysis, AppError> {
        let name = course.name.as_str();

        let parsed = match self.source.parse_file(&course.path) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(course = name, error = %e, "course skipped: file error");
                self.display
                    .course_failed(name, &e.to_string())
                    .map_err(display_err)?;
                return Ok(CourseAnalysis {
                    course: course.clone(),
                    parsed: None,
                    outcome: CourseOutcome::FileError(e),
                });
            }
        };

        info!(
            course = name,
            rounds = parsed.rounds.len(),
            rejected = parsed.errors.len(),
            "parsed course file"
        );
        if !parsed.errors.is_empty() {
            warn!(course = name, count = parsed.errors.len(), "skipped malformed lines");
            self.display
                .line_errors(name, &parsed)
                .map_err(display_err)?;
        }
        if self.show_data {
            self.display
                .rounds(name, &parsed.rounds)
                .map_err(display_err)?;
        }

        let outcome = match analyze(self.regressor, &parsed.rounds) {
            Ok(analysis) => {
                debug!(
                    course = name,
                    n = analysis.regression.n,
                    r_squared = analysis.r_squared,
                    equation = %analysis.regression.equation(),
                    "fitted course"
                );
                self.display
                    .analysis(name, &analysis)
                    .map_err(display_err)?;
                CourseOutcome::Analyzed(analysis)
            }
            Err(e) => {
                warn!(course = name, error = %e, "course skipped: fit failed");
                match e {
                    RegressionError::InsufficientData { required, actual } => self
                        .display
                        .insufficient_data(name, required, actual)
                        .map_err(display_err)?,
                    RegressionError::NonFinite => self
                        .display
                        .course_failed(name, &e.to_string())
                        .map_err(display_err)?,
                }
                CourseOutcome::FitError(e)
            }
        };

        Ok(CourseAnalysis {
            course: course.clone(),
            parsed: Some(parsed),
            outcome,
        })
    }
}

/// Parse every course file and report rejected lines, without fitting.
///
/// Only unreadable files count as failures.
pub fn run_check<S, D>(source: &S, display: &mut D, courses: &[CourseInput]) -> Result<RunOutput, AppError>
where
    S: RoundSource + ?Sized,
    D: AnalysisDisplay + ?Sized,
{
    let mut output = RunOutput::default();
    for course in courses {
        let name = course.name.as_str();
        match source.parse_file(&course.path) {
            Ok(parsed) => {
                info!(
                    course = name,
                    rounds = parsed.rounds.len(),
                    rejected = parsed.errors.len(),
                    "checked course file"
                );
                display.rounds(name, &parsed.rounds).map_err(display_err)?;
                display
                    .line_errors(name, &parsed)
                    .map_err(display_err)?;
                output.courses.push(CourseAnalysis {
                    course: course.clone(),
                    parsed: Some(parsed),
                    outcome: CourseOutcome::Parsed,
                });
            }
            Err(e) => {
                warn!(course = name, error = %e, "course skipped: file error");
                display
                    .course_failed(name, &e.to_string())
                    .map_err(display_err)?;
                output.courses.push(CourseAnalysis {
                    course: course.clone(),
                    parsed: None,
                    outcome: CourseOutcome::FileError(e),
                });
            }
        }
    }
    Ok(output)
}
