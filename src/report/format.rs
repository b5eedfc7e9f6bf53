//! Text formatting for terminal output.
//!
//! Every function here returns a `String` so output can be tested without a
//! terminal.

use crate::domain::{AnalysisResult, Round};
use crate::io::ParseResult;

/// Width of the `=` banners.
pub const BANNER_WIDTH: usize = 80;

pub fn banner() -> String {
    "=".repeat(BANNER_WIDTH)
}

/// Banner-framed title block.
pub fn format_title(title: &str) -> String {
    format!("{}\n{title}\n{}\n", banner(), banner())
}

/// Parsed rounds for one course.
pub fn format_rounds(course: &str, rounds: &[Round]) -> String {
    let mut out = format!("{course} Data:\n");
    for r in rounds {
        out.push_str(&format!(
            "Days: {}, Shots: {}, Condition: {}, Multiplier: {}\n",
            r.elapsed_days, r.shots, r.condition, r.multiplier
        ));
    }
    out
}

/// Summary of rejected lines: a count followed by one line per error.
pub fn format_line_errors(course: &str, parsed: &ParseResult) -> String {
    let errors = &parsed.errors;
    if errors.is_empty() {
        return String::new();
    }
    let mut out = format!(
        "Warning: skipped {} of {} data lines in {course} data:\n",
        errors.len(),
        parsed.lines_read()
    );
    for e in errors {
        out.push_str(&format!("  {e}\n"));
    }
    out
}

/// Regression block, goodness of fit and the example prediction.
pub fn format_analysis(course: &str, analysis: &AnalysisResult) -> String {
    let sample = &analysis.sample;
    let mut out = String::new();

    out.push_str(&format!("\n--- {course} Regression ---\n"));
    out.push_str(&format!("{}\n", analysis.regression));
    out.push_str(&format!("  R² (goodness of fit) = {:.4}\n", analysis.r_squared));
    out.push('\n');
    out.push_str(&format!(
        "  Example: For day {}, condition {}, multiplier {}\n",
        sample.round.elapsed_days, sample.round.condition, sample.round.multiplier
    ));
    out.push_str(&format!("    Predicted shots: {:.2}\n", sample.predicted));
    out.push_str(&format!("    Actual shots: {}\n", sample.actual));

    out
}

pub fn format_insufficient(course: &str, required: usize, actual: usize) -> String {
    format!(
        "Insufficient data for {course}. At least {required} rounds required (found {actual}).\n"
    )
}

pub fn format_course_failure(course: &str, message: &str) -> String {
    format!("Skipping {course}: {message}\n")
}
