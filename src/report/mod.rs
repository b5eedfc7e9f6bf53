//! Reporting: the display collaborator used by the orchestrator.
//!
//! We keep formatting code in one place so:
//! - the parsing/regression code stays free of output side effects
//! - output changes are localized and testable against any `Write`

pub mod format;

use std::io::Write;

use crate::domain::{AnalysisResult, Round};
use crate::io::ParseResult;

pub use format::*;

/// Sink for everything the analysis run wants to show the user.
pub trait AnalysisDisplay {
    fn run_header(&mut self) -> std::io::Result<()>;
    fn regression_header(&mut self) -> std::io::Result<()>;
    fn rounds(&mut self, course: &str, rounds: &[Round]) -> std::io::Result<()>;
    fn line_errors(&mut self, course: &str, parsed: &ParseResult) -> std::io::Result<()>;
    fn analysis(&mut self, course: &str, analysis: &AnalysisResult) -> std::io::Result<()>;
    fn insufficient_data(&mut self, course: &str, required: usize, actual: usize) -> std::io::Result<()>;
    fn course_failed(&mut self, course: &str, message: &str) -> std::io::Result<()>;
    fn footer(&mut self) -> std::io::Result<()>;
}

/// Plain-text display writing to any `Write` (stdout in the binary).
pub struct TextDisplay<W: Write> {
    out: W,
}

impl<W: Write> TextDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AnalysisDisplay for TextDisplay<W> {
    fn run_header(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "{}", format_title("GOLF IMPROVEMENT MEASUREMENT ANALYSIS"))
    }

    fn regression_header(&mut self) -> std::io::Result<()> {
        write!(self.out, "{}", format_title("MULTIPLE LINEAR REGRESSION ANALYSIS"))
    }

    fn rounds(&mut self, course: &str, rounds: &[Round]) -> std::io::Result<()> {
        writeln!(self.out, "{}", format_rounds(course, rounds))
    }

    fn line_errors(&mut self, course: &str, parsed: &ParseResult) -> std::io::Result<()> {
        write!(self.out, "{}", format_line_errors(course, parsed))
    }

    fn analysis(&mut self, course: &str, analysis: &AnalysisResult) -> std::io::Result<()> {
        write!(self.out, "{}", format_analysis(course, analysis))
    }

    fn insufficient_data(&mut self, course: &str, required: usize, actual: usize) -> std::io::Result<()> {
        writeln!(self.out, "{}", format_insufficient(course, required, actual))
    }

    fn course_failed(&mut self, course: &str, message: &str) -> std::io::Result<()> {
        writeln!(self.out, "{}", format_course_failure(course, message))
    }

    fn footer(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "\n{}", banner())?;
        self.out.flush()
    }
}
