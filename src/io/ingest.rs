//! Round-file ingest and validation.
//!
//! This module is responsible for turning a comma-delimited round file into a clean
//! set of `Round`s that are safe to fit.
//!
//! Design goals:
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **File-level failures are hard errors** (missing/unreadable file)
//! - **Deterministic behavior** (output order follows input order)
//! - **Separation of concerns**: no fitting or printing here

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Round;
use crate::io::dates::resolve_elapsed_days;

/// Number of leading fields every data line must provide.
pub const REQUIRED_FIELDS: usize = 4;

/// Condition value substituted for the legacy `x` token.
const LEGACY_X_CONDITION: f64 = 2.0;

/// File-level ingest failure. Fatal for that file only.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Round file not found: '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read round file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A line-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// 1-based line number in the file (the header is line 1).
    pub line: usize,
    pub message: String,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Ingest output: parsed rounds plus the lines that were rejected.
///
/// Both lists preserve file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    pub rounds: Vec<Round>,
    pub errors: Vec<LineError>,
}

impl ParseResult {
    /// Number of data lines seen (accepted + rejected).
    pub fn lines_read(&self) -> usize {
        self.rounds.len() + self.errors.len()
    }
}

/// Parser switches for data-file quirks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Treat a literal `x`/`X` condition value as `2.0`.
    ///
    /// Some older data files used `x` as a placeholder for a "standard" course
    /// condition. Off by default: without it, `x` is an invalid condition.
    pub legacy_x_condition: bool,
}

/// Something that can turn a file into parsed rounds.
pub trait RoundSource {
    fn parse_file(&self, path: &Path) -> Result<ParseResult, IngestError>;
}

/// The comma-delimited round parser, bound to one reference date.
#[derive(Debug, Clone, Copy)]
pub struct CsvRoundParser {
    pub reference_date: NaiveDate,
    pub options: ParseOptions,
}

impl CsvRoundParser {
    pub fn new(reference_date: NaiveDate, options: ParseOptions) -> Self {
        Self {
            reference_date,
            options,
        }
    }
}

impl RoundSource for CsvRoundParser {
    fn parse_file(&self, path: &Path) -> Result<ParseResult, IngestError> {
        parse_file(path, self.reference_date, self.options)
    }
}

/// Read and parse a whole round file.
///
/// An empty file is not an error: it simply yields no rounds.
pub fn parse_file(
    path: &Path,
    reference: NaiveDate,
    options: ParseOptions,
) -> Result<ParseResult, IngestError> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => IngestError::NotFound {
            path: path.to_path_buf(),
        },
        _ => IngestError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    Ok(parse_lines(contents.lines(), reference, options))
}

/// Parse a sequence of lines, skipping the first one (the header) unconditionally.
///
/// Every later line is parsed independently; a bad line never stops the batch.
pub fn parse_lines<'a, I>(lines: I, reference: NaiveDate, options: ParseOptions) -> ParseResult
where
    I: IntoIterator<Item = &'a str>,
{
    let mut result = ParseResult::default();

    for (idx, line) in lines.into_iter().enumerate().skip(1) {
        // enumerate() is 0-based and the header is line 1.
        let line_number = idx + 1;
        match parse_line(line, line_number, reference, options) {
            Ok(round) => result.rounds.push(round),
            Err(e) => result.errors.push(e),
        }
    }

    result
}

/// Parse one data line into a `Round`.
pub fn parse_line(
    line: &str,
    line_number: usize,
    reference: NaiveDate,
    options: ParseOptions,
) -> Result<Round, LineError> {
    let fail = |message: String| LineError {
        line: line_number,
        message,
    };

    if line.trim().is_empty() {
        return Err(fail("empty line".to_string()));
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < REQUIRED_FIELDS {
        return Err(fail(format!(
            "expected at least {REQUIRED_FIELDS} fields, found {}",
            fields.len()
        )));
    }

    let elapsed_days = resolve_elapsed_days(fields[0], reference)
        .ok_or_else(|| fail(format!("invalid date format '{}'", fields[0])))?;

    let shots = fields[1]
        .parse::<i32>()
        .map_err(|_| fail(format!("invalid shots value '{}'", fields[1])))?;

    let condition = parse_condition(fields[2], options)
        .ok_or_else(|| fail(format!("invalid course condition value '{}'", fields[2])))?;

    let multiplier = parse_f64(fields[3])
        .ok_or_else(|| fail(format!("invalid course multiplier value '{}'", fields[3])))?;

    Ok(Round {
        elapsed_days,
        shots,
        condition,
        multiplier,
    })
}

fn parse_condition(s: &str, options: ParseOptions) -> Option<f64> {
    if options.legacy_x_condition && s.eq_ignore_ascii_case("x") {
        return Some(LEGACY_X_CONDITION);
    }
    parse_f64(s)
}

fn parse_f64(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
