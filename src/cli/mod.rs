//! Command-line parsing for the golf round regression tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! parsing/regression code. Values not given on the command line are resolved
//! later from `.env` / environment variables (see `app::config_from_args`).

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

use crate::domain::CourseInput;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "golf",
    version,
    about = "Fit shots ~ days + condition + multiplier on golf round files"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse each course file, fit the regression and print results.
    Analyze(AnalyzeArgs),
    /// Parse each course file and report rejected lines without fitting.
    Check(InputArgs),
}

/// Options shared by every command that reads round files.
#[derive(Debug, Parser, Clone)]
pub struct InputArgs {
    /// Reference date (YYYY-MM-DD) that elapsed days are counted from.
    ///
    /// Falls back to `GOLF_REFERENCE_DATE`, then 2023-05-21.
    #[arg(short = 'r', long, value_parser = parse_reference_date)]
    pub reference_date: Option<NaiveDate>,

    /// Course input as NAME=PATH (or just PATH; the file stem becomes the name).
    ///
    /// Repeatable. Falls back to `GOLF_COURSES` (`NAME=PATH;NAME=PATH`), then
    /// `Bhill=data/bhill.csv` and `Phaven=data/phaven.csv`.
    #[arg(short = 'c', long = "course", value_name = "NAME=PATH", value_parser = parse_course)]
    pub courses: Vec<CourseInput>,

    /// Read a literal `x` course condition as 2.0 (legacy data files).
    #[arg(long)]
    pub legacy_x_condition: bool,
}

/// Options for `golf analyze`.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Do not list parsed rounds before each regression.
    #[arg(long)]
    pub no_show_data: bool,

    /// Write `<course>_fitted.csv` (observed, predicted, residual) into this directory.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,
}

pub fn parse_reference_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid reference date '{s}' (expected YYYY-MM-DD): {e}"))
}

/// Parse `NAME=PATH` or a bare `PATH`.
pub fn parse_course(s: &str) -> Result<CourseInput, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("course must not be empty".to_string());
    }

    let (name, path) = match s.split_once('=') {
        Some((name, path)) => (name.trim().to_string(), PathBuf::from(path.trim())),
        None => {
            let path = PathBuf::from(s);
            (course_name_from_path(&path), path)
        }
    };

    if name.is_empty() {
        return Err(format!("course '{s}' has an empty name"));
    }
    if path.as_os_str().is_empty() {
        return Err(format!("course '{s}' has an empty path"));
    }

    Ok(CourseInput { name, path })
}

/// Parse a `;`-separated course list (the `GOLF_COURSES` format).
pub fn parse_course_list(s: &str) -> Result<Vec<CourseInput>, String> {
    s.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_course)
        .collect()
}

fn course_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Rewrite argv so `golf` defaults to `golf analyze`.
///
/// Rules:
/// - `golf`                    -> `golf analyze`
/// - `golf -c a.csv ...`       -> `golf analyze -c a.csv ...`
/// - `golf --help/--version/-h`-> unchanged (show top-level help/version)
pub fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "check");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "analyze flags".
    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
