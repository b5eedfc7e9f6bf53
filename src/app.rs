//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves configuration (flags, then `.env`/environment, then defaults)
//! - sets up logging
//! - runs the analysis pipeline for each course
//! - writes optional exports

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{AnalyzeArgs, Command, InputArgs, parse_course_list, parse_reference_date};
use crate::domain::{AnalysisConfig, CourseInput};
use crate::error::AppError;
use crate::fit::QrRegression;
use crate::io::{CsvRoundParser, ParseOptions, export_file_name, write_fitted_csv};
use crate::report::TextDisplay;

pub mod pipeline;

use pipeline::{CourseAnalyzer, CourseOutcome};

/// Environment variable holding the reference date (`YYYY-MM-DD`).
pub const ENV_REFERENCE_DATE: &str = "GOLF_REFERENCE_DATE";
/// Environment variable holding the course list (`NAME=PATH;NAME=PATH`).
pub const ENV_COURSES: &str = "GOLF_COURSES";

/// Entry point for the `golf` binary.
pub fn run() -> Result<(), AppError> {
    // We want `golf` and `golf -c a.csv` to behave like `golf analyze ...`.
    let argv = crate::cli::rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_logging(cli.verbose);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Check(args) => handle_check(args),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so stdout stays a clean report.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = config_from_args(&args)?;
    info!(
        reference_date = %config.reference_date,
        courses = config.courses.len(),
        "starting analysis"
    );

    let parser = CsvRoundParser::new(
        config.reference_date,
        ParseOptions {
            legacy_x_condition: config.legacy_x_condition,
        },
    );
    let mut display = TextDisplay::new(std::io::stdout().lock());
    let run = CourseAnalyzer::new(&parser, &QrRegression, &mut display, config.show_data)
        .run(&config.courses)?;

    // Optional exports.
    if let Some(dir) = &config.export_dir {
        std::fs::create_dir_all(dir).map_err(|e| {
            AppError::new(
                2,
                format!("Failed to create export directory '{}': {e}", dir.display()),
            )
        })?;
        for course in &run.courses {
            let (CourseOutcome::Analyzed(analysis), Some(parsed)) = (&course.outcome, &course.parsed)
            else {
                continue;
            };
            let path = dir.join(export_file_name(&course.course.name));
            write_fitted_csv(&path, &parsed.rounds, &analysis.regression)?;
            info!(course = %course.course.name, path = %path.display(), "wrote fitted values");
        }
    }

    run.into_result().map(|_| ())
}

fn handle_check(args: InputArgs) -> Result<(), AppError> {
    let config = load_config(&args)?;
    let parser = CsvRoundParser::new(
        config.reference_date,
        ParseOptions {
            legacy_x_condition: config.legacy_x_condition,
        },
    );
    let mut display = TextDisplay::new(std::io::stdout().lock());
    pipeline::run_check(&parser, &mut display, &config.courses)?
        .into_result()
        .map(|_| ())
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve input settings, loading `.env` (if present) before consulting the
/// environment.
pub fn load_config(args: &InputArgs) -> Result<AnalysisConfig, AppError> {
    dotenvy::dotenv().ok();
    resolve_config(args, env_var)
}

/// Build the run configuration for `golf analyze`.
pub fn config_from_args(args: &AnalyzeArgs) -> Result<AnalysisConfig, AppError> {
    let mut config = load_config(&args.input)?;
    config.show_data = !args.no_show_data;
    config.export_dir = args.export_dir.clone();
    Ok(config)
}

/// Resolve input settings: CLI flags win, then `env`, then built-in defaults.
pub fn resolve_config<F>(args: &InputArgs, env: F) -> Result<AnalysisConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let reference_date = match args.reference_date {
        Some(date) => date,
        None => match env(ENV_REFERENCE_DATE) {
            Some(raw) => parse_reference_date(&raw)
                .map_err(|e| AppError::new(2, format!("{ENV_REFERENCE_DATE}: {e}")))?,
            None => default_reference_date()?,
        },
    };

    let courses = if !args.courses.is_empty() {
        args.courses.clone()
    } else {
        match env(ENV_COURSES) {
            Some(raw) => {
                let courses = parse_course_list(&raw)
                    .map_err(|e| AppError::new(2, format!("{ENV_COURSES}: {e}")))?;
                if courses.is_empty() {
                    return Err(AppError::new(2, format!("{ENV_COURSES} lists no courses.")));
                }
                courses
            }
            None => default_courses(),
        }
    };

    Ok(AnalysisConfig {
        reference_date,
        courses,
        legacy_x_condition: args.legacy_x_condition,
        show_data: true,
        export_dir: None,
    })
}

fn default_reference_date() -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(2023, 5, 21)
        .ok_or_else(|| AppError::new(2, "Invalid built-in reference date."))
}

fn default_courses() -> Vec<CourseInput> {
    vec![
        CourseInput {
            name: "Bhill".to_string(),
            path: PathBuf::from("data/bhill.csv"),
        },
        CourseInput {
            name: "Phaven".to_string(),
            path: PathBuf::from("data/phaven.csv"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn args() -> InputArgs {
        InputArgs {
            reference_date: None,
            courses: Vec::new(),
            legacy_x_condition: false,
        }
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let config = resolve_config(&args(), no_env).unwrap();
        assert_eq!(config.reference_date, NaiveDate::from_ymd_opt(2023, 5, 21).unwrap());
        assert_eq!(config.courses, default_courses());
        assert!(!config.legacy_x_condition);
    }

    #[test]
    fn env_fills_in_missing_flags() {
        let env = |key: &str| match key {
            ENV_REFERENCE_DATE => Some("2024-01-01".to_string()),
            ENV_COURSES => Some("North=n.csv;South=s.csv".to_string()),
            _ => None,
        };
        let config = resolve_config(&args(), env).unwrap();
        assert_eq!(config.reference_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let names: Vec<&str> = config.courses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["North", "South"]);
    }

    #[test]
    fn flags_win_over_env() {
        let mut args = args();
        args.reference_date = NaiveDate::from_ymd_opt(2022, 2, 2);
        args.courses = vec![CourseInput {
            name: "Flag".to_string(),
            path: PathBuf::from("flag.csv"),
        }];
        let env = |_: &str| Some("garbage".to_string());

        let config = resolve_config(&args, env).unwrap();
        assert_eq!(config.reference_date, NaiveDate::from_ymd_opt(2022, 2, 2).unwrap());
        assert_eq!(config.courses[0].name, "Flag");
    }

    #[test]
    fn bad_env_reference_date_is_a_config_error() {
        let env = |key: &str| (key == ENV_REFERENCE_DATE).then(|| "21/05/2023".to_string());
        let err = resolve_config(&args(), env).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with(ENV_REFERENCE_DATE));
    }
}
