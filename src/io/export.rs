//! Export per-round fitted values to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! It holds evaluated data only; the coefficients themselves are not persisted.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{RegressionResult, Round};
use crate::error::AppError;
use crate::fit::predict;

/// One exported row.
#[derive(Debug, Serialize)]
struct FittedRow {
    elapsed_days: i64,
    shots: i32,
    condition: f64,
    multiplier: f64,
    predicted: f64,
    residual: f64,
}

impl FittedRow {
    fn new(round: &Round, result: &RegressionResult) -> Self {
        let predicted = predict(result, round.elapsed_days, round.condition, round.multiplier);
        Self {
            elapsed_days: round.elapsed_days,
            shots: round.shots,
            condition: round.condition,
            multiplier: round.multiplier,
            predicted,
            residual: f64::from(round.shots) - predicted,
        }
    }
}

/// Export file name for a course, e.g. `Bhill` -> `bhill_fitted.csv`.
pub fn export_file_name(course: &str) -> PathBuf {
    let stem: String = course
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    PathBuf::from(format!("{stem}_fitted.csv"))
}

/// Write per-round observed/predicted/residual values to a CSV file.
pub fn write_fitted_csv(
    path: &Path,
    rounds: &[Round],
    result: &RegressionResult,
) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;

    for round in rounds {
        writer
            .serialize(FittedRow::new(round, result))
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_file_name_is_filesystem_friendly() {
        assert_eq!(export_file_name("Bhill"), PathBuf::from("bhill_fitted.csv"));
        assert_eq!(
            export_file_name("Pine Haven/North"),
            PathBuf::from("pine_haven_north_fitted.csv")
        );
    }

    #[test]
    fn writes_header_and_residuals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let result = RegressionResult {
            intercept: 80.0,
            days_coef: 0.0,
            condition_coef: 1.0,
            multiplier_coef: 0.0,
            n: 4,
        };
        let rounds = [Round {
            elapsed_days: 3,
            shots: 85,
            condition: 2.0,
            multiplier: 1.0,
        }];

        write_fitted_csv(&path, &rounds, &result).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("elapsed_days,shots,condition,multiplier,predicted,residual")
        );
        assert_eq!(lines.next(), Some("3,85,2.0,1.0,82.0,3.0"));
        assert_eq!(lines.next(), None);
    }
}
