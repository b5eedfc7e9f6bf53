use crate::fit::RegressionError;
use crate::io::IngestError;

/// Process-level error: a user-facing message plus the exit code to return.
///
/// Exit codes:
/// - `1`: failed to write output
/// - `2`: input or configuration problem (missing file, bad reference date)
/// - `3`: not enough usable rounds to fit
/// - `4`: numerical failure while fitting
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::new(2, err.to_string())
    }
}

impl From<RegressionError> for AppError {
    fn from(err: RegressionError) -> Self {
        let code = match err {
            RegressionError::InsufficientData { .. } => 3,
            RegressionError::NonFinite => 4,
        };
        AppError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let missing = IngestError::NotFound {
            path: PathBuf::from("nope.csv"),
        };
        assert_eq!(AppError::from(missing).exit_code(), 2);

        let short = RegressionError::InsufficientData {
            required: 4,
            actual: 2,
        };
        let err = AppError::from(short);
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("at least 4"));

        assert_eq!(AppError::from(RegressionError::NonFinite).exit_code(), 4);
    }
}
