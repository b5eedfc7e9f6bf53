//! Per-course analysis: fit, goodness of fit and a demonstration prediction.

use crate::domain::{AnalysisResult, RegressionResult, Round, SamplePrediction};
use crate::fit::regression::{RegressionError, Regressor};

/// Predict the most recent round (the last one in file order).
///
/// Returns `None` for an empty slice.
pub fn sample_prediction<R: Regressor + ?Sized>(
    regressor: &R,
    rounds: &[Round],
    result: &RegressionResult,
) -> Option<SamplePrediction> {
    let round = *rounds.last()?;
    let predicted = regressor.predict(result, round.elapsed_days, round.condition, round.multiplier);
    Some(SamplePrediction {
        round,
        predicted,
        actual: round.shots,
    })
}

/// Fit `rounds`, then evaluate R² and the sample prediction on the same rounds.
pub fn analyze<R: Regressor + ?Sized>(
    regressor: &R,
    rounds: &[Round],
) -> Result<AnalysisResult, RegressionError> {
    let regression = regressor.fit(rounds)?;
    let r_squared = regressor.r_squared(rounds, &regression);
    // A successful fit implies at least one round.
    let sample = sample_prediction(regressor, rounds, &regression).ok_or(
        RegressionError::InsufficientData {
            required: crate::fit::MIN_ROUNDS,
            actual: 0,
        },
    )?;

    Ok(AnalysisResult {
        regression,
        r_squared,
        sample,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::QrRegression;

    fn rounds() -> Vec<Round> {
        [(0, 72, 1.0, 1.0), (10, 75, 2.0, 1.0), (20, 74, 1.0, 2.0), (30, 80, 3.0, 1.5), (40, 79, 2.0, 2.0)]
            .into_iter()
            .map(|(elapsed_days, shots, condition, multiplier)| Round {
                elapsed_days,
                shots,
                condition,
                multiplier,
            })
            .collect()
    }

    #[test]
    fn sample_prediction_uses_last_round() {
        let rounds = rounds();
        let analysis = analyze(&QrRegression, &rounds).unwrap();

        assert_eq!(analysis.sample.round, rounds[4]);
        assert_eq!(analysis.sample.actual, 79);
        assert!(analysis.sample.predicted.is_finite());
        assert_eq!(analysis.regression.n, 5);
        assert!((0.0..=1.0).contains(&analysis.r_squared));
    }

    #[test]
    fn analyze_propagates_insufficient_data() {
        let rounds = rounds();
        let err = analyze(&QrRegression, &rounds[..3]).unwrap_err();
        assert_eq!(
            err,
            RegressionError::InsufficientData {
                required: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn sample_prediction_of_nothing_is_none() {
        let result = QrRegression.fit(&rounds()).unwrap();
        assert!(sample_prediction(&QrRegression, &[], &result).is_none());
    }
}
