//! Multiple linear regression of shots on days, condition and multiplier.
//!
//! The model is fixed:
//!
//! ```text
//! shots ≈ β0 + β1·elapsed_days + β2·condition + β3·multiplier
//! ```
//!
//! Everything here is a pure function of its inputs; no state is kept between calls.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use crate::domain::{RegressionResult, Round};
use crate::math::solve_least_squares;

/// Number of unknown coefficients (intercept + three predictors).
pub const COEFFICIENTS: usize = 4;

/// Minimum number of rounds needed to fit the model.
pub const MIN_ROUNDS: usize = COEFFICIENTS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegressionError {
    #[error("Insufficient data: at least {required} rounds are required for regression, found {actual}.")]
    InsufficientData { required: usize, actual: usize },

    #[error("Regression produced non-finite coefficients.")]
    NonFinite,
}

/// Something that can fit the round model and answer questions about a fit.
pub trait Regressor {
    fn fit(&self, rounds: &[Round]) -> Result<RegressionResult, RegressionError>;

    fn predict(
        &self,
        result: &RegressionResult,
        elapsed_days: i64,
        condition: f64,
        multiplier: f64,
    ) -> f64 {
        predict(result, elapsed_days, condition, multiplier)
    }

    fn r_squared(&self, rounds: &[Round], result: &RegressionResult) -> f64 {
        r_squared(rounds, result)
    }
}

/// Ordinary least squares via QR decomposition.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrRegression;

impl Regressor for QrRegression {
    fn fit(&self, rounds: &[Round]) -> Result<RegressionResult, RegressionError> {
        fit(rounds)
    }
}

/// Fill a design row for one round.
///
/// The row includes the constant term first (intercept).
pub fn fill_design_row(round: &Round, out: &mut [f64; COEFFICIENTS]) {
    out[0] = 1.0;
    out[1] = round.elapsed_days as f64;
    out[2] = round.condition;
    out[3] = round.multiplier;
}

/// Build the `n×4` design matrix.
pub fn design_matrix(rounds: &[Round]) -> DMatrix<f64> {
    let mut x = DMatrix::<f64>::zeros(rounds.len(), COEFFICIENTS);
    let mut row = [0.0; COEFFICIENTS];
    for (i, round) in rounds.iter().enumerate() {
        fill_design_row(round, &mut row);
        for (j, v) in row.iter().enumerate() {
            x[(i, j)] = *v;
        }
    }
    x
}

/// Build the response vector of observed shots.
pub fn response_vector(rounds: &[Round]) -> DVector<f64> {
    DVector::from_iterator(rounds.len(), rounds.iter().map(|r| f64::from(r.shots)))
}

/// Fit the model by least squares.
pub fn fit(rounds: &[Round]) -> Result<RegressionResult, RegressionError> {
    if rounds.len() < MIN_ROUNDS {
        return Err(RegressionError::InsufficientData {
            required: MIN_ROUNDS,
            actual: rounds.len(),
        });
    }

    let x = design_matrix(rounds);
    let y = response_vector(rounds);
    // A predictor that is constant or collinear with earlier ones gets a zero
    // coefficient instead of failing the fit.
    let beta = solve_least_squares(&x, &y).ok_or(RegressionError::NonFinite)?;

    Ok(RegressionResult {
        intercept: beta[0],
        days_coef: beta[1],
        condition_coef: beta[2],
        multiplier_coef: beta[3],
        n: rounds.len(),
    })
}

/// Predict shots for arbitrary inputs. Extrapolation is allowed.
pub fn predict(result: &RegressionResult, elapsed_days: i64, condition: f64, multiplier: f64) -> f64 {
    let row = [1.0, elapsed_days as f64, condition, multiplier];
    result
        .coefficients()
        .iter()
        .zip(row)
        .map(|(beta, x)| beta * x)
        .sum()
}

/// Coefficient of determination of `result` evaluated on `rounds`.
///
/// `rounds` need not be the rows the model was fitted on. Returns `0.0` for an
/// empty set and for a set whose shots are all equal (no variance to explain).
pub fn r_squared(rounds: &[Round], result: &RegressionResult) -> f64 {
    if rounds.is_empty() {
        return 0.0;
    }

    let mean_observed =
        rounds.iter().map(|r| f64::from(r.shots)).sum::<f64>() / rounds.len() as f64;

    let mut total_ss = 0.0;
    let mut residual_ss = 0.0;
    for round in rounds {
        let observed = f64::from(round.shots);
        let predicted = predict(result, round.elapsed_days, round.condition, round.multiplier);
        total_ss += (observed - mean_observed).powi(2);
        residual_ss += (observed - predicted).powi(2);
    }

    if total_ss > 0.0 {
        1.0 - residual_ss / total_ss
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::{Distribution, Normal};

    const TOL: f64 = 1e-6;

    /// Noiseless rows from `shots = 70 + 0.01·day + 2·condition + 1·multiplier`.
    ///
    /// Days step by 100 and condition by 0.5 so every shot count is an integer.
    fn exact_rounds(n: usize) -> Vec<Round> {
        (0..n)
            .map(|i| {
                let elapsed_days = 100 * i as i64 - 300;
                let condition = (i % 3) as f64 * 0.5;
                let multiplier = ((i * i) % 5) as f64;
                let shots = 70.0 + 0.01 * elapsed_days as f64 + 2.0 * condition + multiplier;
                Round {
                    elapsed_days,
                    shots: shots.round() as i32,
                    condition,
                    multiplier,
                }
            })
            .collect()
    }

    #[test]
    fn fit_rejects_fewer_than_four_rounds() {
        for n in 0..MIN_ROUNDS {
            let err = fit(&exact_rounds(n)).unwrap_err();
            assert_eq!(
                err,
                RegressionError::InsufficientData {
                    required: 4,
                    actual: n,
                }
            );
        }
    }

    #[test]
    fn fit_accepts_exactly_four_rounds() {
        let rounds = exact_rounds(4);
        let result = fit(&rounds).unwrap();
        assert_eq!(result.n, 4);
    }

    #[test]
    fn fit_recovers_exact_coefficients() {
        let rounds = exact_rounds(9);
        let result = fit(&rounds).unwrap();

        assert_eq!(result.n, 9);
        for (got, want) in result.coefficients().into_iter().zip([70.0, 0.01, 2.0, 1.0]) {
            assert!((got - want).abs() < TOL, "{result:?}");
        }
        assert!((r_squared(&rounds, &result) - 1.0).abs() < TOL);
    }

    #[test]
    fn predictions_round_trip_on_noiseless_data() {
        let rounds = exact_rounds(12);
        let result = fit(&rounds).unwrap();
        for r in &rounds {
            let y = QrRegression.predict(&result, r.elapsed_days, r.condition, r.multiplier);
            assert!((y - f64::from(r.shots)).abs() < TOL, "{r:?} -> {y}");
        }
    }

    #[test]
    fn predict_extrapolates_without_validation() {
        let result = RegressionResult {
            intercept: 70.0,
            days_coef: 0.01,
            condition_coef: 2.0,
            multiplier_coef: 1.0,
            n: 4,
        };
        let y = predict(&result, 10_000, -3.0, 100.0);
        assert!((y - (70.0 + 100.0 - 6.0 + 100.0)).abs() < 1e-12);
    }

    #[test]
    fn r_squared_is_zero_for_empty_set() {
        let result = fit(&exact_rounds(6)).unwrap();
        assert_eq!(r_squared(&[], &result), 0.0);
    }

    #[test]
    fn r_squared_is_zero_without_variance() {
        let result = fit(&exact_rounds(6)).unwrap();
        let flat: Vec<Round> = exact_rounds(6)
            .into_iter()
            .map(|r| Round { shots: 80, ..r })
            .collect();
        let r2 = r_squared(&flat, &result);
        assert_eq!(r2, 0.0);
    }

    #[test]
    fn constant_multiplier_is_absorbed_by_intercept() {
        let rounds: Vec<Round> = exact_rounds(8)
            .into_iter()
            .map(|r| Round {
                multiplier: 1.0,
                shots: r.shots - r.multiplier as i32 + 1,
                ..r
            })
            .collect();

        let result = fit(&rounds).unwrap();
        assert_eq!(result.n, 8);
        assert_eq!(result.multiplier_coef, 0.0);
        assert!((result.intercept - 71.0).abs() < TOL, "{result:?}");
        assert!((result.days_coef - 0.01).abs() < TOL, "{result:?}");
        assert!((result.condition_coef - 2.0).abs() < TOL, "{result:?}");
        for r in &rounds {
            let y = predict(&result, r.elapsed_days, r.condition, r.multiplier);
            assert!((y - f64::from(r.shots)).abs() < TOL, "{r:?} -> {y}");
        }
    }

    #[test]
    fn course_file_with_one_multiplier_still_fits() {
        let reference = chrono::NaiveDate::from_ymd_opt(2023, 5, 21).unwrap();
        let lines = [
            "date,shots,condition,multiplier",
            "2023-04-02,96,2.5,1.00",
            "15 April 2023,94,2,1.00",
            "4/29/2023,95,3,1.00",
            "2023-05-06,91,1.5,1.00",
            "13 May 2023,92,2,1.00",
            "21/05/2023,89,1,1.00",
        ];
        let parsed = crate::io::parse_lines(lines, reference, crate::io::ParseOptions::default());
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);

        let result = fit(&parsed.rounds).unwrap();
        assert_eq!(result.n, 6);
        assert_eq!(result.multiplier_coef, 0.0);
        assert!(result.coefficients().iter().all(|b| b.is_finite()));
        let r2 = r_squared(&parsed.rounds, &result);
        assert!((0.0..=1.0).contains(&r2), "r2={r2}");
    }

    #[test]
    fn noisy_fit_beats_true_coefficients_in_sample() {
        let mut rng = StdRng::seed_from_u64(7);
        let noise = Normal::new(0.0, 1.5).unwrap();

        let truth = RegressionResult {
            intercept: 70.0,
            days_coef: 0.01,
            condition_coef: 2.0,
            multiplier_coef: 1.0,
            n: 0,
        };

        let rounds: Vec<Round> = (0..200)
            .map(|_| {
                let elapsed_days = rng.gen_range(0..730);
                let condition = rng.gen_range(0.0..4.0);
                let multiplier = rng.gen_range(0.8..1.3);
                let shots = predict(&truth, elapsed_days, condition, multiplier)
                    + noise.sample(&mut rng);
                Round {
                    elapsed_days,
                    shots: shots.round() as i32,
                    condition,
                    multiplier,
                }
            })
            .collect();

        let result = fit(&rounds).unwrap();
        assert!((result.days_coef - 0.01).abs() < 0.003, "{result:?}");
        assert!((result.condition_coef - 2.0).abs() < 0.6, "{result:?}");

        let r2 = r_squared(&rounds, &result);
        assert!(r2 > 0.5 && r2 < 1.0, "r2={r2}");
        // Least squares minimizes in-sample residuals, so it cannot lose to the truth.
        assert!(r2 >= r_squared(&rounds, &truth) - 1e-12);
    }

    #[test]
    fn r_squared_can_be_evaluated_on_another_sample() {
        let train = exact_rounds(8);
        let result = fit(&train).unwrap();

        let holdout: Vec<Round> = exact_rounds(8)
            .into_iter()
            .map(|r| Round {
                shots: r.shots + if r.elapsed_days % 200 == 0 { 1 } else { -1 },
                ..r
            })
            .collect();
        let r2 = r_squared(&holdout, &result);
        assert!(r2 < 1.0);
        assert!(r2 > 0.0);
    }

    #[test]
    fn design_matrix_columns_are_in_fixed_order() {
        let rounds = [Round {
            elapsed_days: -12,
            shots: 90,
            condition: 1.5,
            multiplier: 0.9,
        }];
        let x = design_matrix(&rounds);
        assert_eq!(x.shape(), (1, 4));
        assert_eq!(x.row(0).iter().copied().collect::<Vec<_>>(), vec![1.0, -12.0, 1.5, 0.9]);
        assert_eq!(response_vector(&rounds)[0], 90.0);
    }
}
