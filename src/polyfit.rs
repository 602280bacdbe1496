//! Fit a two-dimensional polynomial (three coefficients) to a set of points.
//!
//! Minimizes `Σ (y_i - (a0 + a1·x_i + a2·x_i²))²` with a Levenberg-Marquardt
//! iteration starting from `(1, 1, 1)`. Callers only rely on the contract:
//! coefficients on convergence, a [`FitError`] otherwise.

use nalgebra::{Matrix3, Vector3};
use tracing::{debug, trace};

use crate::error::FitError;
use crate::result::Polynomial2DCoefficients;

/// Solver limits and termination tolerances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    pub max_iterations: usize,
    /// Stop when the relative cost decrease of an accepted step falls below this
    pub function_tolerance: f64,
    /// Stop when the max-norm of the gradient falls below this
    pub gradient_tolerance: f64,
    /// Stop when the step is this small relative to the parameters
    pub parameter_tolerance: f64,
    /// Starting Marquardt damping factor
    pub initial_damping: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            function_tolerance: 1e-10,
            gradient_tolerance: 1e-10,
            parameter_tolerance: 1e-10,
            initial_damping: 1e-4,
        }
    }
}

const MIN_DIAGONAL: f64 = 1e-6;
const MIN_DAMPING: f64 = 1e-15;
const MAX_DAMPING: f64 = 1e16;

/// Fit with [`FitOptions::default`]
pub fn fit_quadratic(points: &[(f64, f64)]) -> Result<Polynomial2DCoefficients, FitError> {
    fit_quadratic_with(points, &FitOptions::default())
}

pub fn fit_quadratic_with(
    points: &[(f64, f64)],
    options: &FitOptions,
) -> Result<Polynomial2DCoefficients, FitError> {
    if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(FitError::NonFinite);
    }
    let distinct_x = count_distinct_x(points);
    if distinct_x < 3 {
        return Err(FitError::Underdetermined { distinct_x });
    }

    // The model is linear in its parameters, so JᵀJ does not change between iterations.
    let mut jtj = Matrix3::<f64>::zeros();
    for &(x, _) in points {
        let j = basis(x);
        jtj += j * j.transpose();
    }
    let diagonal = Vector3::new(
        jtj[(0, 0)].max(MIN_DIAGONAL),
        jtj[(1, 1)].max(MIN_DIAGONAL),
        jtj[(2, 2)].max(MIN_DIAGONAL),
    );

    let mut params = Vector3::new(1.0, 1.0, 1.0);
    let mut cost = cost(points, &params);
    let mut damping = options.initial_damping;

    for iteration in 0..options.max_iterations {
        let gradient = gradient(points, &params);
        if gradient.amax() <= options.gradient_tolerance {
            debug!(iterations = iteration, cost, "gradient tolerance reached");
            return Ok(to_coefficients(&params));
        }

        let damped = jtj + Matrix3::from_diagonal(&(diagonal * damping));
        let step = damped.lu().solve(&(-gradient)).ok_or(FitError::Singular)?;
        if !step.iter().all(|v| v.is_finite()) {
            return Err(FitError::NonFinite);
        }

        if step.norm() <= options.parameter_tolerance * (params.norm() + options.parameter_tolerance) {
            debug!(iterations = iteration, cost, "parameter tolerance reached");
            return Ok(to_coefficients(&params));
        }

        let candidate = params + step;
        let candidate_cost = self::cost(points, &candidate);
        if !candidate_cost.is_finite() {
            return Err(FitError::NonFinite);
        }

        trace!(iteration, cost, candidate_cost, damping, "levenberg-marquardt step");

        if candidate_cost < cost {
            let decrease = cost - candidate_cost;
            params = candidate;
            damping = (damping / 10.0).max(MIN_DAMPING);
            if decrease <= options.function_tolerance * cost {
                debug!(iterations = iteration + 1, cost = candidate_cost, "function tolerance reached");
                return Ok(to_coefficients(&params));
            }
            cost = candidate_cost;
        } else {
            damping *= 10.0;
            if damping > MAX_DAMPING {
                break;
            }
        }
    }

    Err(FitError::NoConvergence {
        iterations: options.max_iterations,
    })
}

/// Partial derivatives of the model with respect to (a0, a1, a2)
#[inline]
fn basis(x: f64) -> Vector3<f64> {
    Vector3::new(1.0, x, x * x)
}

fn residual(x: f64, y: f64, params: &Vector3<f64>) -> f64 {
    basis(x).dot(params) - y
}

fn cost(points: &[(f64, f64)], params: &Vector3<f64>) -> f64 {
    0.5 * points
        .iter()
        .map(|&(x, y)| residual(x, y, params).powi(2))
        .sum::<f64>()
}

fn gradient(points: &[(f64, f64)], params: &Vector3<f64>) -> Vector3<f64> {
    points
        .iter()
        .fold(Vector3::zeros(), |acc, &(x, y)| acc + basis(x) * residual(x, y, params))
}

fn count_distinct_x(points: &[(f64, f64)]) -> usize {
    let mut xs: Vec<f64> = points.iter().map(|&(x, _)| x).collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    xs.len()
}

fn to_coefficients(params: &Vector3<f64>) -> Polynomial2DCoefficients {
    Polynomial2DCoefficients::new(params[0], params[1], params[2])
}
