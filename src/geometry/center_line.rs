//! Center line of a banana in its local frame

use opencv::core::{Point, Point2d};
use tracing::debug;

use crate::error::FitError;
use crate::polyfit::{self, FitOptions};
use crate::result::{CenterLine, Polynomial2DCoefficients};

/// Fits the center line through a contour that has already been rotated so
/// that its primary axis runs along the x-axis.
#[derive(Debug, Clone, Default)]
pub struct CenterLineFitter {
    options: FitOptions,
}

impl CenterLineFitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FitOptions) -> Self {
        Self { options }
    }

    /// Coefficients of the quadratic minimizing the residuals over all contour points
    pub fn coefficients(&self, rotated_contour: &[Point]) -> Result<Polynomial2DCoefficients, FitError> {
        let points: Vec<(f64, f64)> = rotated_contour
            .iter()
            .map(|p| (p.x as f64, p.y as f64))
            .collect();
        let coefficients = polyfit::fit_quadratic_with(&points, &self.options)?;
        debug!(%coefficients, points = points.len(), "fitted center line");
        Ok(coefficients)
    }

    /// Sample the curve at every integer x from the contour's min x to its max x (inclusive)
    pub fn sample(
        &self,
        rotated_contour: &[Point],
        coefficients: &Polynomial2DCoefficients,
    ) -> Vec<Point2d> {
        let Some(min_x) = rotated_contour.iter().map(|p| p.x).min() else {
            return Vec::new();
        };
        let max_x = rotated_contour.iter().map(|p| p.x).max().unwrap_or(min_x);

        (min_x..=max_x)
            .map(|x| {
                let x = x as f64;
                Point2d::new(x, coefficients.evaluate(x))
            })
            .collect()
    }

    /// Fit and sample in one go
    pub fn fit(&self, rotated_contour: &[Point]) -> Result<CenterLine, FitError> {
        let coefficients = self.coefficients(rotated_contour)?;
        let points = self.sample(rotated_contour, &coefficients);
        Ok(CenterLine {
            coefficients,
            points,
        })
    }
}
