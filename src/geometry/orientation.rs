//! Principal component analysis of a contour's points
//!
//! Yields the centroid, the two principal directions ordered by decreasing
//! variance and the angle of the primary direction against the image x-axis.

use nalgebra::{Matrix2, SymmetricEigen, Vector2};
use opencv::core::{Point, Point2d};

/// Result of the principal component analysis of one contour
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    /// Mean of the contour points
    pub centroid: Point2d,
    /// Unit directions, highest variance first
    pub axes: [Point2d; 2],
    /// Variance along each of `axes`
    pub variances: [f64; 2],
    /// Angle of `axes[0]` against the image x-axis, radians in -π..π
    pub angle: f64,
}

impl Orientation {
    /// Centroid rounded to the nearest pixel
    pub fn center(&self) -> Point {
        Point::new(
            self.centroid.x.round() as i32,
            self.centroid.y.round() as i32,
        )
    }
}

/// Estimates the orientation of a candidate contour
#[derive(Debug, Default, Clone, Copy)]
pub struct OrientationEstimator;

impl OrientationEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Run the analysis on the contour points.
    ///
    /// An empty contour yields a zero orientation at the origin; a single
    /// point or a perfectly isotropic point cloud yields angle 0.
    pub fn estimate(&self, contour: &[Point]) -> Orientation {
        if contour.is_empty() {
            return Orientation {
                centroid: Point2d::new(0.0, 0.0),
                axes: [Point2d::new(1.0, 0.0), Point2d::new(0.0, 1.0)],
                variances: [0.0, 0.0],
                angle: 0.0,
            };
        }

        let n = contour.len() as f64;
        let mean = contour
            .iter()
            .fold(Vector2::<f64>::zeros(), |acc, p| acc + Vector2::new(p.x as f64, p.y as f64))
            / n;

        let covariance = contour.iter().fold(Matrix2::<f64>::zeros(), |acc, p| {
            let d = Vector2::new(p.x as f64, p.y as f64) - mean;
            acc + d * d.transpose()
        }) / n;

        let eigen = SymmetricEigen::new(covariance);
        let (primary, secondary) = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] {
            (0, 1)
        } else {
            (1, 0)
        };

        let axis = |i: usize| {
            let v = eigen.eigenvectors.column(i);
            Point2d::new(v[0], v[1])
        };
        let primary_axis = axis(primary);

        Orientation {
            centroid: Point2d::new(mean.x, mean.y),
            axes: [primary_axis, axis(secondary)],
            variances: [eigen.eigenvalues[primary], eigen.eigenvalues[secondary]],
            angle: primary_axis.y.atan2(primary_axis.x),
        }
    }
}
