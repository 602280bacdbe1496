//! Analysis result types and their human-readable rendering

use std::fmt;

use opencv::core::{Mat, Point, Point2d};
use serde::{Deserialize, Serialize};

/// Single closed boundary around a detected object, in image pixel coordinates.
pub type Contour = Vec<Point>;

/// The coefficients of `y = a0 + a1 * x + a2 * x^2`.
///
/// Unless rotated back explicitly these describe the curve in the object's
/// local frame, whose x-axis runs along the primary axis of the object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Polynomial2DCoefficients {
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Polynomial2DCoefficients {
    pub const fn new(a0: f64, a1: f64, a2: f64) -> Self {
        Self { a0, a1, a2 }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.a0 + self.a1 * x + self.a2 * x * x
    }
}

impl From<(f64, f64, f64)> for Polynomial2DCoefficients {
    fn from((a0, a1, a2): (f64, f64, f64)) -> Self {
        Self::new(a0, a1, a2)
    }
}

impl fmt::Display for Polynomial2DCoefficients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = {} + {} * x + {} * x^2", self.a0, self.a1, self.a2)
    }
}

/// Center line of a banana in its local (rotation-normalized) frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterLine {
    pub coefficients: Polynomial2DCoefficients,

    /// Points with 1px spacing on the local x-axis, spanning the whole banana
    pub points: Vec<Point2d>,
}

/// The analysis results for a banana which has been found in the image.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Contour of the banana in the image
    pub contour: Contour,

    /// Center line in the local frame; rotate by `-rotation_angle` around
    /// `estimated_center` to get image coordinates
    pub center_line: CenterLine,

    /// Angle of the primary axis against the image x-axis (radians, -π..π)
    pub rotation_angle: f64,

    /// Centroid of the contour. May lie outside the banana due to the curvature!
    pub estimated_center: Point,

    /// Mean curvature of the center line (1/m)
    pub mean_curvature: f64,

    /// Length along the center line (m)
    pub length: f64,

    /// 1.0 = ripe, below = not yet ripe, above = over-ripe
    pub ripeness: f64,
}

impl AnalysisResult {
    /// Radius of the circle with the same curvature (m); infinite for a straight banana
    pub fn curvature_radius(&self) -> f64 {
        if self.mean_curvature > 0.0 {
            1.0 / self.mean_curvature
        } else {
            f64::INFINITY
        }
    }
}

/// The analysis results together with an annotated copy of the image.
#[derive(Debug)]
pub struct AnnotatedAnalysisResult {
    /// Copy of the analyzed image with the results drawn onto it
    pub annotated_image: Mat,

    /// One entry per banana, in detection order; empty if none was found
    pub bananas: Vec<AnalysisResult>,
}

/// Serializable summary of one [`AnalysisResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BananaReport {
    pub index: usize,
    pub coefficients: Polynomial2DCoefficients,
    pub rotation_degrees: f64,
    pub estimated_center: [i32; 2],
    pub mean_curvature: f64,
    /// `None` when the banana is straight
    pub curvature_radius: Option<f64>,
    pub length: f64,
    pub ripeness: f64,
}

impl BananaReport {
    pub fn new(index: usize, result: &AnalysisResult) -> Self {
        let radius = result.curvature_radius();
        Self {
            index,
            coefficients: result.center_line.coefficients,
            rotation_degrees: result.rotation_angle.to_degrees(),
            estimated_center: [result.estimated_center.x, result.estimated_center.y],
            mean_curvature: result.mean_curvature,
            curvature_radius: radius.is_finite().then_some(radius),
            length: result.length,
            ripeness: result.ripeness,
        }
    }
}

impl AnnotatedAnalysisResult {
    pub fn reports(&self) -> Vec<BananaReport> {
        self.bananas
            .iter()
            .enumerate()
            .map(|(n, banana)| BananaReport::new(n, banana))
            .collect()
    }
}

impl fmt::Display for BananaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Banana #{}:", self.index)?;
        writeln!(f, "    center line: {}", self.coefficients)?;
        writeln!(f, "    rotation: {:.1}°", self.rotation_degrees)?;
        match self.curvature_radius {
            Some(radius) => writeln!(
                f,
                "    mean curvature: {:.3} 1/m (radius {:.3} m)",
                self.mean_curvature, radius
            )?,
            None => writeln!(f, "    mean curvature: 0 1/m (straight)")?,
        }
        writeln!(f, "    length: {:.3} m", self.length)?;
        writeln!(f, "    ripeness: {:.0}%", self.ripeness * 100.0)
    }
}

impl fmt::Display for AnnotatedAnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "found {} banana(s) in the picture", self.bananas.len())?;
        for report in self.reports() {
            write!(f, "{}", report)?;
        }
        Ok(())
    }
}
