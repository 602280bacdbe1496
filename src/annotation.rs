//! Drawing analysis results onto a copy of the analyzed image
//!
//! Annotation is meant for visualisation only and is not guaranteed to be
//! stable between runs. An overlay that cannot be drawn is skipped with a
//! warning; only copying the source image can fail.

use opencv::{
    core::{Mat, Point, Point2d, Scalar, Vector},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8, LINE_AA},
    prelude::*,
};
use tracing::warn;

use crate::constants::annotation as style;
use crate::geometry::rotate_points;
use crate::result::AnalysisResult;
use crate::{AnalysisError, Result, Settings};

/// Renders contours and, in verbose mode, labels, center lines and principal axes
#[derive(Debug, Clone)]
pub struct Annotator {
    verbose: bool,
    contour_color: Scalar,
    helper_color: Scalar,
}

impl Annotator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            verbose: settings.verbose_annotations,
            contour_color: settings.contour_annotation_color.into(),
            helper_color: settings.helper_annotation_color.into(),
        }
    }

    /// Annotate a copy of `image`; the results must come from the same image
    pub fn annotate(&self, image: &Mat, results: &[AnalysisResult]) -> Result<Mat> {
        let mut target = image
            .try_clone()
            .map_err(|e| AnalysisError::opencv("image copy", e))?;

        for (n, result) in results.iter().enumerate() {
            if let Err(e) = self.draw_contour(&mut target, result) {
                warn!(banana = n, error = %e, "failed to draw contour");
            }
            if !self.verbose {
                continue;
            }
            if let Err(e) = self.draw_label(&mut target, n, result) {
                warn!(banana = n, error = %e, "failed to draw label");
            }
            if let Err(e) = self.draw_center_line(&mut target, result) {
                warn!(banana = n, error = %e, "failed to draw center line");
            }
            if let Err(e) = self.draw_axes(&mut target, result) {
                warn!(banana = n, error = %e, "failed to draw principal axes");
            }
        }

        Ok(target)
    }

    fn draw_contour(&self, target: &mut Mat, result: &AnalysisResult) -> opencv::Result<()> {
        let mut contours = Vector::<Vector<Point>>::new();
        contours.push(Vector::from_slice(&result.contour));
        imgproc::draw_contours(
            target,
            &contours,
            0,
            self.contour_color,
            style::LINE_THICKNESS,
            LINE_8,
            &Mat::default(),
            i32::MAX,
            Point::new(0, 0),
        )
    }

    fn draw_label(&self, target: &mut Mat, n: usize, result: &AnalysisResult) -> opencv::Result<()> {
        imgproc::put_text(
            target,
            &n.to_string(),
            result.estimated_center + Point::new(10, -10),
            FONT_HERSHEY_SIMPLEX,
            style::FONT_SCALE,
            self.helper_color,
            style::FONT_THICKNESS,
            LINE_AA,
            false,
        )
    }

    /// Rotate the local-frame center line back into the image and draw it
    fn draw_center_line(&self, target: &mut Mat, result: &AnalysisResult) -> opencv::Result<()> {
        let pivot = Point2d::new(
            result.estimated_center.x as f64,
            result.estimated_center.y as f64,
        );
        let image_points: Vector<Point> =
            rotate_points(&result.center_line.points, pivot, -result.rotation_angle)
                .into_iter()
                .map(|p| Point::new(p.x.round() as i32, p.y.round() as i32))
                .collect();

        let mut polylines = Vector::<Vector<Point>>::new();
        polylines.push(image_points);
        imgproc::polylines(
            target,
            &polylines,
            false,
            self.helper_color,
            style::LINE_THICKNESS,
            LINE_AA,
            0,
        )
    }

    /// Arrows from the center along the primary and secondary axes
    fn draw_axes(&self, target: &mut Mat, result: &AnalysisResult) -> opencv::Result<()> {
        let center = result.estimated_center;
        let (sin, cos) = result.rotation_angle.sin_cos();
        let tip = |dx: f64, dy: f64, length: f64| {
            Point::new(
                center.x + (dx * length).round() as i32,
                center.y + (dy * length).round() as i32,
            )
        };

        for end in [
            tip(cos, sin, style::PRIMARY_AXIS_LENGTH),
            tip(-sin, cos, style::SECONDARY_AXIS_LENGTH),
        ] {
            imgproc::arrowed_line(
                target,
                center,
                end,
                self.helper_color,
                style::LINE_THICKNESS,
                LINE_AA,
                0,
                style::ARROW_TIP_LENGTH,
            )?;
        }
        Ok(())
    }
}
