//! Rigid rotation of point sequences about a pivot
//!
//! Rotating by `angle` maps the direction `(cos angle, sin angle)` onto the
//! positive x-axis, so rotating an image-frame contour by its orientation
//! angle yields the local frame, and rotating by `-angle` goes back.

use opencv::core::{Point, Point2d};

/// Rotate real-valued points by `angle` radians around `pivot`
pub fn rotate_points(points: &[Point2d], pivot: Point2d, angle: f64) -> Vec<Point2d> {
    let (sin, cos) = angle.sin_cos();
    points
        .iter()
        .map(|p| {
            let dx = p.x - pivot.x;
            let dy = p.y - pivot.y;
            Point2d::new(pivot.x + cos * dx + sin * dy, pivot.y - sin * dx + cos * dy)
        })
        .collect()
}

/// Rotate an integer contour by `angle` radians around `pivot`, rounding to the nearest pixel
pub fn rotate_contour(contour: &[Point], pivot: Point, angle: f64) -> Vec<Point> {
    let points: Vec<Point2d> = contour
        .iter()
        .map(|p| Point2d::new(p.x as f64, p.y as f64))
        .collect();
    let pivot = Point2d::new(pivot.x as f64, pivot.y as f64);

    rotate_points(&points, pivot, angle)
        .into_iter()
        .map(|p| Point::new(p.x.round() as i32, p.y.round() as i32))
        .collect()
}
