//! Synthetic banana scenes shared by the integration tests

#![allow(dead_code)]

use banana_scan::{geometry::rotate_points, AnalysisResult, Contour, Settings};
use opencv::{
    core::{Mat, Point, Point2d, Point2f, Scalar, Vector, CV_8UC3},
    imgproc,
    prelude::*,
};

pub const YELLOW: [f64; 3] = [0.0, 220.0, 240.0];
pub const GREEN: [f64; 3] = [0.0, 200.0, 0.0];
pub const BROWN: [f64; 3] = [20.0, 60.0, 90.0];

/// Tapered crescent between `from_deg` and `to_deg` on a circle of `radius`.
///
/// The width is largest in the middle and zero at both ends, like a banana
/// seen from the side.
pub fn crescent(center: (f64, f64), radius: f64, width: f64, from_deg: f64, to_deg: f64) -> Contour {
    let steps = 60;
    let point = |t: f64, side: f64| {
        let angle = (from_deg + (to_deg - from_deg) * t).to_radians();
        let r = radius + side * width / 2.0 * (std::f64::consts::PI * t).sin();
        Point::new(
            (center.0 + r * angle.cos()).round() as i32,
            (center.1 + r * angle.sin()).round() as i32,
        )
    };
    let outer = (0..=steps).map(|i| point(i as f64 / steps as f64, 1.0));
    let inner = (1..steps).rev().map(|i| point(i as f64 / steps as f64, -1.0));
    outer.chain(inner).collect()
}

/// Banana bending downwards, centered in a 900x500 scene
pub fn upper_banana() -> Contour {
    crescent((450.0, 150.0), 250.0, 110.0, 20.0, 160.0)
}

/// Banana bending upwards, placed in the lower right of a 1400x700 scene
pub fn lower_banana() -> Contour {
    crescent((1050.0, 450.0), 250.0, 110.0, 200.0, 340.0)
}

pub fn white_image(rows: i32, cols: i32) -> Mat {
    Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(255.0)).unwrap()
}

pub fn fill(image: &mut Mat, contour: &Contour, bgr: [f64; 3]) {
    let mut polygons = Vector::<Vector<Point>>::new();
    polygons.push(Vector::from_slice(contour));
    imgproc::fill_poly_def(image, &polygons, Scalar::new(bgr[0], bgr[1], bgr[2], 0.0)).unwrap();
}

pub fn single_banana_scene(bgr: [f64; 3]) -> Mat {
    let mut image = white_image(500, 900);
    fill(&mut image, &upper_banana(), bgr);
    image
}

pub fn two_banana_scene() -> Mat {
    let mut image = white_image(700, 1400);
    fill(&mut image, &upper_banana(), YELLOW);
    fill(&mut image, &lower_banana(), YELLOW);
    image
}

/// Default settings with an area floor suited to the synthetic scenes
pub fn scene_settings() -> Settings {
    Settings {
        min_area: 1e4,
        ..Settings::default()
    }
}

/// Center line of a result rotated back from the local frame into image coordinates
pub fn center_line_in_image(result: &AnalysisResult) -> Vec<Point2d> {
    let pivot = Point2d::new(
        result.estimated_center.x as f64,
        result.estimated_center.y as f64,
    );
    rotate_points(&result.center_line.points, pivot, -result.rotation_angle)
}

/// Distance of `point` to the contour edge: positive inside, negative outside
pub fn signed_distance(contour: &Contour, point: Point2d) -> f64 {
    let contour = Vector::from_slice(contour);
    imgproc::point_polygon_test(
        &contour,
        Point2f::new(point.x as f32, point.y as f32),
        true,
    )
    .unwrap()
}
