//! Curvature and length of a sampled center line
//!
//! Both metrics take the center line in pixels together with the
//! pixels-per-meter calibration and report physical units: curvature in 1/m,
//! length in m.

use opencv::core::Point2d;

/// Arithmetic mean of `|y''| / (1 + y'^2)^1.5` over the interior samples.
///
/// Derivatives are central differences in pixel units. Since curvature is
/// inversely proportional to length, the pixel result is scaled by
/// `pixels_per_meter`, which is the same as converting to meters first.
/// Fewer than three points have no interior sample and yield `0.0`.
pub fn mean_curvature(points: &[Point2d], pixels_per_meter: f64) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let curvatures: Vec<f64> = points
        .windows(3)
        .filter_map(|w| {
            let (prev, cur, next) = (w[0], w[1], w[2]);
            let dx_back = cur.x - prev.x;
            let dx_fwd = next.x - cur.x;
            if dx_back <= 0.0 || dx_fwd <= 0.0 {
                return None;
            }
            let slope_back = (cur.y - prev.y) / dx_back;
            let slope_fwd = (next.y - cur.y) / dx_fwd;
            let first = (next.y - prev.y) / (dx_back + dx_fwd);
            let second = 2.0 * (slope_fwd - slope_back) / (dx_back + dx_fwd);
            Some(second.abs() / (1.0 + first * first).powf(1.5))
        })
        .collect();

    if curvatures.is_empty() {
        return 0.0;
    }
    let mean_px = curvatures.iter().sum::<f64>() / curvatures.len() as f64;
    mean_px * pixels_per_meter
}

/// Sum of the distances between consecutive points, converted to meters
pub fn length(points: &[Point2d], pixels_per_meter: f64) -> f64 {
    let length_px: f64 = points
        .windows(2)
        .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
        .sum();
    length_px / pixels_per_meter
}
