//! Accept or reject candidate contours against the reference shape
//!
//! The shape distance is OpenCV's Hu-moment based `matchShapes` (method I1),
//! which is invariant to translation, scale and rotation. Lower distance
//! means more similar: a candidate is kept iff its distance is at most
//! `match_max_score` and its area lies strictly between the area bounds.

use opencv::{
    core::{Point, Vector},
    imgproc::{contour_area_def, match_shapes, CONTOURS_MATCH_I1},
};
use tracing::debug;

use crate::detection::ReferenceShape;
use crate::{AnalysisError, Result, Settings};

/// Outcome of validating one candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Accepted { distance: f64, area: f64 },
    TooDissimilar { distance: f64 },
    AreaOutOfBounds { area: f64 },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted { .. })
    }
}

/// Whether a shape distance counts as similar: lower distance = more similar = keep
pub fn is_similar_enough(distance: f64, max_distance: f64) -> bool {
    distance <= max_distance
}

/// Whether an area lies strictly inside the bounds
pub fn is_area_in_bounds(area: f64, min_area: f64, max_area: f64) -> bool {
    min_area < area && area < max_area
}

/// Scores candidate contours against the reference banana
#[derive(Debug)]
pub struct ShapeValidator {
    reference: Vector<Point>,
    max_distance: f64,
    min_area: f64,
    max_area: f64,
}

impl ShapeValidator {
    pub fn new(reference: &ReferenceShape, settings: &Settings) -> Self {
        Self {
            reference: Vector::from_slice(reference.contour()),
            max_distance: settings.match_max_score,
            min_area: settings.min_area,
            max_area: settings.max_area,
        }
    }

    /// Shape distance between the candidate and the reference
    pub fn distance(&self, candidate: &[Point]) -> Result<f64> {
        let candidate = Vector::from_slice(candidate);
        match_shapes(&candidate, &self.reference, CONTOURS_MATCH_I1, 0.0)
            .map_err(|e| AnalysisError::opencv("shape matching", e))
    }

    /// Enclosed area of the candidate (px²)
    pub fn area(&self, candidate: &[Point]) -> Result<f64> {
        let candidate = Vector::from_slice(candidate);
        contour_area_def(&candidate).map_err(|e| AnalysisError::opencv("contour area", e))
    }

    pub fn validate(&self, candidate: &[Point]) -> Result<Verdict> {
        let area = self.area(candidate)?;
        if !is_area_in_bounds(area, self.min_area, self.max_area) {
            debug!(area, "rejected candidate: area out of bounds");
            return Ok(Verdict::AreaOutOfBounds { area });
        }

        let distance = self.distance(candidate)?;
        if !is_similar_enough(distance, self.max_distance) {
            debug!(distance, "rejected candidate: shape too dissimilar");
            return Ok(Verdict::TooDissimilar { distance });
        }

        debug!(distance, area, "accepted candidate");
        Ok(Verdict::Accepted { distance, area })
    }

    pub fn is_banana(&self, candidate: &[Point]) -> Result<bool> {
        Ok(self.validate(candidate)?.is_accepted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaled_reference(reference: &ReferenceShape, factor: i32, offset: Point) -> Vec<Point> {
        reference
            .contour()
            .iter()
            .map(|p| Point::new(p.x * factor + offset.x, p.y * factor + offset.y))
            .collect()
    }

    fn permissive_settings() -> Settings {
        Settings {
            min_area: 100.0,
            max_area: 1e7,
            ..Settings::default()
        }
    }

    #[test]
    fn test_similarity_predicate_keeps_lower_distances() {
        assert!(is_similar_enough(0.0, 0.6));
        assert!(is_similar_enough(0.6, 0.6));
        assert!(!is_similar_enough(0.61, 0.6));
        // monotone: anything below an accepted distance is accepted too
        for step in 0..=100 {
            let distance = step as f64 * 0.01;
            assert_eq!(is_similar_enough(distance, 0.6), distance <= 0.6);
        }
    }

    #[test]
    fn test_area_bounds_are_exclusive() {
        assert!(is_area_in_bounds(50.0, 10.0, 100.0));
        assert!(!is_area_in_bounds(10.0, 10.0, 100.0));
        assert!(!is_area_in_bounds(100.0, 10.0, 100.0));
    }

    #[test]
    fn test_scaled_and_shifted_reference_is_accepted() {
        let reference = ReferenceShape::builtin().unwrap();
        let settings = permissive_settings();
        let validator = ShapeValidator::new(&reference, &settings);

        let candidate = scaled_reference(&reference, 3, Point::new(40, 25));
        let distance = validator.distance(&candidate).unwrap();
        assert!(distance < 0.05, "distance {}", distance);
        assert!(validator.is_banana(&candidate).unwrap());
    }

    #[test]
    fn test_bar_is_rejected_as_dissimilar() {
        let reference = ReferenceShape::builtin().unwrap();
        let settings = permissive_settings();
        let validator = ShapeValidator::new(&reference, &settings);

        let bar = vec![Point::new(0, 0), Point::new(300, 0), Point::new(300, 20), Point::new(0, 20)];
        let verdict = validator.validate(&bar).unwrap();
        assert!(matches!(verdict, Verdict::TooDissimilar { .. }), "{:?}", verdict);
    }

    #[test]
    fn test_small_banana_is_rejected_by_area() {
        let reference = ReferenceShape::builtin().unwrap();
        let settings = Settings::default();
        let validator = ShapeValidator::new(&reference, &settings);

        // the reference itself encloses far less than the default minimum area
        let verdict = validator.validate(reference.contour()).unwrap();
        assert!(matches!(verdict, Verdict::AreaOutOfBounds { .. }), "{:?}", verdict);
    }
}
