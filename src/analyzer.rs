//! The banana analysis pipeline
//!
//! For every frame:
//! - threshold the image with the pass-through HSV filter
//! - extract external contours from the mask
//! - keep the contours that look like the reference banana
//! - per banana: principal axes, local frame, center line, curvature, length
//!   and ripeness
//!
//! The analyzer holds only immutable configuration, so one instance can
//! serve concurrent callers.

use opencv::{
    core::{Mat, CV_8UC3},
    prelude::*,
};
use tracing::{debug, info, warn};

use crate::annotation::Annotator;
use crate::color::{ColorFilter, RipenessClassifier};
use crate::config::FitFailurePolicy;
use crate::detection::{ReferenceShape, ShapeCandidateExtractor, ShapeValidator};
use crate::error::SetupError;
use crate::geometry::{metrics, rotate_contour, CenterLineFitter, OrientationEstimator};
use crate::result::{AnalysisResult, AnnotatedAnalysisResult, Contour};
use crate::{AnalysisError, Result, Settings};

/// Finds bananas in BGR images and measures them
#[derive(Debug, Clone)]
pub struct Analyzer {
    settings: Settings,
    reference: ReferenceShape,
}

impl Analyzer {
    /// Analyzer with the built-in reference banana
    pub fn new(settings: Settings) -> std::result::Result<Self, SetupError> {
        Self::with_reference(settings, ReferenceShape::builtin()?)
    }

    /// Analyzer matching against a custom reference shape
    pub fn with_reference(
        settings: Settings,
        reference: ReferenceShape,
    ) -> std::result::Result<Self, SetupError> {
        settings.validate()?;
        Ok(Self {
            settings,
            reference,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn reference(&self) -> &ReferenceShape {
        &self.reference
    }

    /// Find and measure all bananas in an 8-bit BGR image.
    ///
    /// Results are in contour detection order. An image without bananas
    /// yields an empty list. The image is never modified.
    pub fn analyze_image(&self, image: &Mat) -> Result<Vec<AnalysisResult>> {
        check_image(image)?;

        let mask = ColorFilter::new(self.settings.filter).apply(image)?;
        let candidates = ShapeCandidateExtractor::new().extract(&mask)?;
        let candidate_count = candidates.len();

        let validator = ShapeValidator::new(&self.reference, &self.settings);
        let mut bananas = Vec::new();
        for candidate in candidates {
            if validator.is_banana(&candidate)? {
                bananas.push(candidate);
            }
        }
        debug!(candidates = candidate_count, accepted = bananas.len(), "validated candidates");

        let results = self.analyze_candidates(image, bananas)?;
        info!(bananas = results.len(), "analyzed image");
        Ok(results)
    }

    /// Like [`analyze_image`](Self::analyze_image), additionally returning an
    /// annotated copy of the image.
    pub fn analyze_and_annotate_image(&self, image: &Mat) -> Result<AnnotatedAnalysisResult> {
        let bananas = self.analyze_image(image)?;
        let annotated_image = Annotator::new(&self.settings).annotate(image, &bananas)?;
        Ok(AnnotatedAnalysisResult {
            annotated_image,
            bananas,
        })
    }

    /// Measure accepted contours, honoring the fit failure policy
    pub(crate) fn analyze_candidates(
        &self,
        image: &Mat,
        bananas: Vec<Contour>,
    ) -> Result<Vec<AnalysisResult>> {
        let classifier = RipenessClassifier::new(&self.settings);
        let mut results = Vec::with_capacity(bananas.len());

        for (n, contour) in bananas.into_iter().enumerate() {
            match self.analyze_banana(image, &classifier, contour) {
                Ok(result) => results.push(result),
                Err(AnalysisError::PolynomialFitFailure { source })
                    if self.settings.fit_failure_policy == FitFailurePolicy::SkipCandidate =>
                {
                    warn!(banana = n, error = %source, "skipping banana without center line");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(results)
    }

    fn analyze_banana(
        &self,
        image: &Mat,
        classifier: &RipenessClassifier,
        contour: Contour,
    ) -> Result<AnalysisResult> {
        let orientation = OrientationEstimator::new().estimate(&contour);
        let center = orientation.center();
        let rotated = rotate_contour(&contour, center, orientation.angle);

        let center_line = CenterLineFitter::new().fit(&rotated)?;
        let ppm = self.settings.pixels_per_meter;
        let mean_curvature = metrics::mean_curvature(&center_line.points, ppm);
        let length = metrics::length(&center_line.points, ppm);
        let ripeness = classifier.classify_region(image, &contour)?;

        debug!(
            angle = orientation.angle,
            mean_curvature, length, ripeness, "measured banana"
        );

        Ok(AnalysisResult {
            contour,
            center_line,
            rotation_angle: orientation.angle,
            estimated_center: center,
            mean_curvature,
            length,
            ripeness,
        })
    }
}

fn check_image(image: &Mat) -> Result<()> {
    if image.empty() {
        return Err(AnalysisError::invalid_image("image has no pixels"));
    }
    if image.typ() != CV_8UC3 {
        return Err(AnalysisError::invalid_image(format!(
            "expected an 8-bit 3-channel BGR image, got type {}",
            image.typ()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FitError;
    use opencv::core::{Point, Scalar, Vector, CV_8UC1};
    use opencv::imgproc;

    const _: () = {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Analyzer>();
    };

    fn white_image(rows: i32, cols: i32) -> Mat {
        Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(255.0)).unwrap()
    }

    /// Tapered crescent: inner and outer arcs meeting at pointed ends
    fn crescent(center: (f64, f64), radius: f64, width: f64, from_deg: f64, to_deg: f64) -> Contour {
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

    fn draw(image: &mut Mat, contour: &Contour) {
        let mut polygons = Vector::<Vector<Point>>::new();
        polygons.push(Vector::from_slice(contour));
        imgproc::fill_poly_def(image, &polygons, Scalar::new(0.0, 220.0, 240.0, 0.0)).unwrap();
    }

    fn analyzer(policy: FitFailurePolicy) -> Analyzer {
        Analyzer::new(Settings {
            min_area: 1e4,
            fit_failure_policy: policy,
            ..Settings::default()
        })
        .unwrap()
    }

    fn degenerate() -> Contour {
        vec![Point::new(10, 10), Point::new(20, 20)]
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let settings = Settings {
            pixels_per_meter: 0.0,
            ..Settings::default()
        };
        assert!(matches!(
            Analyzer::new(settings),
            Err(SetupError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_empty_image_is_invalid() {
        let result = analyzer(FitFailurePolicy::default()).analyze_image(&Mat::default());
        assert!(matches!(result, Err(AnalysisError::InvalidImage { .. })));
    }

    #[test]
    fn test_grayscale_image_is_invalid() {
        let gray = Mat::new_rows_cols_with_default(50, 50, CV_8UC1, Scalar::all(0.0)).unwrap();
        let result = analyzer(FitFailurePolicy::default()).analyze_image(&gray);
        assert!(matches!(result, Err(AnalysisError::InvalidImage { .. })));
    }

    #[test]
    fn test_blank_image_has_no_bananas() {
        let results = analyzer(FitFailurePolicy::default())
            .analyze_image(&white_image(300, 400))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_single_crescent_is_measured() {
        let mut image = white_image(500, 900);
        draw(&mut image, &crescent((450.0, 150.0), 250.0, 110.0, 20.0, 160.0));

        let results = analyzer(FitFailurePolicy::default()).analyze_image(&image).unwrap();
        assert_eq!(results.len(), 1);

        let banana = &results[0];
        assert!(banana.mean_curvature > 0.0);
        assert!(banana.length > 0.0);
        assert!(!banana.center_line.points.is_empty());
        assert!((banana.ripeness - 1.0).abs() < 0.05, "ripeness {}", banana.ripeness);
    }

    #[test]
    fn test_fit_failure_escalates_by_default() {
        let mut image = white_image(500, 900);
        let valid = crescent((450.0, 150.0), 250.0, 110.0, 20.0, 160.0);
        draw(&mut image, &valid);

        let result = analyzer(FitFailurePolicy::EscalateFrame)
            .analyze_candidates(&image, vec![valid, degenerate()]);
        assert!(matches!(
            result,
            Err(AnalysisError::PolynomialFitFailure {
                source: FitError::Underdetermined { .. }
            })
        ));
    }

    #[test]
    fn test_fit_failure_skips_candidate_when_configured() {
        let mut image = white_image(500, 900);
        let valid = crescent((450.0, 150.0), 250.0, 110.0, 20.0, 160.0);
        draw(&mut image, &valid);

        let results = analyzer(FitFailurePolicy::SkipCandidate)
            .analyze_candidates(&image, vec![degenerate(), valid.clone()])
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].contour, valid);
    }

    #[test]
    fn test_annotated_result_matches_plain_analysis() {
        let mut image = white_image(500, 900);
        draw(&mut image, &crescent((450.0, 150.0), 250.0, 110.0, 20.0, 160.0));
        let analyzer = analyzer(FitFailurePolicy::default());

        let plain = analyzer.analyze_image(&image).unwrap();
        let annotated = analyzer.analyze_and_annotate_image(&image).unwrap();
        assert_eq!(plain, annotated.bananas);
        assert_eq!(annotated.annotated_image.size().unwrap(), image.size().unwrap());
    }
}
