//! Ripeness from the share of green, yellow and brown peel
//!
//! `ripeness = 1 - green_share + brown_share`, with shares taken over all
//! pixels classified into one of the three bands. The result is 1.0 for a
//! fully yellow banana, drops towards 0.0 with green peel and rises towards
//! 2.0 with brown spots. A region without classified pixels yields 1.0.

use opencv::{
    core::{Mat, Point, Scalar, Vector, CV_8UC1},
    imgproc,
    prelude::*,
};

use crate::color::filter::{count_foreground, to_hsv, ColorFilter};
use crate::constants;
use crate::{AnalysisError, Result, Settings};

/// Pixel counts per color band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RipenessCounts {
    pub green: usize,
    pub yellow: usize,
    pub brown: usize,
}

impl RipenessCounts {
    pub fn total(&self) -> usize {
        self.green + self.yellow + self.brown
    }

    /// Ripeness scalar derived from the counts
    pub fn ripeness(&self) -> f64 {
        let total = self.total() as f64 + constants::ripeness::EPSILON;
        let green_share = self.green as f64 / total;
        let brown_share = self.brown as f64 / total;
        1.0 - green_share + brown_share
    }
}

/// Classifies the peel of a single banana
#[derive(Debug, Clone)]
pub struct RipenessClassifier {
    green: ColorFilter,
    yellow: ColorFilter,
    brown: ColorFilter,
}

impl RipenessClassifier {
    pub fn new(settings: &Settings) -> Self {
        Self {
            green: ColorFilter::new(settings.green),
            yellow: ColorFilter::new(settings.yellow),
            brown: ColorFilter::new(settings.brown),
        }
    }

    /// Count the band pixels of an image that contains exactly one banana
    /// (everything outside of it blacked out)
    pub fn count(&self, banana_image: &Mat) -> Result<RipenessCounts> {
        let hsv = to_hsv(banana_image)?;
        Ok(RipenessCounts {
            green: count_foreground(&self.green.apply_hsv(&hsv)?)?,
            yellow: count_foreground(&self.yellow.apply_hsv(&hsv)?)?,
            brown: count_foreground(&self.brown.apply_hsv(&hsv)?)?,
        })
    }

    pub fn classify(&self, banana_image: &Mat) -> Result<f64> {
        Ok(self.count(banana_image)?.ripeness())
    }

    /// Classify the region of `image` enclosed by `contour`
    pub fn classify_region(&self, image: &Mat, contour: &[Point]) -> Result<f64> {
        let masked = masked_image(image, contour)?;
        self.classify(&masked)
    }
}

/// Copy of `image` in which every pixel outside of `contour` is black
pub fn masked_image(image: &Mat, contour: &[Point]) -> Result<Mat> {
    let mut mask = Mat::new_rows_cols_with_default(image.rows(), image.cols(), CV_8UC1, Scalar::all(0.0))
        .map_err(|e| AnalysisError::opencv("mask creation", e))?;

    let mut polygons = Vector::<Vector<Point>>::new();
    polygons.push(Vector::from_slice(contour));
    imgproc::fill_poly_def(&mut mask, &polygons, Scalar::all(255.0))
        .map_err(|e| AnalysisError::opencv("contour mask fill", e))?;

    let mut masked = Mat::new_rows_cols_with_default(image.rows(), image.cols(), image.typ(), Scalar::all(0.0))
        .map_err(|e| AnalysisError::opencv("masked image creation", e))?;
    image
        .copy_to_masked(&mut masked, &mask)
        .map_err(|e| AnalysisError::opencv("masked copy", e))?;
    Ok(masked)
}
