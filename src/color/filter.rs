//! HSV range thresholding

use opencv::{
    core::{self, Mat},
    imgproc::{self, COLOR_BGR2HSV},
    prelude::*,
};

use crate::config::HsvRange;
use crate::{AnalysisError, Result};

/// Produces a binary mask of the pixels whose HSV value lies inside a range.
///
/// The input image is never modified; in-range pixels are 255 in the mask,
/// all others 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorFilter {
    range: HsvRange,
}

impl ColorFilter {
    pub fn new(range: HsvRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> &HsvRange {
        &self.range
    }

    /// Threshold a BGR image
    pub fn apply(&self, image: &Mat) -> Result<Mat> {
        let hsv = to_hsv(image)?;
        self.apply_hsv(&hsv)
    }

    /// Threshold an image already converted with [`to_hsv`]
    pub fn apply_hsv(&self, hsv: &Mat) -> Result<Mat> {
        let mut mask = Mat::default();
        core::in_range(
            hsv,
            &self.range.lower_scalar(),
            &self.range.upper_scalar(),
            &mut mask,
        )
        .map_err(|e| AnalysisError::opencv("HSV range threshold", e))?;
        Ok(mask)
    }

    /// Number of pixels of a BGR image inside the range
    pub fn count(&self, image: &Mat) -> Result<usize> {
        count_foreground(&self.apply(image)?)
    }
}

/// Convert a BGR image to OpenCV's 8-bit HSV representation
pub fn to_hsv(image: &Mat) -> Result<Mat> {
    let mut hsv = Mat::default();
    imgproc::cvt_color_def(image, &mut hsv, COLOR_BGR2HSV)
        .map_err(|e| AnalysisError::opencv("BGR to HSV conversion", e))?;
    Ok(hsv)
}

/// Number of non-zero pixels in a single-channel mask
pub fn count_foreground(mask: &Mat) -> Result<usize> {
    let count = core::count_non_zero(mask)
        .map_err(|e| AnalysisError::opencv("count non-zero", e))?;
    Ok(count.max(0) as usize)
}
