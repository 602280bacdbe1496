//! Outer contour extraction from a binary mask
//!
//! The mask is opened to remove speckles and median-blurred to smooth the
//! boundary before the outer contours are traced. Small or fragmented
//! regions disappear in the process.

use opencv::{
    core::{Mat, Point, Size, Vector},
    imgproc::{
        find_contours_def, get_structuring_element, median_blur, morphology_ex_def,
        CHAIN_APPROX_SIMPLE, MORPH_ELLIPSE, MORPH_OPEN, RETR_EXTERNAL,
    },
};

use crate::constants;
use crate::result::Contour;
use crate::{AnalysisError, Result};

/// Extracts the outer contours of all regions of a binary mask
#[derive(Debug, Clone, Copy)]
pub struct ShapeCandidateExtractor {
    opening_kernel_size: i32,
    blur_size: i32,
}

impl Default for ShapeCandidateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeCandidateExtractor {
    /// Create an extractor with the default kernel sizes
    pub fn new() -> Self {
        Self {
            opening_kernel_size: constants::detection::OPENING_KERNEL_SIZE,
            blur_size: constants::detection::MEDIAN_BLUR_SIZE,
        }
    }

    /// Create an extractor with custom kernel sizes; `blur_size` is forced odd
    pub fn with_params(opening_kernel_size: i32, blur_size: i32) -> Self {
        Self {
            opening_kernel_size: opening_kernel_size.max(1),
            blur_size: blur_size.max(1) | 1,
        }
    }

    /// Outer contours of the mask, redundant collinear points removed
    pub fn extract(&self, mask: &Mat) -> Result<Vec<Contour>> {
        let cleaned = self.clean(mask)?;

        let mut contours = Vector::<Vector<Point>>::new();
        find_contours_def(&cleaned, &mut contours, RETR_EXTERNAL, CHAIN_APPROX_SIMPLE)
            .map_err(|e| AnalysisError::opencv("contour detection", e))?;

        Ok(contours.iter().map(|contour| contour.to_vec()).collect())
    }

    /// Opening followed by median blur
    fn clean(&self, mask: &Mat) -> Result<Mat> {
        let kernel = get_structuring_element(
            MORPH_ELLIPSE,
            Size::new(self.opening_kernel_size, self.opening_kernel_size),
            Point::new(-1, -1),
        )
        .map_err(|e| AnalysisError::opencv("kernel creation", e))?;

        let mut opened = Mat::default();
        morphology_ex_def(mask, &mut opened, MORPH_OPEN, &kernel)
            .map_err(|e| AnalysisError::opencv("morphological opening", e))?;

        let mut blurred = Mat::default();
        median_blur(&opened, &mut blurred, self.blur_size)
            .map_err(|e| AnalysisError::opencv("median blur", e))?;

        Ok(blurred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::{
        core::{Rect, Scalar, CV_8UC1},
        imgproc,
    };

    fn blank_mask() -> Mat {
        Mat::new_rows_cols_with_default(200, 300, CV_8UC1, Scalar::all(0.0)).unwrap()
    }

    #[test]
    fn test_empty_mask_has_no_contours() {
        let contours = ShapeCandidateExtractor::new().extract(&blank_mask()).unwrap();
        assert!(contours.is_empty());
    }

    #[test]
    fn test_rectangle_is_compressed_to_corners() {
        let mut mask = blank_mask();
        imgproc::rectangle(
            &mut mask,
            Rect::new(50, 40, 100, 80),
            Scalar::all(255.0),
            imgproc::FILLED,
            imgproc::LINE_8,
            0,
        )
        .unwrap();

        let contours = ShapeCandidateExtractor::new().extract(&mask).unwrap();
        assert_eq!(contours.len(), 1);
        // a traced boundary would have ~360 points; corners are slightly rounded by the opening
        let points = contours[0].len();
        assert!((4..=40).contains(&points), "got {} points", points);
    }

    #[test]
    fn test_speckles_are_removed() {
        let mut mask = blank_mask();
        for (x, y) in [(10, 10), (100, 150), (250, 30)] {
            imgproc::rectangle(
                &mut mask,
                Rect::new(x, y, 2, 2),
                Scalar::all(255.0),
                imgproc::FILLED,
                imgproc::LINE_8,
                0,
            )
            .unwrap();
        }
        let contours = ShapeCandidateExtractor::new().extract(&mask).unwrap();
        assert!(contours.is_empty());
    }

    #[test]
    fn test_nested_regions_report_outer_boundary_only() {
        let mut mask = blank_mask();
        imgproc::rectangle(&mut mask, Rect::new(20, 20, 160, 160), Scalar::all(255.0), imgproc::FILLED, imgproc::LINE_8, 0)
            .unwrap();
        imgproc::rectangle(&mut mask, Rect::new(60, 60, 80, 80), Scalar::all(0.0), imgproc::FILLED, imgproc::LINE_8, 0)
            .unwrap();
        imgproc::rectangle(&mut mask, Rect::new(85, 85, 30, 30), Scalar::all(255.0), imgproc::FILLED, imgproc::LINE_8, 0)
            .unwrap();

        let contours = ShapeCandidateExtractor::new().extract(&mask).unwrap();
        assert_eq!(contours.len(), 1);
    }
}
