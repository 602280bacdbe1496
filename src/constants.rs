//! Default parameters and fixed processing constants
//!
//! HSV values use OpenCV's 8-bit convention: hue in 0..180, saturation and
//! value in 0..256. Colors are given in BGR channel order.

/// Default detection thresholds
pub mod detection {
    /// Maximum `matchShapes` distance still accepted as a banana
    pub const MATCH_MAX_SCORE: f64 = 0.6;

    /// Minimum enclosed area of a banana (px²)
    pub const MIN_AREA: f64 = 1e5;

    /// Maximum enclosed area of a banana (px²)
    pub const MAX_AREA: f64 = 1e7;

    /// Elliptic kernel size of the morphological opening
    pub const OPENING_KERNEL_SIZE: i32 = 5;

    /// Aperture of the median blur applied after the opening (must be odd)
    pub const MEDIAN_BLUR_SIZE: i32 = 5;
}

/// Default extrinsic calibration
pub mod calibration {
    /// How many pixels span one meter in the object plane
    pub const PIXELS_PER_METER: f64 = 3000.0;
}

/// Default HSV threshold pairs as `[lower, upper]`
pub mod hsv {
    /// Pass-through filter separating saturated objects from a neutral background
    pub const FILTER: [[f64; 3]; 2] = [[0.0, 41.0, 0.0], [177.0, 255.0, 255.0]];

    /// Unripe peel
    pub const GREEN: [[f64; 3]; 2] = [[35.0, 50.0, 50.0], [85.0, 255.0, 255.0]];

    /// Ripe peel
    pub const YELLOW: [[f64; 3]; 2] = [[20.0, 100.0, 100.0], [30.0, 255.0, 255.0]];

    /// Over-ripe spots; the value ceiling stays below yellow's floor
    pub const BROWN: [[f64; 3]; 2] = [[10.0, 100.0, 20.0], [20.0, 200.0, 99.0]];
}

/// Annotation colors (BGR)
pub mod colors {
    pub const CONTOUR: [f64; 3] = [0.0, 255.0, 0.0];
    pub const HELPER: [f64; 3] = [0.0, 0.0, 255.0];
}

/// Ripeness classification
pub mod ripeness {
    /// Added to the classified pixel count so an empty region yields ripeness 1.0
    pub const EPSILON: f64 = 1e-6;
}

/// Annotation geometry
pub mod annotation {
    /// Length of the arrow along the principal axis (px)
    pub const PRIMARY_AXIS_LENGTH: f64 = 120.0;

    /// Length of the arrow along the secondary axis (px)
    pub const SECONDARY_AXIS_LENGTH: f64 = 60.0;

    pub const LINE_THICKNESS: i32 = 2;
    pub const FONT_SCALE: f64 = 1.5;
    pub const FONT_THICKNESS: i32 = 3;
    pub const ARROW_TIP_LENGTH: f64 = 0.1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_bounds_are_ordered() {
        assert!(detection::MIN_AREA < detection::MAX_AREA);
        assert!(detection::MEDIAN_BLUR_SIZE % 2 == 1);
    }

    #[test]
    fn test_ripeness_bands_are_disjoint() {
        let [green, yellow, brown] = [hsv::GREEN, hsv::YELLOW, hsv::BROWN];
        // green starts above yellow's hue ceiling
        assert!(green[0][0] > yellow[1][0]);
        // brown and yellow share hue 20 but not value
        assert!(brown[1][2] < yellow[0][2]);
    }
}
