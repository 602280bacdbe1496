//! Configuration for the banana analysis pipeline.
//!
//! [`Settings`] is an immutable snapshot handed to the
//! [`Analyzer`](crate::Analyzer) once; every field has a default so a partial
//! JSON document is enough:
//!
//! ```no_run
//! use banana_scan::Settings;
//! use std::path::Path;
//!
//! let settings = Settings::from_json_file(Path::new("settings.json"))?;
//! // or
//! let settings = Settings { verbose_annotations: true, ..Settings::default() };
//! # Ok::<(), banana_scan::SetupError>(())
//! ```

use opencv::core::Scalar;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants;
use crate::error::SetupError;

/// Lower/upper bound pair in OpenCV HSV space (H 0..180, S and V 0..256).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [f64; 3],
    pub upper: [f64; 3],
}

impl HsvRange {
    pub const fn new(lower: [f64; 3], upper: [f64; 3]) -> Self {
        Self { lower, upper }
    }

    const fn from_pair(pair: [[f64; 3]; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }

    pub fn lower_scalar(&self) -> Scalar {
        Scalar::new(self.lower[0], self.lower[1], self.lower[2], 0.0)
    }

    pub fn upper_scalar(&self) -> Scalar {
        Scalar::new(self.upper[0], self.upper[1], self.upper[2], 0.0)
    }
}

/// Color in BGR channel order, 0..255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BgrColor(pub [f64; 3]);

impl From<BgrColor> for Scalar {
    fn from(color: BgrColor) -> Self {
        Scalar::new(color.0[0], color.0[1], color.0[2], 0.0)
    }
}

/// What happens to the frame when one accepted candidate cannot be fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitFailurePolicy {
    /// Abort the whole frame with `PolynomialFitFailure`; no partial results
    #[default]
    EscalateFrame,
    /// Drop the failing candidate and keep analysing the others
    SkipCandidate,
}

/// All externally configurable settings used by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Draw index labels, center lines and principal axes in addition to contours
    pub verbose_annotations: bool,

    /// Maximum shape distance to the reference still accepted as a banana.
    /// Lower distance means more similar.
    pub match_max_score: f64,

    /// Exclusive lower bound of the enclosed area (px²)
    pub min_area: f64,

    /// Exclusive upper bound of the enclosed area (px²)
    pub max_area: f64,

    /// How long (in pixels) is a meter? Needed to report physical sizes.
    pub pixels_per_meter: f64,

    pub contour_annotation_color: BgrColor,
    pub helper_annotation_color: BgrColor,

    /// Range passed through before contour extraction
    pub filter: HsvRange,
    pub green: HsvRange,
    pub yellow: HsvRange,
    pub brown: HsvRange,

    pub fit_failure_policy: FitFailurePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            verbose_annotations: false,
            match_max_score: constants::detection::MATCH_MAX_SCORE,
            min_area: constants::detection::MIN_AREA,
            max_area: constants::detection::MAX_AREA,
            pixels_per_meter: constants::calibration::PIXELS_PER_METER,
            contour_annotation_color: BgrColor(constants::colors::CONTOUR),
            helper_annotation_color: BgrColor(constants::colors::HELPER),
            filter: HsvRange::from_pair(constants::hsv::FILTER),
            green: HsvRange::from_pair(constants::hsv::GREEN),
            yellow: HsvRange::from_pair(constants::hsv::YELLOW),
            brown: HsvRange::from_pair(constants::hsv::BROWN),
            fit_failure_policy: FitFailurePolicy::default(),
        }
    }
}

impl Settings {
    /// Check value ranges that would make analysis meaningless
    pub fn validate(&self) -> Result<(), SetupError> {
        if !(self.pixels_per_meter.is_finite() && self.pixels_per_meter > 0.0) {
            return Err(SetupError::invalid_setting(
                "pixels_per_meter",
                self.pixels_per_meter,
            ));
        }
        if !(self.match_max_score.is_finite() && self.match_max_score >= 0.0) {
            return Err(SetupError::invalid_setting(
                "match_max_score",
                self.match_max_score,
            ));
        }
        if !(self.min_area >= 0.0 && self.min_area < self.max_area) {
            return Err(SetupError::invalid_setting(
                "min_area",
                format!("{} (max_area {})", self.min_area, self.max_area),
            ));
        }
        for (name, range) in [
            ("filter", &self.filter),
            ("green", &self.green),
            ("yellow", &self.yellow),
            ("brown", &self.brown),
        ] {
            if (0..3).any(|i| range.lower[i] > range.upper[i]) {
                return Err(SetupError::invalid_setting(
                    name,
                    format!("{:?} > {:?}", range.lower, range.upper),
                ));
            }
        }
        Ok(())
    }

    /// Load settings from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, SetupError> {
        let content = std::fs::read_to_string(path).map_err(|source| SetupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, SetupError> {
        let settings: Self = serde_json::from_str(content).map_err(|source| SetupError::Parse {
            what: "settings".to_string(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<(), SetupError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SetupError::Parse {
            what: "settings".to_string(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SetupError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
