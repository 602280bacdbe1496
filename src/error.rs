//! Error types for the banana_scan library
//!
//! Two classes of failure exist:
//! - [`AnalysisError`] is returned by a single analysis call and terminates
//!   only that call (one frame / one request).
//! - [`SetupError`] is returned while building an [`Analyzer`](crate::Analyzer)
//!   and means analysis must not be attempted at all.
//!
//! Candidates rejected by shape validation are not errors; they are dropped
//! from the result list.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for banana_scan analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Why the quadratic center-line fit did not produce coefficients
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Fewer than three distinct x positions, so three coefficients are not determined
    #[error("need at least 3 distinct x values, got {distinct_x}")]
    Underdetermined { distinct_x: usize },

    /// An input point or an intermediate value was NaN or infinite
    #[error("non-finite value encountered while fitting")]
    NonFinite,

    /// The damped normal equations could not be solved
    #[error("normal equations are singular")]
    Singular,

    /// The solver ran out of iterations before meeting any tolerance
    #[error("did not converge after {iterations} iterations")]
    NoConvergence { iterations: usize },
}

/// Errors terminating a single call to the analyzer
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The provided image has no usable pixel data
    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },

    /// The center line of an accepted candidate could not be fitted
    #[error("Unable to calculate the center line of a banana: {source}")]
    PolynomialFitFailure {
        #[from]
        source: FitError,
    },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// OpenCV operation failed
    #[error("OpenCV error during {operation}: {source}")]
    OpenCvError {
        operation: String,
        #[source]
        source: opencv::Error,
    },
}

impl AnalysisError {
    /// Create an invalid image error
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }

    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an OpenCV error with context
    pub fn opencv(operation: impl Into<String>, source: opencv::Error) -> Self {
        Self::OpenCvError {
            operation: operation.into(),
            source,
        }
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::InvalidImage { .. } => {
                "The image contains no usable pixel data.".to_string()
            }
            AnalysisError::PolynomialFitFailure { .. } => {
                "Unable to calculate the center line of a banana.".to_string()
            }
            AnalysisError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            AnalysisError::OpenCvError { operation, .. } => {
                format!("Image processing failed while running {}.", operation)
            }
        }
    }
}

/// Errors raised while constructing an analyzer; analysis must not proceed
#[derive(Error, Debug)]
pub enum SetupError {
    /// A configuration or reference-shape file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration or reference-shape document is not valid JSON for its schema
    #[error("Failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// The reference-shape document does not describe a usable contour
    #[error("Invalid reference shape: {reason}")]
    InvalidReferenceShape { reason: String },

    /// A settings value is out of its valid range
    #[error("Invalid setting: {parameter} = {value}")]
    InvalidSetting { parameter: String, value: String },
}

impl SetupError {
    pub(crate) fn invalid_setting(parameter: &str, value: impl ToString) -> Self {
        Self::InvalidSetting {
            parameter: parameter.to_string(),
            value: value.to_string(),
        }
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            SetupError::Io { path, .. } => format!("Could not read {}.", path.display()),
            SetupError::Parse { what, .. } => format!("The {} file is malformed.", what),
            SetupError::InvalidReferenceShape { .. } => {
                "The reference banana shape is unusable.".to_string()
            }
            SetupError::InvalidSetting { parameter, .. } => {
                format!("The setting '{}' has an invalid value.", parameter)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_error_converts_into_analysis_error() {
        let err: AnalysisError = FitError::NoConvergence { iterations: 100 }.into();
        assert!(matches!(
            err,
            AnalysisError::PolynomialFitFailure {
                source: FitError::NoConvergence { iterations: 100 }
            }
        ));
        assert!(err.to_string().contains("did not converge after 100 iterations"));
    }

    #[test]
    fn test_user_messages_are_not_empty() {
        let errors = [
            AnalysisError::invalid_image("empty"),
            AnalysisError::from(FitError::Singular),
            AnalysisError::ImageLoadError {
                message: "x".into(),
                source: None,
            },
        ];
        for err in &errors {
            assert!(!err.user_message().is_empty());
        }
    }

    #[test]
    fn test_setup_error_display() {
        let err = SetupError::invalid_setting("pixels_per_meter", -1.0);
        assert_eq!(err.to_string(), "Invalid setting: pixels_per_meter = -1");
    }
}
