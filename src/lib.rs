//! # Banana Scan
//!
//! A Rust crate for finding bananas in photographs and measuring them.
//!
//! For every banana in an 8-bit BGR image the analyzer reports:
//! - the contour and the rotation of its principal axis
//! - a quadratic center line in the banana's local frame
//! - mean curvature (1/m) and length (m), using a pixels-per-meter calibration
//! - ripeness from the share of green, yellow and brown peel
//!
//! Candidates are separated from a neutral background with an HSV filter and
//! kept only if their shape resembles a reference banana.
//!
//! ## Example
//!
//! ```rust,no_run
//! use banana_scan::{image_loader::load_image, Analyzer, Settings};
//! use std::path::Path;
//!
//! let analyzer = Analyzer::new(Settings::default()).expect("default settings are valid");
//! let image = load_image(Path::new("bananas.jpg"))?;
//! let result = analyzer.analyze_and_annotate_image(&image)?;
//! println!("{}", result);
//! # Ok::<(), banana_scan::AnalysisError>(())
//! ```

pub mod analyzer;
pub mod annotation;
pub mod color;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod image_loader;
pub mod polyfit;
pub mod result;

pub use analyzer::Analyzer;
pub use config::{BgrColor, FitFailurePolicy, HsvRange, Settings};
pub use error::{AnalysisError, FitError, Result, SetupError};
pub use result::{
    AnalysisResult, AnnotatedAnalysisResult, BananaReport, CenterLine, Contour,
    Polynomial2DCoefficients,
};
