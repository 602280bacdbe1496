//! Geometric analysis of a single banana contour
//!
//! This module estimates the orientation of a contour, moves it between the
//! image frame and the banana's local frame, fits its center line and derives
//! curvature and length from it.

pub mod center_line;
pub mod metrics;
pub mod orientation;
pub mod rotation;

pub use center_line::CenterLineFitter;
pub use orientation::{Orientation, OrientationEstimator};
pub use rotation::{rotate_contour, rotate_points};
