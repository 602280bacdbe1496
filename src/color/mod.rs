//! Color segmentation and ripeness classification
//!
//! This module thresholds images in HSV space and derives the ripeness of a
//! banana from the share of green, yellow and brown peel.

pub mod filter;
pub mod ripeness;

pub use filter::ColorFilter;
pub use ripeness::{RipenessClassifier, RipenessCounts};
