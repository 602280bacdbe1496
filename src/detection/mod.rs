//! Banana candidate detection
//!
//! This module turns a binary color mask into outer contours and keeps those
//! which resemble the reference banana shape closely enough.

pub mod candidates;
pub mod reference;
pub mod validator;

pub use candidates::ShapeCandidateExtractor;
pub use reference::ReferenceShape;
pub use validator::{ShapeValidator, Verdict};
