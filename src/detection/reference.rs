//! Reference banana contour used as the shape-matching template
//!
//! The reference is stored as JSON with a single named point sequence:
//!
//! ```json
//! {"banana": [[56, 96], [57, 89], ...]}
//! ```

use std::path::Path;

use opencv::core::Point;
use serde::Deserialize;

use crate::error::SetupError;
use crate::result::Contour;

const BUILTIN_REFERENCE: &str = include_str!("../../resources/reference_banana.json");

/// Fewest points that still enclose an area
const MIN_POINTS: usize = 3;

#[derive(Deserialize)]
struct ReferenceDocument {
    banana: Option<Vec<[i32; 2]>>,
}

/// Immutable template contour, loaded once per analyzer
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceShape {
    contour: Contour,
}

impl ReferenceShape {
    /// The reference shipped with the crate
    pub fn builtin() -> Result<Self, SetupError> {
        Self::from_json_str(BUILTIN_REFERENCE)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SetupError> {
        let content = std::fs::read_to_string(path).map_err(|source| SetupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, SetupError> {
        let document: ReferenceDocument =
            serde_json::from_str(content).map_err(|source| SetupError::Parse {
                what: "reference shape".to_string(),
                source,
            })?;
        let points = document
            .banana
            .ok_or_else(|| SetupError::InvalidReferenceShape {
                reason: "no \"banana\" point sequence".to_string(),
            })?;
        Self::from_points(points.into_iter().map(|[x, y]| Point::new(x, y)).collect())
    }

    pub fn from_points(contour: Contour) -> Result<Self, SetupError> {
        if contour.len() < MIN_POINTS {
            return Err(SetupError::InvalidReferenceShape {
                reason: format!(
                    "need at least {} points, got {}",
                    MIN_POINTS,
                    contour.len()
                ),
            });
        }
        Ok(Self { contour })
    }

    pub fn contour(&self) -> &[Point] {
        &self.contour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_reference_loads() {
        let reference = ReferenceShape::builtin().unwrap();
        assert!(reference.contour().len() > 20);
    }

    #[test]
    fn test_parse_keeps_point_order() {
        let reference =
            ReferenceShape::from_json_str(r#"{"banana": [[1, 2], [3, 4], [5, 0]]}"#).unwrap();
        assert_eq!(
            reference.contour(),
            &[Point::new(1, 2), Point::new(3, 4), Point::new(5, 0)]
        );
    }

    #[test]
    fn test_missing_sequence_is_rejected() {
        let result = ReferenceShape::from_json_str(r#"{"apple": [[1, 2], [3, 4], [5, 0]]}"#);
        assert!(matches!(result, Err(SetupError::InvalidReferenceShape { .. })));
    }

    #[test]
    fn test_too_few_points_are_rejected() {
        let result = ReferenceShape::from_json_str(r#"{"banana": [[1, 2], [3, 4]]}"#);
        assert!(matches!(result, Err(SetupError::InvalidReferenceShape { .. })));
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        let result = ReferenceShape::from_json_str(r#"{"banana": [[1, "two"]]}"#);
        assert!(matches!(result, Err(SetupError::Parse { .. })));
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let result = ReferenceShape::from_json_file(Path::new("no/such/reference.json"));
        assert!(matches!(result, Err(SetupError::Io { .. })));
    }
}
