//! Error types for geometry construction and layout rebuilds
//!
//! Only construction failures are errors. Out-of-range holes and pad
//! attributes are skipped during a build and never surface here.

use thiserror::Error;

/// Failures raised by the geometry kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The polyline collapsed below two distinct points after deduplication.
    #[error("ribbon needs at least 2 distinct points, got {count}")]
    TooFewPoints { count: usize },

    /// Ribbon width was zero, negative, NaN or infinite.
    #[error("ribbon width must be finite and > 0, got {0}")]
    InvalidWidth(f32),

    /// The plane the ribbon is projected onto is not a finite height.
    #[error("ribbon plane height must be finite, got {0}")]
    InvalidPlaneHeight(f32),

    /// Extrusion depth was zero, negative or non-finite.
    #[error("extrusion thickness must be finite and > 0, got {0}")]
    InvalidThickness(f32),

    /// Earcut could not triangulate the outline.
    #[error("outline triangulation failed: {0}")]
    Triangulation(String),
}

/// Failures that abort a full rebuild.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// Board dimensions must all be finite and positive.
    #[error("invalid board dimensions: width={width} height={height} depth={depth}")]
    InvalidBoard { width: f64, height: f64, depth: f64 },

    /// A trace could not be turned into a ribbon.
    #[error("trace #{index} rejected: {source}")]
    Trace {
        index: usize,
        #[source]
        source: GeometryError,
    },

    /// Board or copper outline could not be built.
    #[error("board geometry failed: {0}")]
    Board(#[from] GeometryError),

    /// The incoming JSON did not decode into a layout.
    #[error("layout decode failed: {0}")]
    Layout(#[from] LayoutError),
}

/// Failures while decoding or encoding the persisted layout JSON.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Malformed JSON or a field of the wrong type.
    #[error("invalid layout JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        LayoutError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_error_mentions_index() {
        let err = BuildError::Trace {
            index: 2,
            source: GeometryError::TooFewPoints { count: 1 },
        };
        let msg = err.to_string();
        assert!(msg.contains("#2"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_layout_error_from_serde() {
        let err: LayoutError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, LayoutError::Json(_)));
    }
}
