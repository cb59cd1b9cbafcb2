//! Build configuration
//!
//! Constants that shape the generated scene: feature inset margins, copper
//! stacking epsilon, tessellation density and material colours. All fields
//! have defaults so a partial JSON object is enough to override a few.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Smallest circle segment count accepted for any round outline.
pub const MIN_CIRCLE_SEGMENTS: u32 = 24;

/// Tunables for the primitive builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildConfig {
    /// Inset applied to normalized hole positions
    pub hole_margin: f32,
    /// Inset applied to normalized pad positions
    pub pad_margin: f32,
    /// Gap between the board surface and each copper plane
    pub copper_epsilon: f32,
    pub board_curve_segments: u32,
    pub copper_curve_segments: u32,
    pub hole_wall_segments: u32,
    pub pad_segments: u32,
    /// Miter extension cap, in multiples of half the trace width
    pub miter_limit: f32,
    /// Used when a trace omits `width`
    pub default_trace_width: f64,
    pub colors: Palette,
}

/// Material colours as 0xRRGGBB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    pub board: u32,
    pub copper: u32,
    pub hole_wall: u32,
    pub trace_fill: u32,
    pub trace_outline: u32,
    pub trace_hover: u32,
    pub pad_edge: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            board: 0x212529,
            copper: 0x087f5b,
            hole_wall: 0x111111,
            trace_fill: 0x0b7a4b,
            trace_outline: 0x099268,
            trace_hover: 0xffff00,
            pad_edge: 0x2b1405,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            hole_margin: 0.98,
            pad_margin: 0.95,
            copper_epsilon: 0.0008,
            board_curve_segments: 48,
            copper_curve_segments: 48,
            hole_wall_segments: 24,
            pad_segments: 24,
            miter_limit: 4.0,
            default_trace_width: 0.06,
            colors: Palette::default(),
        }
    }
}

impl BuildConfig {
    /// Parse overrides from JSON; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, LayoutError> {
        let config: BuildConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp segment counts to the round-outline floor
    pub fn sanitized(mut self) -> Self {
        self.board_curve_segments = self.board_curve_segments.max(MIN_CIRCLE_SEGMENTS);
        self.copper_curve_segments = self.copper_curve_segments.max(MIN_CIRCLE_SEGMENTS);
        self.hole_wall_segments = self.hole_wall_segments.max(MIN_CIRCLE_SEGMENTS);
        self.pad_segments = self.pad_segments.max(MIN_CIRCLE_SEGMENTS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r#"{"padMargin": 0.9, "holeWallSegments": 8}"#;
        let cfg = BuildConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.pad_margin, 0.9);
        assert_eq!(cfg.hole_margin, 0.98);
        assert_eq!(cfg.hole_wall_segments, MIN_CIRCLE_SEGMENTS);
        assert_eq!(cfg.colors.board, 0x212529);
    }
}
