//! Materials, per-group pad shader state, trace outlines and lights
//!
//! These are plain data handed to the rendering backend; nothing here
//! compiles shaders or allocates GPU resources.

use serde::Serialize;

/// Surface appearance of a mesh
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// 0xRRGGBB
    pub color: u32,
    pub opacity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub double_sided: bool,
}

impl Material {
    pub fn standard(color: u32) -> Self {
        Self {
            color,
            opacity: 1.0,
            roughness: 0.85,
            metalness: 0.0,
            double_sided: false,
        }
    }

    pub fn double_sided(color: u32) -> Self {
        Self {
            roughness: 1.0,
            double_sided: true,
            ..Self::standard(color)
        }
    }

    /// Seen from both faces so the bottom layer renders from below
    pub fn copper(color: u32) -> Self {
        Self {
            roughness: 0.35,
            metalness: 0.85,
            double_sided: true,
            ..Self::standard(color)
        }
    }
}

/// Uniforms shared by every instance of a pad group. Ids are instance
/// indices; `None` means nothing is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PadShaderState {
    pub hovered_id: Option<usize>,
    pub selected_id: Option<usize>,
    /// Seconds, drives the selection pulse only
    pub time: f32,
}

impl PadShaderState {
    pub fn set_hovered_id(&mut self, id: Option<usize>) {
        self.hovered_id = id;
    }

    pub fn set_selected_id(&mut self, id: Option<usize>) {
        self.selected_id = id;
    }

    pub fn update_time(&mut self, seconds: f32) {
        self.time = seconds;
    }
}

/// Edge-only overlay drawn on top of a trace. Hover swaps the colour,
/// never the fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineOverlay {
    /// Boundary edges as vertex index pairs into the owning mesh
    pub edges: Vec<(u32, u32)>,
    pub base_color: u32,
    pub hover_color: u32,
    pub hovered: bool,
}

impl OutlineOverlay {
    pub fn new(edges: Vec<(u32, u32)>, base_color: u32, hover_color: u32) -> Self {
        Self {
            edges,
            base_color,
            hover_color,
            hovered: false,
        }
    }

    pub fn color(&self) -> u32 {
        if self.hovered {
            self.hover_color
        } else {
            self.base_color
        }
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Light {
    Ambient { color: u32, intensity: f32 },
    Hemisphere { sky: u32, ground: u32, intensity: f32 },
    Directional { color: u32, intensity: f32, position: [f32; 3] },
}

/// Hemisphere fill, key lights from above and below, and ambient
pub fn lighting_rig() -> Vec<(&'static str, Light)> {
    vec![
        ("HEMI_LIGHT", Light::Hemisphere { sky: 0xffffff, ground: 0x222233, intensity: 0.8 }),
        (
            "DIR_LIGHT",
            Light::Directional { color: 0xffffff, intensity: 1.2, position: [8.0, 10.0, 6.0] },
        ),
        (
            "DIR_LIGHT_BOTTOM",
            Light::Directional { color: 0xffffff, intensity: 1.2, position: [8.0, -10.0, 6.0] },
        ),
        ("AMBIENT_LIGHT", Light::Ambient { color: 0xffffff, intensity: 0.9 }),
    ]
}
