//! Canonical layout model
//!
//! This is the exact shape persisted to and loaded from JSON. Hole and pad
//! positions are normalized to [-1, 1] per board axis; trace points are raw
//! board units. Decoding never mutates the caller's value and fills
//! defaults for every optional field.

use serde::{Deserialize, Deserializer, Serialize};

use crate::draw::geometry::PlanePoint;
use crate::error::LayoutError;

pub const LAYOUT_VERSION: u32 = 1;

fn default_version() -> u32 {
    LAYOUT_VERSION
}

fn default_pad_size() -> [f64; 2] {
    [0.1, 0.1]
}

fn default_pad_radius() -> f64 {
    0.09
}

fn default_pad_thickness() -> f64 {
    0.001
}

fn default_group_name() -> String {
    "SMD_PADS".to_string()
}

/// Absent or `null` numbers read as 0
fn number_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// `[a, b]` with `null` entries or a short array allowed; gaps are `None`
fn partial_pair<'de, D>(deserializer: D) -> Result<Option<[Option<f64>; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<f64>>>::deserialize(deserializer)?;
    Ok(raw.map(|v| [v.first().copied().flatten(), v.get(1).copied().flatten()]))
}

/// Copper side a pad group or trace lives on. Unknown strings decode to
/// `Top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CopperSide {
    #[default]
    Top,
    Bottom,
}

impl CopperSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopperSide::Top => "TOP_COPPER",
            CopperSide::Bottom => "BOTTOM_COPPER",
        }
    }
}

impl From<String> for CopperSide {
    fn from(s: String) -> Self {
        if s == "BOTTOM_COPPER" {
            CopperSide::Bottom
        } else {
            CopperSide::Top
        }
    }
}

impl From<CopperSide> for String {
    fn from(side: CopperSide) -> Self {
        side.as_str().to_string()
    }
}

/// Pad footprint. Unknown strings decode to `Rectangle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PadShape {
    #[default]
    Rectangle,
    Circle,
}

impl PadShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            PadShape::Rectangle => "RECTANGLE",
            PadShape::Circle => "CIRCLE",
        }
    }
}

impl From<String> for PadShape {
    fn from(s: String) -> Self {
        if s == "CIRCLE" {
            PadShape::Circle
        } else {
            PadShape::Rectangle
        }
    }
}

impl From<PadShape> for String {
    fn from(shape: PadShape) -> Self {
        shape.as_str().to_string()
    }
}

/// Board blank dimensions. `height` is the thickness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Default for Board {
    fn default() -> Self {
        Self { width: 6.0, height: 0.10, depth: 4.0 }
    }
}

impl Board {
    pub fn is_valid(&self) -> bool {
        [self.width, self.height, self.depth]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    pub fn half_width(&self) -> f32 {
        (self.width * 0.5) as f32
    }

    pub fn half_depth(&self) -> f32 {
        (self.depth * 0.5) as f32
    }
}

/// Drilled hole at a normalized position with a world-unit radius. Missing
/// fields read as 0, so a hole without a radius is invalid and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    #[serde(default, deserialize_with = "number_or_zero")]
    pub x: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub z: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub r: f64,
}

impl Hole {
    /// Inside the normalized square with a positive radius
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.z.is_finite()
            && self.r.is_finite()
            && self.x.abs() <= 1.0
            && self.z.abs() <= 1.0
            && self.r > 0.0
    }

    pub fn world_center(&self, half_width: f32, half_depth: f32, margin: f32) -> PlanePoint {
        PlanePoint::new(
            self.x as f32 * half_width * margin,
            self.z as f32 * half_depth * margin,
        )
    }
}

/// One pad of a group. Decoded through [`PadGroup`], which fills a partial
/// `size` from the group's `default_pad_size`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PadAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub position: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl PadAttribute {
    pub fn has_valid_position(&self) -> bool {
        let [x, z] = self.position;
        x.is_finite() && z.is_finite() && x.abs() <= 1.0 && z.abs() <= 1.0
    }
}

/// Pads sharing one shape and copper side, rendered as one instanced object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PadGroupRecord")]
pub struct PadGroup {
    pub shape: PadShape,
    pub layer: CopperSide,
    pub name: String,
    pub default_pad_size: [f64; 2],
    pub default_radius: f64,
    pub default_thickness: f64,
    pub pad_attributes: Vec<PadAttribute>,
}

/// Pad attribute as it appears in the file
#[derive(Deserialize)]
struct PadAttributeRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "partial_pair")]
    position: Option<[Option<f64>; 2]>,
    #[serde(default, deserialize_with = "partial_pair")]
    size: Option<[Option<f64>; 2]>,
    #[serde(default)]
    radius: Option<f64>,
}

/// Pad group as it appears in the file
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PadGroupRecord {
    #[serde(default)]
    shape: PadShape,
    #[serde(default)]
    layer: CopperSide,
    #[serde(default = "default_group_name")]
    name: String,
    #[serde(default = "default_pad_size")]
    default_pad_size: [f64; 2],
    #[serde(default = "default_pad_radius")]
    default_radius: f64,
    #[serde(default = "default_pad_thickness")]
    default_thickness: f64,
    #[serde(default)]
    pad_attributes: Vec<PadAttributeRecord>,
}

impl From<PadGroupRecord> for PadGroup {
    fn from(record: PadGroupRecord) -> Self {
        let [default_sx, default_sz] = record.default_pad_size;
        let pad_attributes = record
            .pad_attributes
            .into_iter()
            .map(|a| {
                let [x, z] = a.position.unwrap_or_default();
                PadAttribute {
                    name: a.name,
                    position: [x.unwrap_or(0.0), z.unwrap_or(0.0)],
                    size: a
                        .size
                        .map(|[sx, sz]| [sx.unwrap_or(default_sx), sz.unwrap_or(default_sz)]),
                    radius: a.radius,
                }
            })
            .collect();
        PadGroup {
            shape: record.shape,
            layer: record.layer,
            name: record.name,
            default_pad_size: record.default_pad_size,
            default_radius: record.default_radius,
            default_thickness: record.default_thickness,
            pad_attributes,
        }
    }
}

impl Default for PadGroup {
    fn default() -> Self {
        Self {
            shape: PadShape::default(),
            layer: CopperSide::default(),
            name: default_group_name(),
            default_pad_size: default_pad_size(),
            default_radius: default_pad_radius(),
            default_thickness: default_pad_thickness(),
            pad_attributes: Vec::new(),
        }
    }
}

/// Trace vertex in raw board units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    pub x: f64,
    pub z: f64,
}

impl TracePoint {
    pub fn to_plane(&self) -> PlanePoint {
        PlanePoint::new(self.x as f32, self.z as f32)
    }
}

/// Copper trace. A missing width is left unset so export reproduces the
/// input; the builder substitutes its configured default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub layer: CopperSide,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default)]
    pub points: Vec<TracePoint>,
}

impl Trace {
    pub fn width_or(&self, default: f64) -> f64 {
        self.width.unwrap_or(default)
    }
}

/// Root of the persisted layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutModel {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub board: Board,
    #[serde(default)]
    pub holes: Vec<Hole>,
    #[serde(default)]
    pub pads: Vec<PadGroup>,
    #[serde(default)]
    pub traces: Vec<Trace>,
}

impl Default for LayoutModel {
    fn default() -> Self {
        Self {
            version: LAYOUT_VERSION,
            board: Board::default(),
            holes: Vec::new(),
            pads: Vec::new(),
            traces: Vec::new(),
        }
    }
}

impl LayoutModel {
    /// Decode a JSON value into canonical form. The input is only borrowed.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, LayoutError> {
        Ok(LayoutModel::deserialize(value)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_applied() {
        let value = json!({
            "board": { "width": 6.0, "height": 0.1, "depth": 4.0 },
            "pads": [{
                "shape": "CIRCLE",
                "padAttributes": [{ "position": [0.1, 0.2], "radius": 2.0 }]
            }]
        });
        let model = LayoutModel::from_value(&value).unwrap();
        assert_eq!(model.version, 1);
        assert!(model.holes.is_empty());
        assert!(model.traces.is_empty());
        assert_eq!(model.pads[0].shape, PadShape::Circle);
        assert_eq!(model.pads[0].layer, CopperSide::Top);
        assert_eq!(model.pads[0].name, "SMD_PADS");
        assert_eq!(model.pads[0].default_radius, 0.09);
        // The caller's value is untouched
        assert!(value.get("version").is_none());
    }

    #[test]
    fn test_unknown_layer_and_shape_fall_back() {
        let value = json!({
            "pads": [{ "shape": "OVAL", "layer": "INNER_1", "name": "X" }],
            "traces": [{ "layer": "BOTTOM_COPPER", "points": [] }]
        });
        let model = LayoutModel::from_value(&value).unwrap();
        assert_eq!(model.pads[0].shape, PadShape::Rectangle);
        assert_eq!(model.pads[0].layer, CopperSide::Top);
        assert_eq!(model.traces[0].layer, CopperSide::Bottom);
        assert_eq!(model.traces[0].width, None);
        assert_eq!(model.traces[0].width_or(0.06), 0.06);
    }

    #[test]
    fn test_hole_validity() {
        assert!(Hole { x: 1.0, z: -1.0, r: 0.03 }.is_valid());
        assert!(!Hole { x: 1.01, z: 0.0, r: 0.03 }.is_valid());
        assert!(!Hole { x: 0.0, z: -1.5, r: 0.03 }.is_valid());
        assert!(!Hole { x: 0.0, z: 0.0, r: 0.0 }.is_valid());
        assert!(!Hole { x: f64::NAN, z: 0.0, r: 0.1 }.is_valid());
    }

    #[test]
    fn test_hole_with_missing_fields_is_skipped_not_rejected() {
        let model = LayoutModel::from_value(&json!({
            "holes": [
                { "x": 0.5, "z": 0.5 },
                { "x": null, "z": 0.2, "r": 0.03 },
                { "x": 0.1, "z": 0.1, "r": 0.03 }
            ]
        }))
        .unwrap();
        assert_eq!(model.holes[0], Hole { x: 0.5, z: 0.5, r: 0.0 });
        assert!(!model.holes[0].is_valid());
        assert_eq!(model.holes[1], Hole { x: 0.0, z: 0.2, r: 0.03 });
        assert!(model.holes[2].is_valid());
    }

    #[test]
    fn test_pad_attribute_gaps_take_defaults() {
        let model = LayoutModel::from_value(&json!({
            "pads": [{
                "defaultPadSize": [0.4, 0.6],
                "padAttributes": [
                    { "position": null, "size": [2] },
                    { "position": [0.3], "size": [null, 3] },
                    { "size": null },
                    {}
                ]
            }]
        }))
        .unwrap();
        let attrs = &model.pads[0].pad_attributes;
        assert_eq!(attrs[0].position, [0.0, 0.0]);
        assert_eq!(attrs[0].size, Some([2.0, 0.6]));
        assert_eq!(attrs[1].position, [0.3, 0.0]);
        assert_eq!(attrs[1].size, Some([0.4, 3.0]));
        assert_eq!(attrs[2].size, None);
        assert_eq!(attrs[3].position, [0.0, 0.0]);
        assert_eq!(attrs[3].name, None);
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let err = LayoutModel::from_value(&json!({ "holes": "none" }));
        assert!(err.is_err());
    }
}
