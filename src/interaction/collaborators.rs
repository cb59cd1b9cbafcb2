//! Host-side collaborators consumed by the selection controller
//!
//! The gizmo, the selection display and the camera are owned by the host
//! UI. The controller only talks to them through these traits.

use nalgebra::{Matrix4, Perspective3, Point2, Point3, Vector3};

use crate::draw::geometry::Ray;
use crate::scene::NodeId;

use super::controller::Target;

/// Translate gizmo that edits the proxy node in the scene
pub trait Gizmo {
    /// Start editing `proxy`; its height must stay at `locked_y`
    fn attach(&mut self, proxy: NodeId, locked_y: f32);
    fn detach(&mut self);
    /// A handle drag is in progress
    fn is_dragging(&self) -> bool;
    /// The pointer is over a handle
    fn is_hot(&self) -> bool;
}

/// What the selection display shows for the selected pad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionSummary {
    pub target: Target,
    pub world_position: Point3<f32>,
    /// scale.x * scale.z of the instance
    pub area: f32,
}

/// Push-only receiver for selection changes
pub trait SelectionSink {
    fn publish(&mut self, summary: &SelectionSummary);
    fn clear(&mut self);
}

/// Anything that can turn a normalized device coordinate into a world ray
pub trait PickCamera {
    fn ray_from_ndc(&self, ndc: Point2<f32>) -> Ray;
}

/// Right-handed perspective camera looking at `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(position: Point3<f32>, target: Point3<f32>, fov_y: f32, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: Vector3::y(),
            fov_y,
            aspect,
            near: 0.01,
            far: 1000.0,
        }
    }

    /// `None` while the frustum is degenerate, e.g. a zero-width viewport
    /// mid-resize
    pub fn view_projection(&self) -> Option<Matrix4<f32>> {
        let usable = [self.aspect, self.fov_y, self.near, self.far].iter().all(|v| v.is_finite())
            && self.aspect.abs() > f32::EPSILON
            && self.fov_y > 0.0
            && (self.far - self.near).abs() > f32::EPSILON;
        if !usable {
            return None;
        }
        let view = Matrix4::look_at_rh(&self.position, &self.target, &self.up);
        let projection = Perspective3::new(self.aspect, self.fov_y, self.near, self.far);
        Some(projection.as_matrix() * view)
    }
}

impl PickCamera for PerspectiveCamera {
    fn ray_from_ndc(&self, ndc: Point2<f32>) -> Ray {
        let fallback = Ray::new(self.position, self.target - self.position);
        let Some(inverse) = self.view_projection().and_then(|m| m.try_inverse()) else {
            return fallback;
        };
        let through = inverse.transform_point(&Point3::new(ndc.x, ndc.y, 0.5));
        let direction = through - self.position;
        if direction.norm_squared() < 1e-12 {
            return fallback;
        }
        Ray::new(self.position, direction)
    }
}

/// Drawing surface rectangle in client pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { left: 0.0, top: 0.0, width, height }
    }

    /// Client pixels to NDC: x right, y up, both in [-1, 1] inside the
    /// viewport
    pub fn to_ndc(&self, client_x: f32, client_y: f32) -> Point2<f32> {
        let w = if self.width != 0.0 { self.width } else { 1.0 };
        let h = if self.height != 0.0 { self.height } else { 1.0 };
        Point2::new(
            (client_x - self.left) / w * 2.0 - 1.0,
            -((client_y - self.top) / h * 2.0 - 1.0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(u16),
}

impl From<u16> for PointerButton {
    fn from(index: u16) -> Self {
        match index {
            0 => PointerButton::Primary,
            1 => PointerButton::Middle,
            2 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub ndc: Point2<f32>,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn new(ndc: Point2<f32>, button: PointerButton) -> Self {
        Self { ndc, button }
    }

    pub fn primary(ndc: Point2<f32>) -> Self {
        Self::new(ndc, PointerButton::Primary)
    }
}
