//! Ray picking against scene nodes
//!
//! Stale handles and hidden nodes are never hit.

use crate::draw::geometry::Ray;

use super::graph::{NodeId, Scene};

/// Nearest pad instance under a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadHit {
    pub group: NodeId,
    pub instance: usize,
    pub distance: f32,
}

/// Nearest ordinary mesh under a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHit {
    pub node: NodeId,
    pub distance: f32,
}

/// Cast against every instance of every listed pad group
pub fn pick_pads(scene: &Scene, groups: &[NodeId], ray: &Ray) -> Option<PadHit> {
    let mut best: Option<PadHit> = None;
    for &group in groups {
        if !scene.is_visible(group) {
            continue;
        }
        let (Some(node), Some(world)) = (scene.instanced(group), scene.world_matrix(group)) else {
            continue;
        };
        if let Some((instance, distance)) = node.raycast(ray, &world) {
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(PadHit { group, instance, distance });
            }
        }
    }
    best
}

/// Cast against the listed mesh nodes
pub fn pick_meshes(scene: &Scene, nodes: &[NodeId], ray: &Ray) -> Option<MeshHit> {
    let mut best: Option<MeshHit> = None;
    for &id in nodes {
        if !scene.is_visible(id) {
            continue;
        }
        let (Some(node), Some(world)) = (scene.mesh(id), scene.world_matrix(id)) else {
            continue;
        };
        let Some(inverse) = world.try_inverse() else {
            continue;
        };
        if let Some(distance) = node.mesh.raycast(&ray.transformed(&inverse)) {
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(MeshHit { node: id, distance });
            }
        }
    }
    best
}
