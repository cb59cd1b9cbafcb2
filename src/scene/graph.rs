//! Retained scene graph
//!
//! Nodes live in a slot arena addressed by generational [`NodeId`]s.
//! Removing a node bumps its slot's generation, so a handle kept across a
//! rebuild simply stops resolving instead of aliasing a new object.

use nalgebra::Matrix4;
use serde::Serialize;

use crate::draw::geometry::{
    serialize_f32_vec_as_base64, serialize_f32_vec_base64, serialize_u32_vec_base64, Mesh,
    MeshBuffers, Ray, Transform,
};

use super::materials::{Light, Material, OutlineOverlay, PadShaderState};

/// Generational handle to a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// Ordinary mesh, optionally with an edge overlay
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub mesh: Mesh,
    pub material: Material,
    pub outline: Option<OutlineOverlay>,
}

impl MeshNode {
    pub fn new(mesh: Mesh, material: Material) -> Self {
        Self { mesh, material, outline: None }
    }

    pub fn with_outline(mut self, outline: OutlineOverlay) -> Self {
        self.outline = Some(outline);
        self
    }
}

/// One base mesh drawn once per instance matrix. The instance count is
/// fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct InstancedNode {
    pub base: Mesh,
    pub material: Material,
    pub edge_color: u32,
    pub shader: PadShaderState,
    matrices: Vec<Matrix4<f32>>,
}

impl InstancedNode {
    /// Every slot starts collapsed to zero scale
    pub fn new(base: Mesh, material: Material, edge_color: u32, count: usize) -> Self {
        Self {
            base,
            material,
            edge_color,
            shader: PadShaderState::default(),
            matrices: vec![Transform::hidden().to_matrix(); count],
        }
    }

    pub fn count(&self) -> usize {
        self.matrices.len()
    }

    pub fn matrix(&self, index: usize) -> Option<&Matrix4<f32>> {
        self.matrices.get(index)
    }

    /// Overwrite one slot; out-of-range indices are refused
    pub fn set_matrix(&mut self, index: usize, matrix: Matrix4<f32>) -> bool {
        match self.matrices.get_mut(index) {
            Some(slot) => {
                *slot = matrix;
                true
            }
            None => false,
        }
    }

    pub fn transform(&self, index: usize) -> Option<Transform> {
        self.matrix(index).map(Transform::decompose)
    }

    pub fn matrices(&self) -> &[Matrix4<f32>] {
        &self.matrices
    }

    /// Nearest instance hit by a world-space ray, given the node's world
    /// matrix. Collapsed instances cannot be hit.
    pub fn raycast(&self, ray: &Ray, world: &Matrix4<f32>) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (i, m) in self.matrices.iter().enumerate() {
            let Some(inverse) = (world * m).try_inverse() else {
                continue;
            };
            if let Some(t) = self.base.raycast(&ray.transformed(&inverse)) {
                if best.map_or(true, |(_, b)| t < b) {
                    best = Some((i, t));
                }
            }
        }
        best
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Container,
    Mesh(MeshNode),
    Instanced(InstancedNode),
    Light(Light),
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Container => "container",
            NodeKind::Mesh(_) => "mesh",
            NodeKind::Instanced(_) => "instanced",
            NodeKind::Light(_) => "light",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Node arena with an ordered list of root nodes
#[derive(Debug, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
    live: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Create a node at the root of the scene
    pub fn add(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let node = Node {
            name: name.into(),
            kind,
            transform: Transform::identity(),
            visible: true,
            parent: None,
            children: Vec::new(),
        };

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, node: Some(node) });
                NodeId { index, generation: 0 }
            }
        };

        self.roots.push(id);
        self.live += 1;
        id
    }

    /// Create a node directly under `parent`
    pub fn add_to(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.add(name, kind);
        self.add_child(parent, id);
        Some(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn unlink(&mut self, child: NodeId) {
        let parent = self.get(child).and_then(|n| n.parent);
        match parent {
            Some(p) => {
                if let Some(pnode) = self.get_mut(p) {
                    pnode.children.retain(|c| *c != child);
                }
            }
            None => self.roots.retain(|r| *r != child),
        }
    }

    /// Reparent `child` under `parent`. Refuses stale handles and cycles.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }
        let mut cursor = Some(parent);
        while let Some(c) = cursor {
            if c == child {
                return false;
            }
            cursor = self.get(c).and_then(|n| n.parent);
        }

        self.unlink(child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(pnode) = self.get_mut(parent) {
            pnode.children.push(child);
        }
        true
    }

    /// Destroy a node and its whole subtree. Returns how many nodes went.
    pub fn remove(&mut self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        self.unlink(id);

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if slot.generation != current.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                removed += 1;
            }
        }
        self.live -= removed;
        removed
    }

    /// Live nodes in depth-first order from the roots
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        let mut order = Vec::with_capacity(self.live);
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                order.push((id, node));
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order.into_iter()
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.name == name).map(|(id, _)| id)
    }

    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        let mut node = self.get(id)?;
        let mut matrix = node.transform.to_matrix();
        while let Some(parent) = node.parent {
            node = self.get(parent)?;
            matrix = node.transform.to_matrix() * matrix;
        }
        Some(matrix)
    }

    /// Visible only if the node and every ancestor are
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(c) = cursor {
            match self.get(c) {
                Some(node) if node.visible => cursor = node.parent,
                _ => return false,
            }
        }
        true
    }

    pub fn mesh(&self, id: NodeId) -> Option<&MeshNode> {
        match &self.get(id)?.kind {
            NodeKind::Mesh(m) => Some(m),
            _ => None,
        }
    }

    pub fn mesh_mut(&mut self, id: NodeId) -> Option<&mut MeshNode> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Mesh(m) => Some(m),
            _ => None,
        }
    }

    pub fn instanced(&self, id: NodeId) -> Option<&InstancedNode> {
        match &self.get(id)?.kind {
            NodeKind::Instanced(i) => Some(i),
            _ => None,
        }
    }

    pub fn instanced_mut(&mut self, id: NodeId) -> Option<&mut InstancedNode> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Instanced(i) => Some(i),
            _ => None,
        }
    }

    /// Snapshot of everything visible, in draw order, for the rendering
    /// backend
    pub fn draw_list(&self) -> DrawList {
        let mut list = DrawList::default();
        for (id, node) in self.iter() {
            if !self.is_visible(id) {
                continue;
            }
            let Some(world) = self.world_matrix(id) else {
                continue;
            };
            match &node.kind {
                NodeKind::Container => {}
                NodeKind::Light(light) => list.lights.push(LightItem {
                    name: node.name.clone(),
                    light: light.clone(),
                }),
                NodeKind::Mesh(m) => list.items.push(DrawItem {
                    name: node.name.clone(),
                    kind: node.kind.label(),
                    world_matrix: world.as_slice().to_vec(),
                    material: m.material.clone(),
                    buffers: MeshBuffers::from(&m.mesh),
                    instance_matrices: None,
                    instance_count: 1,
                    pad_shader: None,
                    outline: m.outline.as_ref().map(|o| OutlineItem {
                        indices: o.edges.iter().flat_map(|&(a, b)| [a, b]).collect(),
                        color: o.color(),
                    }),
                }),
                NodeKind::Instanced(inst) => list.items.push(DrawItem {
                    name: node.name.clone(),
                    kind: node.kind.label(),
                    world_matrix: world.as_slice().to_vec(),
                    material: inst.material.clone(),
                    buffers: MeshBuffers::from(&inst.base),
                    instance_matrices: Some(
                        inst.matrices.iter().flat_map(|m| m.as_slice().to_vec()).collect(),
                    ),
                    instance_count: inst.count(),
                    pad_shader: Some(inst.shader),
                    outline: None,
                }),
            }
        }
        list
    }
}

/// Edge overlay in a draw item
#[derive(Debug, Clone, Serialize)]
pub struct OutlineItem {
    #[serde(rename = "indexData", serialize_with = "serialize_u32_vec_base64")]
    pub indices: Vec<u32>,
    pub color: u32,
}

/// One drawable. Matrices are column-major, 16 floats each.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawItem {
    pub name: String,
    pub kind: &'static str,
    #[serde(serialize_with = "serialize_f32_vec_base64")]
    pub world_matrix: Vec<f32>,
    pub material: Material,
    pub buffers: MeshBuffers,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_f32_vec_as_base64"
    )]
    pub instance_matrices: Option<Vec<f32>>,
    pub instance_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad_shader: Option<PadShaderState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<OutlineItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LightItem {
    pub name: String,
    #[serde(flatten)]
    pub light: Light,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DrawList {
    pub items: Vec<DrawItem>,
    pub lights: Vec<LightItem>,
}
