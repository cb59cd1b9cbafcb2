//! Hover, selection and gizmo drag over pads and traces
//!
//! The controller owns a proxy node at the scene root. Selecting a pad copies
//! the instance transform onto the proxy and hands the proxy to the gizmo;
//! every [`SelectionController::update`] writes the proxy back into the
//! instance matrix with its height pinned to the value captured on select.

use nalgebra::Point3;

use crate::draw::geometry::{Ray, Transform};
use crate::scene::{pick_meshes, pick_pads, BuildTargets, NodeId, NodeKind, Scene};

use super::collaborators::{
    Gizmo, PickCamera, PointerButton, PointerEvent, SelectionSink, SelectionSummary,
};

pub const PROXY_NODE_NAME: &str = "PAD_PROXY";

/// Something the pointer can hover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Pad { group: NodeId, instance: usize },
    Trace(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Hovering(Target),
    Selected(Target),
    /// The gizmo is moving the selection
    Dragging(Target),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PadSelection {
    group: NodeId,
    instance: usize,
    locked_y: f32,
}

impl PadSelection {
    fn target(&self) -> Target {
        Target::Pad { group: self.group, instance: self.instance }
    }
}

#[derive(Debug)]
pub struct SelectionController<G: Gizmo, S: SelectionSink> {
    gizmo: G,
    sink: S,
    proxy: Option<NodeId>,
    pads: Vec<NodeId>,
    traces: Vec<NodeId>,
    hover: Option<Target>,
    selection: Option<PadSelection>,
}

impl<G: Gizmo, S: SelectionSink> SelectionController<G, S> {
    pub fn new(scene: &mut Scene, gizmo: G, sink: S) -> Self {
        let proxy = scene.add(PROXY_NODE_NAME, NodeKind::Container);
        Self {
            gizmo,
            sink,
            proxy: Some(proxy),
            pads: Vec::new(),
            traces: Vec::new(),
            hover: None,
            selection: None,
        }
    }

    pub fn gizmo(&self) -> &G {
        &self.gizmo
    }

    pub fn gizmo_mut(&mut self) -> &mut G {
        &mut self.gizmo
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// `None` once disposed
    pub fn proxy(&self) -> Option<NodeId> {
        self.proxy
    }

    pub fn is_disposed(&self) -> bool {
        self.proxy.is_none()
    }

    pub fn hovered(&self) -> Option<Target> {
        self.hover
    }

    pub fn selected(&self) -> Option<Target> {
        self.selection.map(|s| s.target())
    }

    pub fn state(&self) -> InteractionState {
        match (self.selection, self.hover) {
            (Some(sel), _) if self.gizmo.is_dragging() => InteractionState::Dragging(sel.target()),
            (Some(sel), _) => InteractionState::Selected(sel.target()),
            (None, Some(hover)) => InteractionState::Hovering(hover),
            (None, None) => InteractionState::Idle,
        }
    }

    /// Replace the pickable objects. Drops hover and selection, which may
    /// refer to nodes of a previous build.
    pub fn set_targets(&mut self, scene: &mut Scene, targets: BuildTargets) {
        self.clear_hover(scene);
        self.clear_selection(scene);
        self.sink.clear();
        self.pads = targets.pads;
        self.traces = targets.traces;
    }

    /// Nearest pad or trace under the ray; pads win ties
    pub fn pick(&self, scene: &Scene, ray: &Ray) -> Option<Target> {
        let pad = pick_pads(scene, &self.pads, ray);
        let trace = pick_meshes(scene, &self.traces, ray);
        match (pad, trace) {
            (Some(p), Some(t)) if t.distance < p.distance => Some(Target::Trace(t.node)),
            (Some(p), _) => Some(Target::Pad { group: p.group, instance: p.instance }),
            (None, Some(t)) => Some(Target::Trace(t.node)),
            (None, None) => None,
        }
    }

    /// Update hover from a pointer move. Ignored while the gizmo drags.
    pub fn pointer_move(
        &mut self,
        scene: &mut Scene,
        camera: &impl PickCamera,
        event: PointerEvent,
    ) -> Option<Target> {
        if self.is_disposed() || self.gizmo.is_dragging() {
            return self.hover;
        }
        let ray = camera.ray_from_ndc(event.ndc);
        match self.pick(scene, &ray) {
            Some(target) if self.hover != Some(target) => {
                self.clear_hover(scene);
                self.mark_hover(scene, target, true);
                self.hover = Some(target);
            }
            Some(_) => {}
            None => self.clear_hover(scene),
        }
        self.hover
    }

    /// Primary press selects the pad under the pointer or clears the
    /// selection. Presses on a gizmo handle belong to the gizmo.
    pub fn pointer_down(
        &mut self,
        scene: &mut Scene,
        camera: &impl PickCamera,
        event: PointerEvent,
    ) {
        if self.is_disposed() || event.button != PointerButton::Primary || self.gizmo.is_hot() {
            return;
        }
        let ray = camera.ray_from_ndc(event.ndc);
        match self.pick(scene, &ray) {
            Some(Target::Pad { group, instance }) => {
                self.select_pad(scene, group, instance);
            }
            _ => {
                self.clear_selection(scene);
                self.sink.clear();
            }
        }
    }

    /// Select one pad instance programmatically. Returns false when the
    /// instance does not exist.
    pub fn select_pad(&mut self, scene: &mut Scene, group: NodeId, instance: usize) -> bool {
        let Some(proxy) = self.proxy else {
            return false;
        };
        let Some(transform) = scene.instanced(group).and_then(|node| node.transform(instance))
        else {
            return false;
        };

        self.clear_selection(scene);

        if let Some(node) = scene.instanced_mut(group) {
            node.shader.set_selected_id(Some(instance));
        }
        if let Some(proxy_node) = scene.get_mut(proxy) {
            proxy_node.transform = transform;
        }

        let locked_y = transform.position.y;
        self.gizmo.attach(proxy, locked_y);
        self.selection = Some(PadSelection { group, instance, locked_y });
        log::debug!("selected pad {} at {:?}", instance, transform.position);
        self.publish(scene);
        true
    }

    /// Push the proxy transform back into the selected instance
    pub fn update(&mut self, scene: &mut Scene) {
        let (Some(sel), Some(proxy)) = (self.selection, self.proxy) else {
            return;
        };
        let Some(mut transform) = scene.get(proxy).map(|n| n.transform) else {
            return;
        };
        transform.position.y = sel.locked_y;
        if let Some(proxy_node) = scene.get_mut(proxy) {
            proxy_node.transform = transform;
        }

        let written = scene
            .instanced_mut(sel.group)
            .map_or(false, |node| node.set_matrix(sel.instance, transform.to_matrix()));
        if !written {
            log::warn!("selected pad {} no longer exists, dropping selection", sel.instance);
            self.clear_selection(scene);
            self.sink.clear();
            return;
        }
        self.publish(scene);
    }

    /// Drop hover and selection and remove the proxy. Idempotent.
    pub fn dispose(&mut self, scene: &mut Scene) {
        let Some(proxy) = self.proxy else {
            return;
        };
        self.clear_hover(scene);
        self.clear_selection(scene);
        scene.remove(proxy);
        self.proxy = None;
        self.pads.clear();
        self.traces.clear();
    }

    fn publish(&mut self, scene: &Scene) {
        let (Some(sel), Some(proxy)) = (self.selection, self.proxy) else {
            return;
        };
        let Some(node) = scene.get(proxy) else {
            return;
        };
        let world = scene.world_matrix(proxy).unwrap_or_else(|| node.transform.to_matrix());
        let world_position = world.transform_point(&Point3::origin());
        let scale = node.transform.scale;
        self.sink.publish(&SelectionSummary {
            target: sel.target(),
            world_position,
            area: scale.x * scale.z,
        });
    }

    fn clear_hover(&mut self, scene: &mut Scene) {
        if let Some(target) = self.hover.take() {
            self.mark_hover(scene, target, false);
        }
    }

    fn mark_hover(&self, scene: &mut Scene, target: Target, on: bool) {
        match target {
            Target::Pad { group, instance } => {
                if let Some(node) = scene.instanced_mut(group) {
                    node.shader.set_hovered_id(on.then_some(instance));
                }
            }
            Target::Trace(id) => {
                if let Some(outline) = scene.mesh_mut(id).and_then(|m| m.outline.as_mut()) {
                    outline.set_hovered(on);
                }
            }
        }
    }

    fn clear_selection(&mut self, scene: &mut Scene) {
        let Some(sel) = self.selection.take() else {
            return;
        };
        if let Some(node) = scene.instanced_mut(sel.group) {
            node.shader.set_selected_id(None);
        }
        self.gizmo.detach();
        if let Some(proxy_node) = self.proxy.and_then(|p| scene.get_mut(p)) {
            proxy_node.transform = Transform::identity();
        }
    }
}
