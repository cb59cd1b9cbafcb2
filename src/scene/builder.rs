//! Primitive builder
//!
//! Turns a [`LayoutModel`] into live scene objects and back. A rebuild is
//! split in two stages: `plan` computes every mesh and instance matrix
//! without touching the scene, then `instantiate` tears the previous build
//! down and inserts the new objects. A model that fails planning leaves
//! the previous scene untouched.
//!
//! After a build the instance matrices are the authoritative pad state.
//! The loaded model is only consulted again for board, holes and traces
//! on export.

use nalgebra::{Matrix4, Vector3};
use serde_json::Value;

use crate::config::BuildConfig;
use crate::draw::geometry::{Mesh, PlanePoint, Transform};
use crate::draw::tessellation::{
    box_mesh, build_planar_outline, build_ribbon, cylinder_mesh, extrude, flat_shape, open_tube,
    place_holes,
};
use crate::error::BuildError;
use crate::layout::{LayoutModel, PadAttribute, PadGroup, PadShape};

use super::graph::{InstancedNode, MeshNode, NodeId, NodeKind, Scene};
use super::layers::{LayerId, LayerRegistry};
use super::materials::{lighting_rig, Material, OutlineOverlay};

/// Counts reported by a successful build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildSummary {
    pub holes_cut: usize,
    pub holes_skipped: usize,
    pub pad_groups: usize,
    pub pads_placed: usize,
    pub pads_skipped: usize,
    pub traces: usize,
    pub lights: usize,
}

/// Pickable objects of the current build
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildTargets {
    pub pads: Vec<NodeId>,
    pub traces: Vec<NodeId>,
}

/// A live pad group and the attributes it was built from
#[derive(Debug, Clone)]
struct PadGroupState {
    node: NodeId,
    group: PadGroup,
    placed: Vec<bool>,
}

struct PadPlan {
    group: PadGroup,
    layer: LayerId,
    base: Mesh,
    matrices: Vec<Option<Matrix4<f32>>>,
}

struct HoleWallPlan {
    index: usize,
    center: PlanePoint,
    mesh: Mesh,
}

struct TracePlan {
    layer: LayerId,
    mesh: Mesh,
}

struct BuildPlan {
    layers: LayerRegistry,
    board: Mesh,
    copper: Mesh,
    pads: Vec<PadPlan>,
    hole_walls: Vec<HoleWallPlan>,
    traces: Vec<TracePlan>,
    summary: BuildSummary,
}

/// Owns every object it inserts into the scene and is the only one that
/// removes them.
#[derive(Debug, Default)]
pub struct PrimitiveBuilder {
    config: BuildConfig,
    model: LayoutModel,
    layers: LayerRegistry,
    lights: Vec<NodeId>,
    board: Option<NodeId>,
    copper: Vec<(LayerId, NodeId)>,
    pad_groups: Vec<PadGroupState>,
    hole_walls: Option<NodeId>,
    traces: Vec<NodeId>,
}

fn pad_base_mesh(group: &PadGroup, segments: u32) -> Mesh {
    let thickness = group.default_thickness as f32;
    match group.shape {
        PadShape::Circle => cylinder_mesh(group.default_radius as f32 * 0.5, thickness, segments),
        PadShape::Rectangle => box_mesh(
            group.default_pad_size[0] as f32 * 0.5,
            thickness,
            group.default_pad_size[1] as f32 * 0.5,
        ),
    }
}

fn pad_scale(group: &PadGroup, attr: &PadAttribute) -> Vector3<f32> {
    match group.shape {
        PadShape::Circle => {
            let r = attr.radius.unwrap_or(group.default_radius) as f32;
            Vector3::new(r, 1.0, r)
        }
        PadShape::Rectangle => {
            let [sx, sz] = attr.size.unwrap_or(group.default_pad_size);
            Vector3::new(sx as f32, 1.0, sz as f32)
        }
    }
}

impl PrimitiveBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config: config.sanitized(),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Last successfully built model, as loaded
    pub fn model(&self) -> &LayoutModel {
        &self.model
    }

    pub fn layers(&self) -> &LayerRegistry {
        &self.layers
    }

    pub fn board_node(&self) -> Option<NodeId> {
        self.board
    }

    pub fn copper_node(&self, layer: LayerId) -> Option<NodeId> {
        self.copper.iter().find(|(l, _)| *l == layer).map(|(_, id)| *id)
    }

    pub fn hole_wall_group(&self) -> Option<NodeId> {
        self.hole_walls
    }

    pub fn is_built(&self) -> bool {
        self.board.is_some()
    }

    pub fn targets(&self) -> BuildTargets {
        BuildTargets {
            pads: self.pad_groups.iter().map(|g| g.node).collect(),
            traces: self.traces.clone(),
        }
    }

    /// Decode layout JSON text and rebuild from it
    pub fn load_from_json(
        &mut self,
        scene: &mut Scene,
        json: &str,
    ) -> Result<BuildSummary, BuildError> {
        let model = LayoutModel::from_json_str(json)?;
        self.build(scene, &model)
    }

    /// Decode a layout JSON value and rebuild from it. The value is not
    /// modified.
    pub fn load_from_value(
        &mut self,
        scene: &mut Scene,
        value: &Value,
    ) -> Result<BuildSummary, BuildError> {
        let model = LayoutModel::from_value(value)?;
        self.build(scene, &model)
    }

    /// Full rebuild. Everything from the previous build is removed first;
    /// if the model is rejected the previous build is left as it was.
    pub fn build(
        &mut self,
        scene: &mut Scene,
        model: &LayoutModel,
    ) -> Result<BuildSummary, BuildError> {
        let plan = match self.plan(model) {
            Ok(plan) => plan,
            Err(e) => {
                log::warn!("layout rejected, keeping previous scene: {}", e);
                return Err(e);
            }
        };

        self.teardown(scene);
        let summary = self.instantiate(scene, plan);
        self.model = model.clone();

        log::info!(
            "built board: {} holes ({} skipped), {} pad groups / {} pads ({} skipped), {} traces",
            summary.holes_cut,
            summary.holes_skipped,
            summary.pad_groups,
            summary.pads_placed,
            summary.pads_skipped,
            summary.traces
        );
        Ok(summary)
    }

    fn plan(&self, model: &LayoutModel) -> Result<BuildPlan, BuildError> {
        let board = model.board;
        if !board.is_valid() {
            return Err(BuildError::InvalidBoard {
                width: board.width,
                height: board.height,
                depth: board.depth,
            });
        }

        let cfg = &self.config;
        let width = board.width as f32;
        let depth = board.depth as f32;
        let thickness = board.height as f32;
        let half_width = board.half_width();
        let half_depth = board.half_depth();
        let mut summary = BuildSummary::default();

        let board_outline = build_planar_outline(
            width,
            depth,
            &model.holes,
            cfg.hole_margin,
            cfg.board_curve_segments,
        );
        summary.holes_cut = board_outline.hole_count();
        summary.holes_skipped = model.holes.len() - summary.holes_cut;
        let board_mesh = extrude(&board_outline, thickness)?;

        let copper_outline = build_planar_outline(
            width,
            depth,
            &model.holes,
            cfg.hole_margin,
            cfg.copper_curve_segments,
        );
        let copper = flat_shape(&copper_outline)?;

        let mut layers = LayerRegistry::new();
        let copper_y = thickness * 0.5 + cfg.copper_epsilon;
        layers.set_layer_offset(LayerId::TopCopper, copper_y);
        layers.set_layer_offset(LayerId::BottomCopper, -copper_y);

        let mut pads = Vec::with_capacity(model.pads.len());
        for group in &model.pads {
            let layer = LayerId::from(group.layer);
            let y = layers.layer_offset(layer).unwrap_or_default();
            let matrices: Vec<Option<Matrix4<f32>>> = group
                .pad_attributes
                .iter()
                .map(|attr| {
                    if !attr.has_valid_position() {
                        log::debug!(
                            "pad {:?} in {} outside board bounds, left hidden",
                            attr.name,
                            group.name
                        );
                        return None;
                    }
                    let [nx, nz] = attr.position;
                    let position = Vector3::new(
                        nx as f32 * half_width * cfg.pad_margin,
                        y,
                        nz as f32 * half_depth * cfg.pad_margin,
                    );
                    let scale = pad_scale(group, attr);
                    Some(Transform::from_position_scale(position, scale).to_matrix())
                })
                .collect();

            let placed = matrices.iter().filter(|m| m.is_some()).count();
            summary.pads_placed += placed;
            summary.pads_skipped += matrices.len() - placed;
            pads.push(PadPlan {
                group: group.clone(),
                layer,
                base: pad_base_mesh(group, cfg.pad_segments),
                matrices,
            });
        }
        summary.pad_groups = pads.len();

        let hole_walls = place_holes(width, depth, &model.holes, cfg.hole_margin)
            .into_iter()
            .map(|h| HoleWallPlan {
                index: h.index,
                center: h.center,
                mesh: open_tube(h.radius, thickness, cfg.hole_wall_segments),
            })
            .collect();

        let mut traces = Vec::with_capacity(model.traces.len());
        for (index, trace) in model.traces.iter().enumerate() {
            let layer = LayerId::from(trace.layer);
            let y = layers.layer_offset(layer).unwrap_or_default();
            let points: Vec<PlanePoint> = trace.points.iter().map(|p| p.to_plane()).collect();
            let width = trace.width_or(cfg.default_trace_width) as f32;
            let mesh = build_ribbon(&points, width, y, cfg.miter_limit)
                .map_err(|source| BuildError::Trace { index, source })?;
            traces.push(TracePlan { layer, mesh });
        }
        summary.traces = traces.len();

        Ok(BuildPlan {
            layers,
            board: board_mesh,
            copper,
            pads,
            hole_walls,
            traces,
            summary,
        })
    }

    fn instantiate(&mut self, scene: &mut Scene, plan: BuildPlan) -> BuildSummary {
        let colors = self.config.colors.clone();
        let BuildPlan { mut layers, board, copper, pads, hole_walls, traces, mut summary } = plan;

        let board_layer = layers.ensure(scene, LayerId::Board);
        self.board = scene.add_to(
            board_layer,
            "PCB_FR4_BOARD",
            NodeKind::Mesh(MeshNode::new(board, Material::standard(colors.board))),
        );

        for layer in [LayerId::TopCopper, LayerId::BottomCopper] {
            let container = layers.ensure(scene, layer);
            let y = layers.layer_offset(layer).unwrap_or_default();
            let name = format!("COPPER_{}", layer.as_str());
            let material = Material::copper(colors.copper);
            let kind = NodeKind::Mesh(MeshNode::new(copper.clone(), material));
            if let Some(id) = scene.add_to(container, name, kind) {
                if let Some(node) = scene.get_mut(id) {
                    node.transform = Transform::from_position(Vector3::new(0.0, y, 0.0));
                }
                self.copper.push((layer, id));
            }
        }

        for pad in pads {
            let container = layers.ensure(scene, pad.layer);
            let mut node = InstancedNode::new(
                pad.base,
                Material::copper(colors.copper),
                colors.pad_edge,
                pad.matrices.len(),
            );
            let mut placed = Vec::with_capacity(pad.matrices.len());
            for (i, m) in pad.matrices.iter().enumerate() {
                if let Some(m) = m {
                    node.set_matrix(i, *m);
                }
                placed.push(m.is_some());
            }
            let name = pad.group.name.clone();
            if let Some(id) = scene.add_to(container, name, NodeKind::Instanced(node)) {
                self.pad_groups.push(PadGroupState { node: id, group: pad.group, placed });
            }
        }

        self.hole_walls = scene.add_to(board_layer, "THROUGH_HOLES", NodeKind::Container);
        if let Some(group) = self.hole_walls {
            for wall in hole_walls {
                let material = Material::double_sided(colors.hole_wall);
                let kind = NodeKind::Mesh(MeshNode::new(wall.mesh, material));
                if let Some(id) = scene.add_to(group, format!("HOLE_WALL_{}", wall.index), kind) {
                    if let Some(node) = scene.get_mut(id) {
                        node.transform = Transform::from_position(wall.center.lift(0.0).coords);
                    }
                }
            }
        }

        for (i, trace) in traces.into_iter().enumerate() {
            let container = layers.ensure(scene, trace.layer);
            let outline = OutlineOverlay::new(
                trace.mesh.boundary_edges(),
                colors.trace_outline,
                colors.trace_hover,
            );
            let material = Material::standard(colors.trace_fill);
            let kind = NodeKind::Mesh(MeshNode::new(trace.mesh, material).with_outline(outline));
            if let Some(id) = scene.add_to(container, format!("TRACE_{}", i), kind) {
                self.traces.push(id);
            }
        }

        for (name, light) in lighting_rig() {
            self.lights.push(scene.add(name, NodeKind::Light(light)));
        }
        summary.lights = self.lights.len();

        self.layers = layers;
        summary
    }

    /// Remove everything this builder inserted. Safe to call repeatedly.
    pub fn teardown(&mut self, scene: &mut Scene) {
        let mut removed = self.layers.clear(scene);
        for id in self.lights.drain(..) {
            removed += scene.remove(id);
        }
        self.board = None;
        self.copper.clear();
        self.pad_groups.clear();
        self.hole_walls = None;
        self.traces.clear();
        if removed > 0 {
            log::debug!("teardown removed {} scene nodes", removed);
        }
    }

    pub fn set_layer_visible(&self, scene: &mut Scene, layer: LayerId, visible: bool) -> bool {
        self.layers.set_visible(scene, layer, visible)
    }

    /// Feed elapsed seconds to every pad group's shader state
    pub fn update_time(&self, scene: &mut Scene, seconds: f32) {
        for g in &self.pad_groups {
            if let Some(node) = scene.instanced_mut(g.node) {
                node.shader.update_time(seconds);
            }
        }
    }

    /// Layout snapshot: board, holes and traces as loaded, pads read back
    /// from the live instance matrices
    pub fn export_snapshot(&self, scene: &Scene) -> LayoutModel {
        let board = self.model.board;
        let denom_x = match board.half_width() * self.config.pad_margin {
            d if d != 0.0 => d,
            _ => 1.0,
        };
        let denom_z = match board.half_depth() * self.config.pad_margin {
            d if d != 0.0 => d,
            _ => 1.0,
        };

        let pads = self
            .pad_groups
            .iter()
            .map(|state| {
                let Some(node) = scene.instanced(state.node) else {
                    return state.group.clone();
                };
                let pad_attributes = state
                    .group
                    .pad_attributes
                    .iter()
                    .enumerate()
                    .map(|(i, attr)| {
                        let name =
                            attr.name.clone().unwrap_or_else(|| format!("SMD_PAD_{}", i + 1));
                        let transform = match (state.placed.get(i), node.transform(i)) {
                            (Some(&true), Some(t)) => t,
                            _ => return PadAttribute { name: Some(name), ..attr.clone() },
                        };
                        let position = [
                            (transform.position.x / denom_x) as f64,
                            (transform.position.z / denom_z) as f64,
                        ];
                        let (sx, sz) = (transform.scale.x, transform.scale.z);
                        match state.group.shape {
                            PadShape::Circle => PadAttribute {
                                name: Some(name),
                                position,
                                size: None,
                                radius: Some(((sx.abs() + sz.abs()) * 0.5) as f64),
                            },
                            PadShape::Rectangle => PadAttribute {
                                name: Some(name),
                                position,
                                size: Some([sx as f64, sz as f64]),
                                radius: None,
                            },
                        }
                    })
                    .collect();
                PadGroup { pad_attributes, ..state.group.clone() }
            })
            .collect();

        LayoutModel {
            version: self.model.version,
            board,
            holes: self.model.holes.clone(),
            pads,
            traces: self.model.traces.clone(),
        }
    }
}
