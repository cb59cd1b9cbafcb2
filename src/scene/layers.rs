//! Logical layer registry
//!
//! Maps the three logical layers to scene containers and to the copper
//! plane heights traces are laid on. A registry lives for exactly one build
//! cycle; the builder creates a fresh one every rebuild.

use indexmap::IndexMap;

use crate::layout::CopperSide;

use super::graph::{NodeId, NodeKind, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerId {
    Board,
    TopCopper,
    BottomCopper,
}

impl LayerId {
    /// Container creation order
    pub const ALL: [LayerId; 3] = [LayerId::Board, LayerId::TopCopper, LayerId::BottomCopper];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerId::Board => "board",
            LayerId::TopCopper => "top_copper",
            LayerId::BottomCopper => "bottom_copper",
        }
    }

    pub fn container_name(&self) -> String {
        format!("LAYER_{}", self.as_str())
    }
}

impl From<CopperSide> for LayerId {
    fn from(side: CopperSide) -> Self {
        match side {
            CopperSide::Top => LayerId::TopCopper,
            CopperSide::Bottom => LayerId::BottomCopper,
        }
    }
}

/// Per-build layer containers and copper offsets
#[derive(Debug, Default)]
pub struct LayerRegistry {
    containers: IndexMap<LayerId, NodeId>,
    top_copper_y: Option<f32>,
    bottom_copper_y: Option<f32>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Container for `layer`. The first call creates all three containers
    /// in board, top, bottom order; later calls return the existing one.
    pub fn ensure(&mut self, scene: &mut Scene, layer: LayerId) -> NodeId {
        let stale = self.containers.values().any(|id| !scene.contains(*id));
        if stale {
            self.containers.clear();
        }
        if self.containers.is_empty() {
            for l in LayerId::ALL {
                let id = scene.add(l.container_name(), NodeKind::Container);
                self.containers.insert(l, id);
            }
        }
        match self.containers.get(&layer) {
            Some(id) => *id,
            None => {
                let id = scene.add(layer.container_name(), NodeKind::Container);
                self.containers.insert(layer, id);
                id
            }
        }
    }

    pub fn container(&self, layer: LayerId) -> Option<NodeId> {
        self.containers.get(&layer).copied()
    }

    /// Containers in creation order
    pub fn containers(&self) -> impl Iterator<Item = (LayerId, NodeId)> + '_ {
        self.containers.iter().map(|(l, id)| (*l, *id))
    }

    /// Board offset is fixed; setting it is ignored
    pub fn set_layer_offset(&mut self, layer: LayerId, y: f32) {
        match layer {
            LayerId::TopCopper => self.top_copper_y = Some(y),
            LayerId::BottomCopper => self.bottom_copper_y = Some(y),
            LayerId::Board => {}
        }
    }

    /// `None` for a copper layer whose offset was never set
    pub fn layer_offset(&self, layer: LayerId) -> Option<f32> {
        match layer {
            LayerId::Board => Some(0.0),
            LayerId::TopCopper => self.top_copper_y,
            LayerId::BottomCopper => self.bottom_copper_y,
        }
    }

    pub fn set_visible(&self, scene: &mut Scene, layer: LayerId, visible: bool) -> bool {
        match self.container(layer).and_then(|id| scene.get_mut(id)) {
            Some(node) => {
                node.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Drop the containers (and everything under them) from the scene
    pub fn clear(&mut self, scene: &mut Scene) -> usize {
        let removed = self.containers.values().map(|id| scene.remove(*id)).sum();
        self.containers.clear();
        self.top_copper_y = None;
        self.bottom_copper_y = None;
        removed
    }
}
