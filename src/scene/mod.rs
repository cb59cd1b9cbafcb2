//! Scene module for the board editor
//!
//! Holds the retained scene graph the rendering backend draws from and the
//! builder that fills it from a layout.
//!
//! # Submodules
//! - `graph` - Generational node arena, mesh/instanced nodes and draw list
//! - `materials` - Materials, pad shader state, trace outlines and lights
//! - `layers` - Logical layer containers and copper plane offsets
//! - `builder` - Layout to scene objects and live state back to layout
//! - `picking` - Ray hit tests against pads and meshes

mod graph;
mod materials;
mod layers;
mod builder;
mod picking;

pub use graph::{
    NodeId,
    Node,
    NodeKind,
    MeshNode,
    InstancedNode,
    Scene,
    DrawList,
    DrawItem,
    LightItem,
    OutlineItem,
};

pub use materials::{
    Material,
    PadShaderState,
    OutlineOverlay,
    Light,
    lighting_rig,
};

pub use layers::{
    LayerId,
    LayerRegistry,
};

pub use builder::{
    BuildSummary,
    BuildTargets,
    PrimitiveBuilder,
};

pub use picking::{
    PadHit,
    MeshHit,
    pick_pads,
    pick_meshes,
};
