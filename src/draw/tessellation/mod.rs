//! Tessellation module for board geometry
//!
//! This module turns board outlines, copper sheets, traces and pad bases
//! into triangle meshes. Everything here is pure: no scene or rendering
//! state is touched.
//!
//! # Submodules
//! - `outline` - Board rectangle with circular hole cutouts
//! - `polygon` - Earcut triangulation, flat sheets and extrusion
//! - `ribbon` - Mitered ribbon stroking for traces
//! - `shapes` - Boxes, cylinders and open tubes

mod outline;
mod polygon;
mod ribbon;
mod shapes;

pub use outline::{
    PlanarOutline,
    signed_area,
    circle_ring,
    build_planar_outline,
    place_holes,
    HolePlacement,
};

pub use polygon::{
    triangulate_outline,
    flat_shape,
    extrude,
};

pub use ribbon::{
    DEDUP_EPSILON_SQ,
    dedup_points,
    build_ribbon,
};

pub use shapes::{
    box_mesh,
    cylinder_mesh,
    open_tube,
};
