//! Drawing module for the board editor
//!
//! Pure geometry: nothing in here knows about layouts, layers or the scene.
//!
//! # Submodules
//! - `geometry` - Plane points, rays, meshes, transforms and mesh buffers
//! - `tessellation` - Outlines, extrusion, trace ribbons and primitive solids

pub mod geometry;
pub mod tessellation;
