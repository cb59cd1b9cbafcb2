//! Geometry module for the board editor
//!
//! This module provides the geometric types shared by the tessellation
//! kernel, the scene graph and picking.
//!
//! # Submodules
//! - `types` - Plane points, rays and bounding volumes
//! - `mesh` - Indexed triangle mesh with normals, bounds and ray casting
//! - `transform` - TRS transforms with matrix decomposition
//! - `buffers` - Base64 mesh buffers for the rendering backend

mod types;
mod mesh;
mod transform;
mod buffers;

pub use types::{
    PlanePoint,
    Ray,
    Aabb,
    BoundingSphere,
};

pub use mesh::{
    Mesh,
    ray_triangle_intersect,
};

pub use transform::Transform;

pub use buffers::{
    serialize_f32_vec_base64,
    serialize_f32_vec_as_base64,
    serialize_u32_vec_base64,
    decode_f32_base64,
    MeshBuffers,
};
