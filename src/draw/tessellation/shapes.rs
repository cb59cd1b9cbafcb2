//! Primitive solids
//!
//! Boxes and capped cylinders are the base meshes for instanced pads; the
//! open tube is the drilled-hole wall. All are centered at the origin with
//! their axis along +Y.

use std::f32::consts::TAU;

use nalgebra::{Point2, Point3, Vector3};

use crate::config::MIN_CIRCLE_SEGMENTS;
use crate::draw::geometry::Mesh;

/// Axis-aligned box with full extents `sx` x `sy` x `sz`
pub fn box_mesh(sx: f32, sy: f32, sz: f32) -> Mesh {
    let h = Vector3::new(sx * 0.5, sy * 0.5, sz * 0.5);
    let mut mesh = Mesh::new();

    // (face normal, first in-plane axis, second in-plane axis)
    let faces = [
        (Vector3::x(), Vector3::z(), Vector3::y()),
        (-Vector3::x(), Vector3::z(), Vector3::y()),
        (Vector3::y(), Vector3::x(), Vector3::z()),
        (-Vector3::y(), Vector3::x(), Vector3::z()),
        (Vector3::z(), Vector3::x(), Vector3::y()),
        (-Vector3::z(), Vector3::x(), Vector3::y()),
    ];

    for (normal, u, v) in faces {
        let center = normal.component_mul(&h);
        let du = u.component_mul(&h);
        let dv = v.component_mul(&h);
        let corners = [
            (center - du - dv, Point2::new(0.0, 0.0)),
            (center + du - dv, Point2::new(1.0, 0.0)),
            (center + du + dv, Point2::new(1.0, 1.0)),
            (center - du + dv, Point2::new(0.0, 1.0)),
        ];
        let ids: Vec<u32> = corners
            .iter()
            .map(|(p, uv)| mesh.push_vertex(Point3::from(*p), *uv))
            .collect();
        mesh.push_triangle_facing(ids[0], ids[1], ids[2], &normal);
        mesh.push_triangle_facing(ids[0], ids[2], ids[3], &normal);
    }

    mesh.finalize();
    mesh
}

fn ring_point(radius: f32, angle: f32, y: f32) -> Point3<f32> {
    Point3::new(angle.cos() * radius, y, angle.sin() * radius)
}

fn push_side(mesh: &mut Mesh, radius: f32, height: f32, segments: u32) {
    let half = height * 0.5;
    for i in 0..segments {
        let a0 = i as f32 / segments as f32 * TAU;
        let a1 = (i + 1) as f32 / segments as f32 * TAU;
        let u0 = i as f32 / segments as f32;
        let u1 = (i + 1) as f32 / segments as f32;

        let b0 = mesh.push_vertex(ring_point(radius, a0, -half), Point2::new(u0, 0.0));
        let b1 = mesh.push_vertex(ring_point(radius, a1, -half), Point2::new(u1, 0.0));
        let t1 = mesh.push_vertex(ring_point(radius, a1, half), Point2::new(u1, 1.0));
        let t0 = mesh.push_vertex(ring_point(radius, a0, half), Point2::new(u0, 1.0));

        let mid = (a0 + a1) * 0.5;
        let outward = Vector3::new(mid.cos(), 0.0, mid.sin());
        mesh.push_triangle_facing(b0, b1, t1, &outward);
        mesh.push_triangle_facing(b0, t1, t0, &outward);
    }
}

fn push_cap(mesh: &mut Mesh, radius: f32, y: f32, segments: u32) {
    let facing = if y >= 0.0 { Vector3::y() } else { -Vector3::y() };
    let center = mesh.push_vertex(Point3::new(0.0, y, 0.0), Point2::new(0.5, 0.5));
    let ring: Vec<u32> = (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * TAU;
            let uv = Point2::new(0.5 + angle.cos() * 0.5, 0.5 + angle.sin() * 0.5);
            mesh.push_vertex(ring_point(radius, angle, y), uv)
        })
        .collect();
    for i in 0..ring.len() {
        let next = ring[(i + 1) % ring.len()];
        mesh.push_triangle_facing(center, ring[i], next, &facing);
    }
}

/// Closed cylinder along +Y
pub fn cylinder_mesh(radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(MIN_CIRCLE_SEGMENTS);
    let mut mesh = Mesh::new();
    push_side(&mut mesh, radius, height, segments);
    push_cap(&mut mesh, radius, height * 0.5, segments);
    push_cap(&mut mesh, radius, -height * 0.5, segments);
    mesh.finalize();
    mesh
}

/// Cylinder wall without caps
pub fn open_tube(radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(MIN_CIRCLE_SEGMENTS);
    let mut mesh = Mesh::new();
    push_side(&mut mesh, radius, height, segments);
    mesh.finalize();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_extents_and_counts() {
        let mesh = box_mesh(0.05, 0.001, 0.05);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        let size = mesh.bounds.unwrap().size();
        assert!((size.x - 0.05).abs() < 1e-6);
        assert!((size.y - 0.001).abs() < 1e-6);
    }

    #[test]
    fn test_open_tube_has_no_caps() {
        let tube = open_tube(0.03, 0.1, 24);
        assert_eq!(tube.triangle_count(), 48);
        for n in &tube.normals {
            assert!(n.y.abs() < 1e-5);
        }
        // Four vertices per wall quad
        assert_eq!(tube.vertex_count(), 96);
    }

    #[test]
    fn test_cylinder_caps_close_it() {
        let solid = cylinder_mesh(0.045, 0.001, 24);
        assert_eq!(solid.triangle_count(), 48 + 24 * 2);
        let size = solid.bounds.unwrap().size();
        assert!((size.y - 0.001).abs() < 1e-6);
        assert!((size.x - 0.09).abs() < 1e-4);
    }
}
