//! Outline triangulation, flat sheets and extruded solids
//!
//! Caps are triangulated with earcut. Extrusion is assembled in a local
//! frame with thickness along +w, then rotated so thickness lies on +Y and
//! shifted so the solid is vertically centered.

use std::f32::consts::FRAC_PI_2;

use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::draw::geometry::{Mesh, PlanePoint};
use crate::error::GeometryError;

use super::outline::PlanarOutline;

/// Triangulate an outline with holes.
/// Returns the flattened ring vertices (outer first, then each hole) and
/// triangle indices into them.
pub fn triangulate_outline(
    outline: &PlanarOutline,
) -> Result<(Vec<PlanePoint>, Vec<u32>), GeometryError> {
    if outline.outer.len() < 3 {
        return Err(GeometryError::TooFewPoints { count: outline.outer.len() });
    }

    let mut flat_coords: Vec<f64> = Vec::new();
    let mut hole_indices: Vec<usize> = Vec::new();
    let mut vertices: Vec<PlanePoint> = Vec::new();

    for p in &outline.outer {
        flat_coords.push(p.x as f64);
        flat_coords.push(p.z as f64);
        vertices.push(*p);
    }

    for hole in &outline.holes {
        if hole.len() < 3 {
            continue;
        }
        hole_indices.push(flat_coords.len() / 2);
        for p in hole {
            flat_coords.push(p.x as f64);
            flat_coords.push(p.z as f64);
            vertices.push(*p);
        }
    }

    let indices = earcutr::earcut(&flat_coords, &hole_indices, 2)
        .map_err(|e| GeometryError::Triangulation(format!("{:?}", e)))?;
    if indices.is_empty() {
        return Err(GeometryError::Triangulation("no triangles produced".to_string()));
    }

    Ok((vertices, indices.iter().map(|&i| i as u32).collect()))
}

/// Zero-thickness sheet at y = 0 with the outline's cutouts, facing +Y
pub fn flat_shape(outline: &PlanarOutline) -> Result<Mesh, GeometryError> {
    let (vertices, indices) = triangulate_outline(outline)?;
    let up = Vector3::y();

    let mut mesh = Mesh::new();
    for p in &vertices {
        mesh.push_vertex(p.lift(0.0), Point2::new(p.x, -p.z));
    }
    for tri in indices.chunks_exact(3) {
        mesh.push_triangle_facing(tri[0], tri[1], tri[2], &up);
    }
    mesh.finalize();
    Ok(mesh)
}

// Local extrusion frame: u = x, v = -z, w = height above the base cap
fn local(p: &PlanePoint, w: f32) -> Point3<f32> {
    Point3::new(p.x, -p.z, w)
}

/// Solid of the given thickness, Y-up and centered on y = 0
pub fn extrude(outline: &PlanarOutline, thickness: f32) -> Result<Mesh, GeometryError> {
    if !thickness.is_finite() || thickness <= 0.0 {
        return Err(GeometryError::InvalidThickness(thickness));
    }

    let (vertices, indices) = triangulate_outline(outline)?;
    let mut mesh = Mesh::new();

    // Caps
    let top = Vector3::z();
    let bottom = -Vector3::z();
    for (w, facing) in [(thickness, top), (0.0, bottom)] {
        let base = mesh.vertex_count() as u32;
        for p in &vertices {
            mesh.push_vertex(local(p, w), Point2::new(p.x, -p.z));
        }
        for tri in indices.chunks_exact(3) {
            mesh.push_triangle_facing(base + tri[0], base + tri[1], base + tri[2], &facing);
        }
    }

    // Side walls, four vertices per edge so each wall keeps a flat normal
    for ring in outline.rings() {
        if ring.len() < 3 {
            continue;
        }
        let mut travelled = 0.0f32;
        for i in 0..ring.len() {
            let a = ring[i];
            let b = ring[(i + 1) % ring.len()];
            let dx = b.x - a.x;
            let dz = b.z - a.z;
            let len = (dx * dx + dz * dz).sqrt();
            if len < 1e-9 {
                continue;
            }
            // Right-hand side of the edge, mapped into the local frame
            let outward = Vector3::new(dz, dx, 0.0);

            let v0 = mesh.push_vertex(local(&a, 0.0), Point2::new(travelled, 0.0));
            let v1 = mesh.push_vertex(local(&b, 0.0), Point2::new(travelled + len, 0.0));
            let v2 = mesh.push_vertex(local(&b, thickness), Point2::new(travelled + len, 1.0));
            let v3 = mesh.push_vertex(local(&a, thickness), Point2::new(travelled, 1.0));
            mesh.push_triangle_facing(v0, v1, v2, &outward);
            mesh.push_triangle_facing(v0, v2, v3, &outward);
            travelled += len;
        }
    }

    let orient = Matrix4::new_translation(&Vector3::new(0.0, -thickness * 0.5, 0.0))
        * Matrix4::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2);
    mesh.apply_matrix(&orient);
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::geometry::Ray;
    use crate::draw::tessellation::build_planar_outline;
    use crate::layout::Hole;

    fn board_with_hole() -> PlanarOutline {
        build_planar_outline(6.0, 4.0, &[Hole { x: 0.0, z: 0.0, r: 0.2 }], 0.98, 48)
    }

    #[test]
    fn test_extrude_is_centered_and_y_up() {
        let mesh = extrude(&PlanarOutline::rectangle(6.0, 4.0), 0.1).unwrap();
        let bounds = mesh.bounds.unwrap();
        assert!((bounds.min.y + 0.05).abs() < 1e-6);
        assert!((bounds.max.y - 0.05).abs() < 1e-6);
        assert!((bounds.min.x + 3.0).abs() < 1e-6);
        assert!((bounds.max.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_extrude_caps_face_outward() {
        let mesh = extrude(&PlanarOutline::rectangle(2.0, 2.0), 0.2).unwrap();
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            if (p.y - 0.1).abs() < 1e-6 && n.y.abs() > 0.5 {
                assert!(n.y > 0.0);
            }
            if (p.y + 0.1).abs() < 1e-6 && n.y.abs() > 0.5 {
                assert!(n.y < 0.0);
            }
        }
    }

    #[test]
    fn test_cutout_lets_rays_through() {
        let outline = board_with_hole();
        let down = Vector3::new(0.0, -1.0, 0.0);

        let solid = extrude(&outline, 0.1).unwrap();
        assert!(solid.raycast(&Ray::new(Point3::new(0.0, 1.0, 0.0), down)).is_none());
        assert!(solid.raycast(&Ray::new(Point3::new(1.0, 1.0, 1.0), down)).is_some());

        let sheet = flat_shape(&outline).unwrap();
        assert!(sheet.raycast(&Ray::new(Point3::new(0.0, 1.0, 0.0), down)).is_none());
        let t = sheet.raycast(&Ray::new(Point3::new(1.0, 1.0, 1.0), down)).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hole_wall_normals_point_into_void() {
        let mesh = extrude(&board_with_hole(), 0.1).unwrap();
        // Wall vertices around the hole sit at radius 0.2 and face the center
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let radial = Vector3::new(p.x, 0.0, p.z);
            let r = radial.norm();
            if (r - 0.2).abs() < 1e-4 && n.y.abs() < 1e-3 {
                assert!(n.dot(&radial) < 0.0);
            }
        }
    }

    #[test]
    fn test_invalid_thickness() {
        let outline = PlanarOutline::rectangle(1.0, 1.0);
        assert_eq!(extrude(&outline, 0.0), Err(GeometryError::InvalidThickness(0.0)));
        assert!(extrude(&outline, f32::NAN).is_err());
    }
}
