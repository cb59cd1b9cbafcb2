//! Indexed triangle mesh
//!
//! Positions, normals and UVs are kept per vertex; `indices` holds triangle
//! lists. Any operation that moves vertices recomputes normals and bounds
//! before returning.

use std::collections::HashMap;

use nalgebra::{Matrix4, Point2, Point3, Vector3};

use super::types::{Aabb, BoundingSphere, Ray};

/// 3D mesh ready for rendering or picking
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub uvs: Vec<Point2<f32>>,
    pub indices: Vec<u32>,
    pub bounds: Option<Aabb>,
    pub bounding_sphere: Option<BoundingSphere>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, position: Point3<f32>, uv: Point2<f32>) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.uvs.push(uv);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append a triangle, flipping its winding if its face normal points
    /// away from `facing`.
    pub fn push_triangle_facing(&mut self, a: u32, b: u32, c: u32, facing: &Vector3<f32>) {
        let pa = self.positions[a as usize];
        let pb = self.positions[b as usize];
        let pc = self.positions[c as usize];
        let normal = (pb - pa).cross(&(pc - pa));
        if normal.dot(facing) < 0.0 {
            self.push_triangle(a, c, b);
        } else {
            self.push_triangle(a, b, c);
        }
    }

    pub fn triangle(&self, t: usize) -> [Point3<f32>; 3] {
        let i = t * 3;
        [
            self.positions[self.indices[i] as usize],
            self.positions[self.indices[i + 1] as usize],
            self.positions[self.indices[i + 2] as usize],
        ]
    }

    /// Area-weighted smooth vertex normals
    pub fn compute_vertex_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vector3::zeros());

        for tri in self.indices.chunks_exact(3) {
            let v0 = self.positions[tri[0] as usize];
            let v1 = self.positions[tri[1] as usize];
            let v2 = self.positions[tri[2] as usize];
            let face = (v1 - v0).cross(&(v2 - v0));
            for &i in tri {
                self.normals[i as usize] += face;
            }
        }

        for normal in &mut self.normals {
            let len = normal.norm();
            if len > 0.0 {
                *normal /= len;
            }
        }
    }

    pub fn compute_bounds(&mut self) {
        self.bounds = Aabb::from_points(self.positions.iter());
        self.bounding_sphere = self.bounds.map(|b| {
            let center = b.center();
            let radius = self
                .positions
                .iter()
                .map(|p| (p - center).norm())
                .fold(0.0f32, f32::max);
            BoundingSphere { center, radius }
        });
    }

    /// Normals and bounding volumes after assembly
    pub fn finalize(&mut self) {
        self.compute_vertex_normals();
        self.compute_bounds();
    }

    /// Move every vertex through `m`
    pub fn apply_matrix(&mut self, m: &Matrix4<f32>) {
        for p in &mut self.positions {
            *p = m.transform_point(p);
        }
        self.finalize();
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.apply_matrix(&Matrix4::new_translation(&offset));
    }

    /// Closest hit parameter along `ray`, both faces counted
    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        if let Some(bounds) = &self.bounds {
            bounds.ray_hit(ray)?;
        }

        let mut best: Option<f32> = None;
        for t in 0..self.triangle_count() {
            let [v0, v1, v2] = self.triangle(t);
            if let Some(hit) = ray_triangle_intersect(&ray.origin, &ray.direction, &v0, &v1, &v2) {
                if best.map_or(true, |b| hit < b) {
                    best = Some(hit);
                }
            }
        }
        best
    }

    /// Edges used by exactly one triangle: the silhouette of an open sheet
    pub fn boundary_edges(&self) -> Vec<(u32, u32)> {
        let mut counts: HashMap<(u32, u32), (u32, (u32, u32))> = HashMap::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = if a < b { (a, b) } else { (b, a) };
                let entry = counts.entry(key).or_insert((0, (a, b)));
                entry.0 += 1;
            }
        }

        let mut edges: Vec<(u32, u32)> = counts
            .into_values()
            .filter(|(count, _)| *count == 1)
            .map(|(_, edge)| edge)
            .collect();
        edges.sort_unstable();
        edges
    }
}

/// Möller–Trumbore ray/triangle test. `dir` need not be unit length; the
/// returned value is the parameter along it.
pub fn ray_triangle_intersect(
    origin: &Point3<f32>,
    dir: &Vector3<f32>,
    v0: &Point3<f32>,
    v1: &Point3<f32>,
    v2: &Point3<f32>,
) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = dir.cross(&edge2);
    let a = edge1.dot(&h);

    // Parallel
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.push_vertex(Point3::new(-1.0, 0.0, -1.0), Point2::new(0.0, 0.0));
        let b = mesh.push_vertex(Point3::new(1.0, 0.0, -1.0), Point2::new(1.0, 0.0));
        let c = mesh.push_vertex(Point3::new(1.0, 0.0, 1.0), Point2::new(1.0, 1.0));
        let d = mesh.push_vertex(Point3::new(-1.0, 0.0, 1.0), Point2::new(0.0, 1.0));
        let up = Vector3::y();
        mesh.push_triangle_facing(a, b, c, &up);
        mesh.push_triangle_facing(a, c, d, &up);
        mesh.finalize();
        mesh
    }

    #[test]
    fn test_facing_triangles_point_up() {
        let mesh = unit_quad();
        for n in &mesh.normals {
            assert!((n - Vector3::y()).norm() < 1e-6);
        }
    }

    #[test]
    fn test_raycast_hits_quad() {
        let mesh = unit_quad();
        let ray = Ray::new(Point3::new(0.2, 2.0, 0.3), Vector3::new(0.0, -1.0, 0.0));
        let t = mesh.raycast(&ray).unwrap();
        assert!((t - 2.0).abs() < 1e-5);

        let miss = Ray::new(Point3::new(3.0, 2.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        assert!(mesh.raycast(&miss).is_none());
    }

    #[test]
    fn test_boundary_edges_of_quad() {
        let mesh = unit_quad();
        // The shared diagonal is interior
        assert_eq!(mesh.boundary_edges().len(), 4);
    }

    #[test]
    fn test_apply_matrix_updates_bounds() {
        let mut mesh = unit_quad();
        mesh.translate(Vector3::new(0.0, 3.0, 0.0));
        let bounds = mesh.bounds.unwrap();
        assert!((bounds.min.y - 3.0).abs() < 1e-6);
        assert!((bounds.max.y - 3.0).abs() < 1e-6);
    }
}
