//! Core geometric primitives for board-space math
//!
//! The board lies in the world XZ plane with +Y up. `PlanePoint` carries
//! the two in-plane coordinates; height is supplied separately wherever a
//! point is lifted into 3D.

use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A point on the board plane (world x, world z)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanePoint {
    pub x: f32,
    pub z: f32,
}

impl PlanePoint {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }

    pub fn distance_sq(&self, other: &PlanePoint) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        dx * dx + dz * dz
    }

    /// Lift onto the horizontal plane at height `y`
    pub fn lift(&self, y: f32) -> Point3<f32> {
        Point3::new(self.x, y, self.z)
    }
}

/// A pick ray. `direction` is unit length for rays built with `Ray::new`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        let len = direction.norm();
        let direction = if len > 1e-12 { direction / len } else { Vector3::new(0.0, -1.0, 0.0) };
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Map the ray through `m` without renormalizing, so the hit parameter
    /// `t` found in the target space is the same `t` along this ray.
    pub fn transformed(&self, m: &Matrix4<f32>) -> Ray {
        Ray {
            origin: m.transform_point(&self.origin),
            direction: m.transform_vector(&self.direction),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f32>>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut min = first;
        let mut max = first;
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some(Self { min, max })
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    pub fn transformed(&self, m: &Matrix4<f32>) -> Aabb {
        let corners = self.corners().map(|c| m.transform_point(&c));
        // Eight corners always yield a box
        Aabb::from_points(corners.iter()).unwrap_or(*self)
    }

    /// Slab test. Returns the entry parameter (0 when the origin is inside).
    pub fn ray_hit(&self, ray: &Ray) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let o = ray.origin[axis];
            let d = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < 1e-12 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            None
        } else {
            Some(t_min.max(0.0))
        }
    }
}

/// Bounding sphere around a mesh's AABB
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_ray_hit_and_miss() {
        let bx = Aabb {
            min: Point3::new(-1.0, -1.0, -1.0),
            max: Point3::new(1.0, 1.0, 1.0),
        };
        let down = Ray::new(Point3::new(0.0, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        let t = bx.ray_hit(&down).unwrap();
        assert!((t - 4.0).abs() < 1e-6);

        let miss = Ray::new(Point3::new(3.0, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        assert!(bx.ray_hit(&miss).is_none());

        let away = Ray::new(Point3::new(0.0, 5.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        assert!(bx.ray_hit(&away).is_none());
    }

    #[test]
    fn test_transformed_ray_keeps_parameter() {
        let ray = Ray::new(Point3::new(0.0, 5.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        let m = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 0.5, 2.0));
        let local = ray.transformed(&m);
        let world_hit = ray.at(3.0);
        let local_hit = local.origin + local.direction * 3.0;
        assert!((m.transform_point(&world_hit) - local_hit).norm() < 1e-6);
    }
}
