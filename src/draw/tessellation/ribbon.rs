//! Flat ribbon stroking for copper traces
//!
//! Each surviving path point contributes one left/right vertex pair and
//! consecutive pairs are joined by two triangles. Interior corners use a
//! miter along the bisector of the adjacent segment normals; spikes past
//! the miter limit, reversals and degenerate segments fall back to a bevel
//! that offsets along the next segment's normal only.

use nalgebra::{Point2, Point3, Vector3};

use crate::draw::geometry::{Mesh, PlanePoint};
use crate::error::GeometryError;

/// Squared distance below which consecutive points are merged
pub const DEDUP_EPSILON_SQ: f32 = 1e-12;

const NORMALIZE_EPSILON_SQ: f32 = 1e-12;
const MITER_DENOM_EPSILON: f32 = 1e-6;

fn safe_normalize(v: Vector3<f32>) -> Option<Vector3<f32>> {
    let len_sq = v.norm_squared();
    if len_sq < NORMALIZE_EPSILON_SQ || !len_sq.is_finite() {
        None
    } else {
        Some(v / len_sq.sqrt())
    }
}

/// Drop non-finite points and points too close to the previous kept one
pub fn dedup_points(points: &[PlanePoint]) -> Vec<PlanePoint> {
    let mut kept: Vec<PlanePoint> = Vec::with_capacity(points.len());
    for p in points.iter().filter(|p| p.is_finite()) {
        match kept.last() {
            Some(last) if last.distance_sq(p) < DEDUP_EPSILON_SQ => {}
            _ => kept.push(*p),
        }
    }
    kept
}

// up x direction, i.e. (dz, 0, -dx) for a unit direction
fn segment_normal(a: &Point3<f32>, b: &Point3<f32>) -> Option<Vector3<f32>> {
    let dir = safe_normalize(b - a)?;
    Some(Vector3::y().cross(&dir))
}

/// Offset from path point `k` to its right-hand vertex
fn join_offset(
    normals: &[Option<Vector3<f32>>],
    k: usize,
    half_width: f32,
    max_extension: f32,
) -> Vector3<f32> {
    let last = normals.len();
    let prev = if k > 0 { normals[k - 1] } else { None };
    let next = if k < last { normals[k] } else { None };

    let bevel = |n: Option<Vector3<f32>>| -> Vector3<f32> {
        n.or_else(|| normals.iter().flatten().next().copied())
            .unwrap_or_else(Vector3::z)
            * half_width
    };

    let (n_prev, n_next) = match (prev, next) {
        (Some(p), Some(n)) => (p, n),
        (None, next) => return bevel(next),
        (prev, None) => return bevel(prev),
    };

    let Some(miter) = safe_normalize(n_prev + n_next) else {
        // 180 degree reversal
        return bevel(Some(n_next));
    };

    let denom = miter.dot(&n_next);
    if denom.abs() <= MITER_DENOM_EPSILON {
        return bevel(Some(n_next));
    }

    let extension = half_width / denom;
    if !extension.is_finite() || extension.abs() > max_extension {
        return bevel(Some(n_next));
    }
    miter * extension
}

/// Build a flat ribbon mesh on the plane `y = plane_height`.
///
/// UV.u is 0 on the left edge and 1 on the right; UV.v runs 0 to 1 along
/// cumulative arc length.
pub fn build_ribbon(
    points: &[PlanePoint],
    width: f32,
    plane_height: f32,
    miter_limit: f32,
) -> Result<Mesh, GeometryError> {
    if !width.is_finite() || width <= 0.0 {
        return Err(GeometryError::InvalidWidth(width));
    }
    if !plane_height.is_finite() {
        return Err(GeometryError::InvalidPlaneHeight(plane_height));
    }

    let path: Vec<Point3<f32>> = dedup_points(points)
        .iter()
        .map(|p| p.lift(plane_height))
        .collect();
    if path.len() < 2 {
        return Err(GeometryError::TooFewPoints { count: path.len() });
    }

    let half_width = width * 0.5;
    // NaN limits collapse to 1, i.e. always bevel
    let max_extension = half_width * miter_limit.max(1.0);

    let normals: Vec<Option<Vector3<f32>>> = path
        .windows(2)
        .map(|w| segment_normal(&w[0], &w[1]))
        .collect();

    let mut arc = Vec::with_capacity(path.len());
    let mut total = 0.0f32;
    arc.push(0.0);
    for w in path.windows(2) {
        total += (w[1] - w[0]).norm();
        arc.push(total);
    }

    let mut mesh = Mesh::new();
    for (k, curr) in path.iter().enumerate() {
        let offset = join_offset(&normals, k, half_width, max_extension);
        let v = if total > 0.0 { arc[k] / total } else { 0.0 };
        mesh.push_vertex(*curr - offset, Point2::new(0.0, v));
        mesh.push_vertex(*curr + offset, Point2::new(1.0, v));
    }

    for seg in 0..path.len() - 1 {
        let i0 = (seg * 2) as u32;
        let i1 = i0 + 1;
        let i2 = i0 + 2;
        let i3 = i0 + 3;
        mesh.push_triangle(i0, i2, i1);
        mesh.push_triangle(i2, i3, i1);
    }

    mesh.finalize();
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f32, f32)]) -> Vec<PlanePoint> {
        raw.iter().map(|&(x, z)| PlanePoint::new(x, z)).collect()
    }

    #[test]
    fn test_straight_ribbon_is_perpendicular() {
        let mesh = build_ribbon(&pts(&[(0.0, 0.0), (2.0, 0.0)]), 0.2, 0.05, 4.0).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);

        let left = mesh.positions[0];
        let right = mesh.positions[1];
        assert!((left.x - 0.0).abs() < 1e-6 && (right.x - 0.0).abs() < 1e-6);
        assert!(((left.z - right.z).abs() - 0.2).abs() < 1e-6);
        assert!((left.y - 0.05).abs() < 1e-6);

        for n in &mesh.normals {
            assert!((n - Vector3::y()).norm() < 1e-5);
        }
    }

    #[test]
    fn test_uvs_follow_arc_length() {
        let path = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 3.0)]);
        let mesh = build_ribbon(&path, 0.1, 0.0, 4.0).unwrap();
        assert_eq!(mesh.uvs[0], Point2::new(0.0, 0.0));
        assert_eq!(mesh.uvs[1], Point2::new(1.0, 0.0));
        assert!((mesh.uvs[2].y - 0.25).abs() < 1e-6);
        assert!((mesh.uvs[5].y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_right_angle_uses_miter() {
        let path = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let mesh = build_ribbon(&path, 0.2, 0.0, 4.0).unwrap();
        let corner = Point3::new(1.0, 0.0, 0.0);
        let d = (mesh.positions[2] - corner).norm();
        assert!((d - 0.1 * std::f32::consts::SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_sharp_turn_is_bounded() {
        let path = pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.02)]);
        let width = 0.2;
        let mesh = build_ribbon(&path, width, 0.0, 4.0).unwrap();
        for (k, p) in path.iter().enumerate() {
            let anchor = p.lift(0.0);
            for v in &mesh.positions[k * 2..k * 2 + 2] {
                assert!((*v - anchor).norm() <= width * 0.5 * 4.0 + 1e-5);
            }
        }
    }

    #[test]
    fn test_reversal_falls_back_to_bevel() {
        let path = pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        let mesh = build_ribbon(&path, 0.2, 0.0, 4.0).unwrap();
        let corner = Point3::new(1.0, 0.0, 0.0);
        for v in &mesh.positions[2..4] {
            assert!(((*v - corner).norm() - 0.1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dedup_then_reject() {
        let err = build_ribbon(&pts(&[(0.5, 0.5), (0.5, 0.5)]), 0.1, 0.0, 4.0).unwrap_err();
        assert_eq!(err, GeometryError::TooFewPoints { count: 1 });

        let err = build_ribbon(&pts(&[(0.5, 0.5)]), 0.1, 0.0, 4.0).unwrap_err();
        assert_eq!(err, GeometryError::TooFewPoints { count: 1 });
    }

    #[test]
    fn test_non_finite_points_dropped() {
        let path = pts(&[(0.0, 0.0), (f32::NAN, 1.0), (1.0, 0.0)]);
        assert_eq!(dedup_points(&path).len(), 2);
        assert!(build_ribbon(&path, 0.1, 0.0, 4.0).is_ok());
    }

    #[test]
    fn test_bad_width_rejected() {
        let path = pts(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(matches!(build_ribbon(&path, 0.0, 0.0, 4.0), Err(GeometryError::InvalidWidth(_))));
        assert!(matches!(build_ribbon(&path, -1.0, 0.0, 4.0), Err(GeometryError::InvalidWidth(_))));
        assert!(matches!(
            build_ribbon(&path, f32::INFINITY, 0.0, 4.0),
            Err(GeometryError::InvalidWidth(_))
        ));
    }
}
