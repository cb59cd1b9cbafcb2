//! Board outline construction
//!
//! A centered rectangle with one circular sub-path per valid hole. The
//! same outline feeds the board solid and both copper sheets so their
//! cutouts line up exactly.

use std::f32::consts::TAU;

use crate::config::MIN_CIRCLE_SEGMENTS;
use crate::draw::geometry::PlanePoint;
use crate::layout::Hole;

/// Closed outer ring plus closed hole rings, all in world x/z.
///
/// The outer ring has positive signed area and holes negative, so the
/// outward side of every edge is its right-hand side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanarOutline {
    pub outer: Vec<PlanePoint>,
    pub holes: Vec<Vec<PlanePoint>>,
}

impl PlanarOutline {
    /// Rectangle of `width` x `depth` centered at the origin
    pub fn rectangle(width: f32, depth: f32) -> Self {
        let hw = width * 0.5;
        let hd = depth * 0.5;
        Self {
            outer: vec![
                PlanePoint::new(-hw, -hd),
                PlanePoint::new(hw, -hd),
                PlanePoint::new(hw, hd),
                PlanePoint::new(-hw, hd),
            ],
            holes: Vec::new(),
        }
    }

    /// Add a hole ring, reoriented to negative area
    pub fn push_hole(&mut self, ring: Vec<PlanePoint>) {
        if ring.len() >= 3 {
            self.holes.push(oriented(ring, false));
        }
    }

    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    pub fn rings(&self) -> impl Iterator<Item = &[PlanePoint]> {
        std::iter::once(self.outer.as_slice()).chain(self.holes.iter().map(|h| h.as_slice()))
    }
}

/// Shoelace area in the x/z plane
pub fn signed_area(ring: &[PlanePoint]) -> f32 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.z - b.x * a.z;
    }
    sum * 0.5
}

fn oriented(mut ring: Vec<PlanePoint>, positive: bool) -> Vec<PlanePoint> {
    if (signed_area(&ring) > 0.0) != positive {
        ring.reverse();
    }
    ring
}

/// Polygonal circle approximation, closed implicitly (first point not repeated)
pub fn circle_ring(center: PlanePoint, radius: f32, segments: u32) -> Vec<PlanePoint> {
    let segments = segments.max(MIN_CIRCLE_SEGMENTS);
    (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * TAU;
            PlanePoint::new(center.x + angle.cos() * radius, center.z + angle.sin() * radius)
        })
        .collect()
}

/// A hole that gets a cutout and a wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HolePlacement {
    /// Position in the layout's hole list
    pub index: usize,
    pub center: PlanePoint,
    pub radius: f32,
}

/// Valid holes in world x/z. A hole whose circle touches, overlaps or
/// repeats one already placed is dropped; earcut needs disjoint hole rings.
pub fn place_holes(width: f32, depth: f32, holes: &[Hole], margin: f32) -> Vec<HolePlacement> {
    let half_width = width * 0.5;
    let half_depth = depth * 0.5;
    let mut placed: Vec<HolePlacement> = Vec::with_capacity(holes.len());

    for (index, hole) in holes.iter().enumerate() {
        if !hole.is_valid() {
            log::debug!("skipping hole outside board bounds: {:?}", hole);
            continue;
        }
        let center = hole.world_center(half_width, half_depth, margin);
        let radius = hole.r as f32;
        let clash = placed.iter().find(|p| {
            let reach = p.radius + radius + HOLE_CLEARANCE;
            p.center.distance_sq(&center) < reach * reach
        });
        if let Some(other) = clash {
            log::debug!("skipping hole #{} overlapping hole #{}", index, other.index);
            continue;
        }
        placed.push(HolePlacement { index, center, radius });
    }
    placed
}

/// Minimum gap between two hole rings
const HOLE_CLEARANCE: f32 = 1e-6;

/// Board rectangle with a circular cutout for every hole `place_holes`
/// keeps.
pub fn build_planar_outline(
    width: f32,
    depth: f32,
    holes: &[Hole],
    margin: f32,
    segments: u32,
) -> PlanarOutline {
    let mut outline = PlanarOutline::rectangle(width, depth);
    for hole in place_holes(width, depth, holes, margin) {
        outline.push_hole(circle_ring(hole.center, hole.radius, segments));
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_is_positive() {
        let outline = PlanarOutline::rectangle(6.0, 4.0);
        assert!((signed_area(&outline.outer) - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_holes_dropped() {
        let holes = [
            Hole { x: 0.5, z: 0.5, r: 0.03 },
            Hole { x: 1.2, z: 0.0, r: 0.03 },
            Hole { x: 0.0, z: 0.0, r: -0.1 },
            Hole { x: -1.0, z: 1.0, r: 0.05 },
        ];
        let outline = build_planar_outline(6.0, 4.0, &holes, 0.98, 48);
        assert_eq!(outline.hole_count(), 2);
        for ring in &outline.holes {
            assert_eq!(ring.len(), 48);
            assert!(signed_area(ring) < 0.0);
        }
    }

    #[test]
    fn test_repeated_and_overlapping_holes_dropped() {
        let holes = [
            Hole { x: 0.5, z: 0.5, r: 0.03 },
            Hole { x: -0.5, z: 0.5, r: 0.03 },
            Hole { x: -0.5, z: 0.5, r: 0.03 },
            Hole { x: -0.5, z: 0.5, r: 0.01 },
            Hole { x: -0.49, z: 0.5, r: 0.03 },
            Hole { x: -0.4, z: 0.5, r: 0.03 },
        ];
        let placed = place_holes(6.0, 4.0, &holes, 0.98);
        let kept: Vec<usize> = placed.iter().map(|h| h.index).collect();
        assert_eq!(kept, vec![0, 1, 5]);
        assert_eq!(build_planar_outline(6.0, 4.0, &holes, 0.98, 24).hole_count(), 3);
    }

    #[test]
    fn test_hole_ring_is_centered() {
        let holes = [Hole { x: 0.5, z: -0.5, r: 0.1 }];
        let outline = build_planar_outline(6.0, 4.0, &holes, 0.98, 24);
        let ring = &outline.holes[0];
        let cx = ring.iter().map(|p| p.x).sum::<f32>() / ring.len() as f32;
        let cz = ring.iter().map(|p| p.z).sum::<f32>() / ring.len() as f32;
        assert!((cx - 0.5 * 3.0 * 0.98).abs() < 1e-5);
        assert!((cz + 0.5 * 2.0 * 0.98).abs() < 1e-5);
    }

    #[test]
    fn test_segment_floor() {
        assert_eq!(circle_ring(PlanePoint::default(), 1.0, 6).len(), 24);
    }
}
