//! Collision Detection
//!
//! Pure geometric predicates over axis-aligned boxes. Intervals are closed:
//! boxes that only touch on a face, edge or corner still count as
//! overlapping.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// World-space axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create from corners.
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Place actor-frame box offsets at a world position.
    #[inline]
    pub fn at(position: Vec3, box_min: Vec3, box_max: Vec3) -> Self {
        Self {
            min: position + box_min,
            max: position + box_max,
        }
    }

    /// Check overlap with another box.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        box_overlap(self.min, self.max, other.min, other.max)
    }

    /// Check whether the segment `start..=end` touches this box.
    #[inline]
    pub fn intersects_segment(&self, start: Vec3, end: Vec3) -> bool {
        segment_box_overlap(self.min, self.max, start, end)
    }
}

/// Check if two boxes overlap on all three axes (closed intervals).
#[inline]
pub fn box_overlap(min_a: Vec3, max_a: Vec3, min_b: Vec3, max_b: Vec3) -> bool {
    min_a.x <= max_b.x
        && max_a.x >= min_b.x
        && min_a.y <= max_b.y
        && max_a.y >= min_b.y
        && min_a.z <= max_b.z
        && max_a.z >= min_b.z
}

/// Check if the segment from `seg_start` to `seg_end` touches a box.
///
/// Slab clipping of the parametric segment `start + t * (end - start)`,
/// `t` in [0, 1]. Catches fast movers whose per-tick step is wider than the
/// box they pass through.
pub fn segment_box_overlap(box_min: Vec3, box_max: Vec3, seg_start: Vec3, seg_end: Vec3) -> bool {
    let dir = seg_end - seg_start;
    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;

    for axis in 0..3 {
        let origin = seg_start[axis];
        let d = dir[axis];
        let (lo, hi) = (box_min[axis], box_max[axis]);

        if d == 0.0 {
            // Parallel to this slab: must already be inside it
            if origin < lo || origin > hi {
                return false;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_box_at(p: Vec3) -> Aabb {
        Aabb::at(p, Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    #[test]
    fn test_box_overlap_penetration() {
        // 0.1 units of penetration along X
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(0.9, 0.0, 0.0));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_box_overlap_edge_contact() {
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(1.0, 0.0, 0.0));
        assert!(a.overlaps(&b), "touching faces count as overlap");

        let corner = unit_box_at(Vec3::new(1.0, 1.0, 1.0));
        assert!(a.overlaps(&corner), "touching corners count as overlap");
    }

    #[test]
    fn test_box_overlap_separated() {
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(1.01, 0.0, 0.0));
        assert!(!a.overlaps(&b));

        // Overlap on two axes is not enough
        let c = unit_box_at(Vec3::new(0.2, 0.2, 3.0));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_segment_tunnels_through_box() {
        let target = unit_box_at(Vec3::ZERO);
        // Both endpoints outside, segment passes straight through
        assert!(target.intersects_segment(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)));
        // Static box test at the endpoint misses
        assert!(!target.overlaps(&unit_box_at(Vec3::new(5.0, 0.0, 0.0))));
    }

    #[test]
    fn test_segment_misses() {
        let target = unit_box_at(Vec3::ZERO);
        assert!(!target.intersects_segment(Vec3::new(-5.0, 2.0, 0.0), Vec3::new(5.0, 2.0, 0.0)));
        // Stops short of the box
        assert!(!target.intersects_segment(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(-0.6, 0.0, 0.0)));
        // Diagonal that clips past the corner
        assert!(!target.intersects_segment(Vec3::new(0.0, 0.0, 2.0), Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_segment_endpoint_on_face() {
        let target = unit_box_at(Vec3::ZERO);
        assert!(target.intersects_segment(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(-0.5, 0.0, 0.0)));
    }

    #[test]
    fn test_degenerate_segment_is_point_test() {
        let target = unit_box_at(Vec3::ZERO);
        let inside = Vec3::new(0.1, 0.2, 0.3);
        assert!(target.intersects_segment(inside, inside));
        let outside = Vec3::new(0.1, 2.0, 0.3);
        assert!(!target.intersects_segment(outside, outside));
    }

    fn coord() -> impl Strategy<Value = f32> {
        -50.0f32..50.0
    }

    fn vec3() -> impl Strategy<Value = Vec3> {
        (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    fn extent() -> impl Strategy<Value = Vec3> {
        (0.0f32..5.0, 0.0f32..5.0, 0.0f32..5.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    fn solid_extent() -> impl Strategy<Value = Vec3> {
        (0.1f32..5.0, 0.1f32..5.0, 0.1f32..5.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn prop_box_overlap_symmetric(pa in vec3(), ea in extent(), pb in vec3(), eb in extent()) {
            let a = Aabb::new(pa, pa + ea);
            let b = Aabb::new(pb, pb + eb);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_shared_point_overlaps(pa in vec3(), ea in extent(), eb in extent(), f in 0.0f32..=1.0) {
            // b is anchored at a point inside a, so they share that point
            let a = Aabb::new(pa, pa + ea);
            let shared = pa + ea * f;
            let b = Aabb::new(shared, shared + eb);
            prop_assert!(a.overlaps(&b));
        }

        #[test]
        fn prop_separated_never_overlaps(pa in vec3(), ea in extent(), eb in extent(), gap in 0.01f32..10.0, axis in 0usize..3) {
            let a = Aabb::new(pa, pa + ea);
            let mut offset = Vec3::ZERO;
            offset[axis] = ea[axis] + gap;
            let b = Aabb::new(pa + offset, pa + offset + eb);
            prop_assert!(!a.overlaps(&b));
        }

        #[test]
        fn prop_segment_endpoint_inside_hits(pa in vec3(), ea in solid_extent(), f in 0.05f32..0.95, far in vec3()) {
            let a = Aabb::new(pa, pa + ea);
            let inside = pa + ea * f;
            prop_assert!(a.intersects_segment(far, inside));
            prop_assert!(a.intersects_segment(inside, far));
        }
    }
}
