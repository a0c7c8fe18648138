//! Separating Axis Theorem tests between oriented bounding boxes
//!
//! Two convex shapes are disjoint iff some axis separates their projections.

use super::obb::{OrientedBoundingBox, ProjectionMode};
use crate::foundation::math::Vec3;

/// Cross products shorter than this come from (nearly) parallel edges
const PARALLEL_EPSILON: f32 = 1.0e-6;

/// Check two closed intervals `[min, max]` for overlap
pub fn intervals_overlap(min_a: f32, max_a: f32, min_b: f32, max_b: f32) -> bool {
    min_a.max(min_b) <= max_a.min(max_b)
}

fn separated_on(a: &OrientedBoundingBox, b: &OrientedBoundingBox, axis: &Vec3, mode: ProjectionMode) -> bool {
    !a.project(axis, mode).overlaps(&b.project(axis, mode))
}

/// Reduced SAT: tests the 3 face axes of `a`, then the 3 face axes of `b`.
///
/// Returns false on the first separating axis. Edge cross-product axes are
/// not tested, so two boxes meeting edge-to-edge can be reported as
/// colliding. That is acceptable for slab-like boxes (one dimension much
/// thinner than the others, as with tombs); use [`sat_collision_full`] for
/// general boxes.
pub fn sat_collision(a: &OrientedBoundingBox, b: &OrientedBoundingBox, mode: ProjectionMode) -> bool {
    a.axes()
        .iter()
        .chain(b.axes().iter())
        .all(|axis| !separated_on(a, b, axis, mode))
}

/// Full 15-axis OBB test: both face sets plus the 9 edge cross products.
///
/// Always uses signed projection.
pub fn sat_collision_full(a: &OrientedBoundingBox, b: &OrientedBoundingBox) -> bool {
    if !sat_collision(a, b, ProjectionMode::Signed) {
        return false;
    }

    for edge_a in &a.axes() {
        for edge_b in &b.axes() {
            let axis = edge_a.cross(edge_b);
            if axis.magnitude_squared() < PARALLEL_EPSILON {
                continue;
            }
            if separated_on(a, b, &axis.normalize(), ProjectionMode::Signed) {
                return false;
            }
        }
    }

    true
}
