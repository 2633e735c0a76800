//! Circle-circle contact tests and positional correction
//!
//! Every actor is a circle. Overlaps are resolved by pushing both centers
//! apart by half the penetration each. Pairs are resolved one at a time,
//! so a later pair may reintroduce a small overlap in an earlier one.

use glam::Vec2;

/// Offset applied to the first circle when both centers coincide
const COINCIDENT_NUDGE: Vec2 = Vec2::new(0.1, 0.1);

/// True iff the circles strictly overlap
#[inline]
pub fn circles_overlap(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    pos_a.distance(pos_b) < radius_a + radius_b
}

/// Penetration depth of two circles (<= 0 when separated)
#[inline]
pub fn overlap_depth(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> f32 {
    (radius_a + radius_b) - pos_a.distance(pos_b)
}

/// Push two overlapping circles apart symmetrically.
///
/// Each center moves by half the overlap along the line between them.
/// Coincident centers are split by nudging `pos_a` a fixed amount first.
/// Does nothing when the circles are already separated.
pub fn resolve_overlap(pos_a: &mut Vec2, radius_a: f32, pos_b: &mut Vec2, radius_b: f32) {
    if *pos_a == *pos_b {
        *pos_a += COINCIDENT_NUDGE;
    }

    let diff = *pos_a - *pos_b;
    let dist = diff.length();
    let overlap = (radius_a + radius_b) - dist;

    if overlap > 0.0 {
        let correction = diff.normalize_or_zero() * (overlap * 0.5);
        *pos_a += correction;
        *pos_b -= correction;
    }
}
