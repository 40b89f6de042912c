//! Overlap detection between the two actors
//!
//! Both actors are treated as circles on the play plane. The tick scheduler
//! runs this every tick, so an overlap that persists is reported every tick
//! it lasts.

use glam::Vec2;

/// Result of an overlap check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapResult {
    /// Whether the circles touch or intersect
    pub hit: bool,
    /// Unit vector from `b` toward `a` (zero when centers coincide or on a miss)
    pub normal: Vec2,
    /// How far the circles interpenetrate
    pub penetration: f32,
}

impl OverlapResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Circle-circle overlap test
pub fn circle_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> OverlapResult {
    let reach = radius_a + radius_b;
    let delta = a - b;
    let dist_sq = delta.length_squared();

    if dist_sq > reach * reach {
        return OverlapResult::miss();
    }

    let dist = dist_sq.sqrt();
    OverlapResult {
        hit: true,
        normal: delta.normalize_or_zero(),
        penetration: reach - dist,
    }
}
