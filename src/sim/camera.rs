//! World/viewport projection
//!
//! The simulation never talks to a real camera. It only needs to know where a
//! world point lands in normalized viewport space (x, y in [0, 1] when visible,
//! z = depth in front of the view) and how big the screen is in world units.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// World-to-viewport mapping consumed by the controllers
pub trait Projection {
    /// Map a world point to normalized viewport coordinates (x, y) plus view depth (z)
    fn world_to_viewport(&self, world: Vec2) -> Vec3;

    /// Map normalized viewport coordinates back to the world plane
    fn viewport_to_world(&self, viewport: Vec2) -> Vec2;

    /// Magnitude of the world position under the top-right screen corner
    fn screen_extent(&self) -> f32 {
        self.viewport_to_world(Vec2::ONE).length()
    }
}

/// Orthographic camera looking down at the play plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthoCamera {
    /// World point at the middle of the screen
    pub center: Vec2,
    /// Half the visible height in world units
    pub half_height: f32,
    /// Width / height
    pub aspect: f32,
    /// Distance from the camera to the play plane
    pub depth: f32,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            half_height: 5.0,
            aspect: 16.0 / 9.0,
            depth: 10.0,
        }
    }
}

impl OrthoCamera {
    pub fn new(center: Vec2, half_height: f32, aspect: f32) -> Self {
        Self {
            center,
            half_height,
            aspect,
            ..Default::default()
        }
    }

    /// Half extents of the visible area (world units)
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.half_height * self.aspect, self.half_height)
    }
}

impl Projection for OrthoCamera {
    fn world_to_viewport(&self, world: Vec2) -> Vec3 {
        let size = self.half_extents() * 2.0;
        let local = (world - self.center) / size + Vec2::splat(0.5);
        local.extend(self.depth)
    }

    fn viewport_to_world(&self, viewport: Vec2) -> Vec2 {
        let size = self.half_extents() * 2.0;
        self.center + (viewport - Vec2::splat(0.5)) * size
    }
}
