//! Dive Chase - pursuer/evader state machines for a top-down chase game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pursuer, evader, catch protocol, tick scheduler)
//! - `tuning`: Data-driven tunables loaded from JSON

pub mod sim;
pub mod tuning;

pub use tuning::{DivePolicy, EvaderTuning, PursuerTuning, Tuning, TuningError};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;

    /// Weight applied to off-screen overflow when ranking hop candidates
    pub const OFFSCREEN_WEIGHT: f32 = 1000.0;
}

/// Wrap an angle in degrees to (-180, 180]
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Signed shortest difference from `current` to `target` in degrees, in (-180, 180]
#[inline]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    wrap_degrees(target - current)
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Like [`move_towards`] but steps along the shortest arc between two angles (degrees)
#[inline]
pub fn move_towards_angle(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = delta_angle(current, target);
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Unit "right" vector of a transform rotated by `angle_deg` around the view axis
#[inline]
pub fn facing_right(angle_deg: f32) -> Vec2 {
    Vec2::from_angle(angle_deg.to_radians())
}

/// Rotate a local offset into world orientation for a parent facing `angle_deg`
#[inline]
pub fn rotate_offset(local: Vec2, angle_deg: f32) -> Vec2 {
    Vec2::from_angle(angle_deg.to_radians()).rotate(local)
}

/// Fraction of `duration` covered by `elapsed`; a non-positive duration counts as complete
#[inline]
pub fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration > 0.0 { elapsed / duration } else { 1.0 }
}

/// Direction angle of a vector in degrees (atan2)
#[inline]
pub fn heading_degrees(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}
