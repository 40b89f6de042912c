//! Scripted pointer driver
//!
//! Stands in for a human on the mouse: steers the pointer a little past the
//! evader with a seeded random wander, and pulls the trigger when the evader
//! is inside dive range. Used by the demo binary and determinism tests.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::tick::{TickInput, World};

/// How far past the evader the pointer is held (keeps the pursuer at speed)
const POINTER_LEAD: f32 = 4.0;
/// Maximum random wander of the pointer (world units)
const MAX_WANDER: f32 = 1.5;
/// Chance per tick of pulling the trigger while in range
const TRIGGER_CHANCE: f64 = 0.2;

pub struct Autopilot {
    rng: Pcg32,
    wander: Vec2,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            wander: Vec2::ZERO,
        }
    }

    /// Produce the input for the next tick from the current world
    pub fn next_input(&mut self, world: &World) -> TickInput {
        let pursuer = &world.pursuer;
        let evader = &world.evader;

        let jitter = Vec2::new(
            self.rng.random_range(-1.0..1.0),
            self.rng.random_range(-1.0..1.0),
        );
        self.wander = (self.wander + jitter * 0.1).clamp_length_max(MAX_WANDER);

        let to_evader = evader.position - pursuer.position;
        let pointer = evader.position + to_evader.normalize_or_zero() * POINTER_LEAD + self.wander;

        let in_range = to_evader.length() < pursuer.tuning.dive_distance * 0.9;
        let trigger = in_range && !evader.is_caught() && self.rng.random_bool(TRIGGER_CHANCE);

        TickInput { pointer, trigger }
    }
}
