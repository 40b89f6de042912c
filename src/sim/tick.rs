//! Fixed timestep simulation tick
//!
//! Advances both actors once per step in a fixed order: the pursuer first so
//! the evader's distance and diving checks see this tick's pursuer, then the
//! evader, then the overlap check that drives the catch protocol.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Projection;
use super::collision::circle_overlap;
use super::evader::Evader;
use super::pursuer::Pursuer;
use super::state::{GameEvent, PresentationSink};
use crate::tuning::Tuning;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in world space
    pub pointer: Vec2,
    /// Primary trigger held (starts a dive)
    pub trigger: bool,
}

/// Both actors plus the simulation clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub pursuer: Pursuer,
    pub evader: Evader,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Accumulated simulation time (seconds)
    pub time_secs: f64,
    /// Events raised since the last drain
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl World {
    pub fn new(tuning: &Tuning, pursuer_position: Vec2, evader_position: Vec2) -> Self {
        Self {
            pursuer: Pursuer::new(pursuer_position, tuning.pursuer),
            evader: Evader::new(evader_position, tuning.evader),
            time_ticks: 0,
            time_secs: 0.0,
            events: Vec::new(),
        }
    }

    /// Take all events raised since the previous call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hand each actor's current state to the presentation layer
    pub fn present<S: PresentationSink + ?Sized>(&self, sink: &mut S) {
        sink.present_pursuer(self.pursuer.state);
        sink.present_evader(self.evader.state);
    }

    /// Debug dump of both actors
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Advance the world by one fixed timestep
pub fn tick<P: Projection + ?Sized>(world: &mut World, projection: &P, input: &TickInput, dt: f32) {
    world.time_ticks += 1;
    world.time_secs += dt as f64;
    let now = world.time_secs as f32;

    world.pursuer.tick(input, projection, now, &mut world.events);
    world.evader.tick(&world.pursuer, projection, now, &mut world.events);

    let overlap = circle_overlap(
        world.evader.position,
        world.evader.tuning.radius,
        world.pursuer.position,
        world.pursuer.tuning.radius,
    );
    if overlap.hit {
        log::trace!("overlap, penetration {:.3}", overlap.penetration);
        world.evader.on_overlap(&world.pursuer, &mut world.events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::autopilot::Autopilot;
    use crate::sim::camera::OrthoCamera;
    use crate::sim::state::{EvaderState, PursuerState};

    #[derive(Default)]
    struct RecordingSink {
        pursuer: Vec<PursuerState>,
        evader: Vec<EvaderState>,
    }

    impl PresentationSink for RecordingSink {
        fn present_pursuer(&mut self, state: PursuerState) {
            self.pursuer.push(state);
        }

        fn present_evader(&mut self, state: EvaderState) {
            self.evader.push(state);
        }
    }

    #[test]
    fn test_pursuer_approach_scares_evader() {
        let cam = OrthoCamera::default();
        let mut world = World::new(&Tuning::default(), Vec2::new(-6.0, 0.0), Vec2::ZERO);

        let mut hopped = false;
        for _ in 0..500 {
            let input = TickInput {
                pointer: world.evader.position,
                trigger: false,
            };
            tick(&mut world, &cam, &input, SIM_DT);
            if world
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::HopStarted { .. }))
            {
                hopped = true;
                break;
            }
        }
        assert!(hopped);
        assert_eq!(world.evader.state, EvaderState::Hop);
        assert!(world.evader.hop_end_position.distance(world.pursuer.position) > 3.0);
    }

    #[test]
    fn test_diving_overlap_catches() {
        let cam = OrthoCamera::default();
        let mut world = World::new(&Tuning::default(), Vec2::new(0.4, 0.0), Vec2::ZERO);
        let input = TickInput {
            pointer: Vec2::new(-8.0, 0.0),
            trigger: true,
        };

        tick(&mut world, &cam, &input, SIM_DT);
        assert!(world.pursuer.is_diving());
        assert_eq!(world.evader.state, EvaderState::Caught);
        assert!((world.evader.position - Vec2::new(0.4, -0.5)).length() < 1e-5);

        let events = world.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::Caught { .. })));
        assert!(world.drain_events().is_empty());

        // Caught evader rides along with the dive
        for _ in 0..30 {
            tick(&mut world, &cam, &input, SIM_DT);
        }
        assert_eq!(world.evader.state, EvaderState::Caught);
        let offset = crate::rotate_offset(Vec2::new(0.0, -0.5), world.pursuer.angle);
        let attach = world.pursuer.position + offset;
        assert!((world.evader.position - attach).length() < 1e-5);
    }

    #[test]
    fn test_overlap_without_dive_is_ignored() {
        let cam = OrthoCamera::default();
        let mut world = World::new(&Tuning::default(), Vec2::new(0.4, 0.0), Vec2::ZERO);
        let input = TickInput {
            pointer: Vec2::new(0.4, 0.0),
            trigger: false,
        };

        tick(&mut world, &cam, &input, SIM_DT);
        assert!(!world.pursuer.is_diving());
        assert_eq!(world.evader.state, EvaderState::HopStart);
    }

    #[test]
    fn test_present_reports_states() {
        let cam = OrthoCamera::default();
        let mut world = World::new(&Tuning::default(), Vec2::new(-8.0, 0.0), Vec2::new(5.0, 0.0));
        let mut sink = RecordingSink::default();

        tick(&mut world, &cam, &TickInput::default(), SIM_DT);
        world.present(&mut sink);
        assert_eq!(sink.pursuer, vec![PursuerState::MoveSlow]);
        assert_eq!(sink.evader, vec![EvaderState::Idle]);
    }

    #[test]
    fn test_determinism() {
        let cam = OrthoCamera::default();
        let tuning = Tuning::default();
        let mut world1 = World::new(&tuning, Vec2::new(-6.0, -3.0), Vec2::new(2.0, 1.0));
        let mut world2 = world1.clone();
        let mut pilot1 = Autopilot::new(4242);
        let mut pilot2 = Autopilot::new(4242);

        for _ in 0..600 {
            let input1 = pilot1.next_input(&world1);
            let input2 = pilot2.next_input(&world2);
            tick(&mut world1, &cam, &input1, SIM_DT);
            tick(&mut world2, &cam, &input2, SIM_DT);
        }

        assert_eq!(world1.time_ticks, 600);
        assert_eq!(world1.snapshot_json().unwrap(), world2.snapshot_json().unwrap());
    }
}
