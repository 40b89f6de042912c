//! AI-controlled evader
//!
//! The evader idles until the pursuer comes within `scared_distance`, then
//! hops away. A hop that would leave the screen triggers a bounded angular
//! search for an on-screen destination; if none exists the least-bad
//! candidate is used so the evader never gets stuck.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Projection;
use super::pursuer::PursuerView;
use super::state::{EvaderState, GameEvent};
use crate::consts::OFFSCREEN_WEIGHT;
use crate::tuning::EvaderTuning;
use crate::{heading_degrees, progress, rotate_offset};

/// Result of a hop destination search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HopSearch {
    /// Chosen hop end point
    pub end: Vec2,
    /// Whether `end` passed the on-screen test
    pub on_screen: bool,
    /// Number of candidate directions evaluated
    pub attempts: u32,
}

/// True if `world` projects in front of the view and inside the [0, 1] viewport square
pub fn is_on_screen<P: Projection + ?Sized>(projection: &P, world: Vec2) -> bool {
    let v = projection.world_to_viewport(world);
    v.z > 0.0 && (0.0..=1.0).contains(&v.x) && (0.0..=1.0).contains(&v.y)
}

/// Rank an off-screen hop candidate (lower is better)
///
/// Total viewport overflow past each edge dominates through [`OFFSCREEN_WEIGHT`];
/// distance from the pursuer only separates candidates that are similarly far
/// off-screen. The weight is finite: a candidate slightly further off-screen
/// can still win if it is more than `OFFSCREEN_WEIGHT * extra_overflow` further
/// from the pursuer.
pub fn badness_score<P: Projection + ?Sized>(
    projection: &P,
    candidate: Vec2,
    pursuer: Vec2,
) -> f32 {
    let v = projection.world_to_viewport(candidate);

    let overflow_left = (0.0 - v.x).max(0.0);
    let overflow_right = (v.x - 1.0).max(0.0);
    let overflow_top = (v.y - 1.0).max(0.0);
    let overflow_bottom = (0.0 - v.y).max(0.0);
    let offscreen = overflow_left + overflow_right + overflow_top + overflow_bottom;

    offscreen * OFFSCREEN_WEIGHT - candidate.distance(pursuer)
}

/// Search evenly spaced directions around `start` for an on-screen hop end
///
/// Directions start at the heading of `initial_end` and step by
/// `360 / max_attempts` degrees. The first on-screen candidate wins
/// immediately. Otherwise the best [`badness_score`] is returned, falling back
/// to `initial_end` when no direction was evaluated.
pub fn search_hop_destination<P: Projection + ?Sized>(
    projection: &P,
    start: Vec2,
    initial_end: Vec2,
    hop_distance: f32,
    max_attempts: u32,
    pursuer: Vec2,
) -> HopSearch {
    let base_angle = heading_degrees(initial_end - start);
    let step = if max_attempts > 0 {
        360.0 / max_attempts as f32
    } else {
        0.0
    };

    let mut best_end = initial_end;
    let mut best_score = f32::INFINITY;

    for attempt in 0..max_attempts {
        let angle = base_angle + attempt as f32 * step;
        let direction = Vec2::from_angle(angle.to_radians());
        let end = start + direction * hop_distance;

        if is_on_screen(projection, end) {
            return HopSearch {
                end,
                on_screen: true,
                attempts: attempt + 1,
            };
        }

        let score = badness_score(projection, end, pursuer);
        if score < best_score {
            best_score = score;
            best_end = end;
        }
    }

    log::debug!(
        "no on-screen hop from ({:.2}, {:.2}) after {} attempts, using ({:.2}, {:.2})",
        start.x,
        start.y,
        max_attempts,
        best_end.x,
        best_end.y
    );

    HopSearch {
        end: best_end,
        on_screen: false,
        attempts: max_attempts,
    }
}

/// The evader actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evader {
    pub position: Vec2,
    pub state: EvaderState,
    pub hop_start_time: f32,
    pub hop_start_position: Vec2,
    pub hop_end_position: Vec2,
    pub tuning: EvaderTuning,
}

impl Evader {
    pub fn new(position: Vec2, tuning: EvaderTuning) -> Self {
        Self {
            position,
            state: EvaderState::Idle,
            hop_start_time: 0.0,
            hop_start_position: position,
            hop_end_position: position,
            tuning,
        }
    }

    #[inline]
    pub fn is_caught(&self) -> bool {
        self.state == EvaderState::Caught
    }

    /// Advance one fixed tick against the pursuer's already-updated state
    pub fn tick<V: PursuerView + ?Sized, P: Projection + ?Sized>(
        &mut self,
        pursuer: &V,
        projection: &P,
        now: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let before = self.state;

        match self.state {
            EvaderState::Idle => self.handle_idle(pursuer),
            EvaderState::HopStart => self.handle_hop_start(pursuer, projection, now, events),
            EvaderState::Hop => self.handle_hop(now, events),
            EvaderState::Caught => self.follow(pursuer),
        }

        self.note_transition(before, events);
    }

    /// Overlap callback from the collision layer. Returns true on a catch.
    pub fn on_overlap<V: PursuerView + ?Sized>(
        &mut self,
        pursuer: &V,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if self.is_caught() || !pursuer.is_diving() {
            return false;
        }

        let before = self.state;
        self.state = EvaderState::Caught;
        self.follow(pursuer);

        log::info!("evader caught at ({:.2}, {:.2})", self.position.x, self.position.y);
        events.push(GameEvent::Caught { at: self.position });
        self.note_transition(before, events);
        true
    }

    fn handle_idle<V: PursuerView + ?Sized>(&mut self, pursuer: &V) {
        if self.position.distance(pursuer.position()) < self.tuning.scared_distance {
            self.state = EvaderState::HopStart;
        }
    }

    fn handle_hop_start<V: PursuerView + ?Sized, P: Projection + ?Sized>(
        &mut self,
        pursuer: &V,
        projection: &P,
        now: f32,
        events: &mut Vec<GameEvent>,
    ) {
        self.hop_start_time = now;
        self.hop_start_position = self.position;

        let hop_distance = self.tuning.hop_distance();
        let away = (self.hop_start_position - pursuer.position()).normalize_or_zero();
        let candidate = self.hop_start_position + away * hop_distance;

        let search = if is_on_screen(projection, candidate) {
            HopSearch {
                end: candidate,
                on_screen: true,
                attempts: 0,
            }
        } else {
            search_hop_destination(
                projection,
                self.hop_start_position,
                candidate,
                hop_distance,
                self.tuning.max_move_attempts,
                pursuer.position(),
            )
        };

        self.hop_end_position = search.end;
        self.state = EvaderState::Hop;
        events.push(GameEvent::HopStarted {
            from: self.hop_start_position,
            to: self.hop_end_position,
            on_screen: search.on_screen,
        });
    }

    fn handle_hop(&mut self, now: f32, events: &mut Vec<GameEvent>) {
        let t = progress(now - self.hop_start_time, self.tuning.hop_time);
        self.position = self
            .hop_start_position
            .lerp(self.hop_end_position, t.clamp(0.0, 1.0));

        if t >= 1.0 {
            self.state = EvaderState::Idle;
            events.push(GameEvent::HopFinished { at: self.position });
        }
    }

    /// Stay attached to the pursuer at the caught offset
    fn follow<V: PursuerView + ?Sized>(&mut self, pursuer: &V) {
        let offset = rotate_offset(self.tuning.caught_offset, pursuer.angle());
        self.position = pursuer.position() + offset;
    }

    fn note_transition(&self, before: EvaderState, events: &mut Vec<GameEvent>) {
        if self.state != before {
            log::debug!("evader {} -> {}", before.as_str(), self.state.as_str());
            events.push(GameEvent::EvaderStateChanged {
                from: before,
                to: self.state,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::camera::OrthoCamera;

    struct StubPursuer {
        position: Vec2,
        angle: f32,
        diving: bool,
    }

    impl StubPursuer {
        fn at(position: Vec2) -> Self {
            Self {
                position,
                angle: 0.0,
                diving: false,
            }
        }
    }

    impl PursuerView for StubPursuer {
        fn position(&self) -> Vec2 {
            self.position
        }

        fn angle(&self) -> f32 {
            self.angle
        }

        fn is_diving(&self) -> bool {
            self.diving
        }
    }

    fn camera() -> OrthoCamera {
        // Visible area x in [-10, 10], y in [-5, 5]
        OrthoCamera::new(Vec2::ZERO, 5.0, 2.0)
    }

    #[test]
    fn test_idle_scared_only_inside_distance() {
        let cam = camera();
        let mut events = Vec::new();
        let mut e = Evader::new(Vec2::ZERO, EvaderTuning::default());

        e.tick(&StubPursuer::at(Vec2::new(3.0, 0.0)), &cam, SIM_DT, &mut events);
        assert_eq!(e.state, EvaderState::Idle);

        e.tick(&StubPursuer::at(Vec2::new(2.99, 0.0)), &cam, SIM_DT, &mut events);
        assert_eq!(e.state, EvaderState::HopStart);
    }

    #[test]
    fn test_hop_start_straight_away_when_on_screen() {
        let cam = camera();
        let mut events = Vec::new();
        let mut e = Evader::new(Vec2::ZERO, EvaderTuning::default());
        e.state = EvaderState::HopStart;

        e.tick(&StubPursuer::at(Vec2::new(-1.0, 0.0)), &cam, 2.0, &mut events);
        assert_eq!(e.state, EvaderState::Hop);
        assert_eq!(e.hop_start_time, 2.0);
        assert_eq!(e.hop_start_position, Vec2::ZERO);
        assert!((e.hop_end_position - Vec2::new(1.3, 0.0)).length() < 1e-5);
        assert!(matches!(events[0], GameEvent::HopStarted { on_screen: true, .. }));
    }

    #[test]
    fn test_is_on_screen() {
        let cam = camera();
        assert!(is_on_screen(&cam, Vec2::ZERO));
        assert!(is_on_screen(&cam, Vec2::new(10.0, 5.0)));
        assert!(!is_on_screen(&cam, Vec2::new(10.1, 0.0)));
        assert!(!is_on_screen(&cam, Vec2::new(0.0, -5.1)));

        let behind = OrthoCamera {
            depth: -1.0,
            ..cam
        };
        assert!(!is_on_screen(&behind, Vec2::ZERO));
    }

    #[test]
    fn test_search_short_circuits_on_first_hit() {
        let cam = camera();
        // Straight-away hop overshoots the right edge; 7.2 degree steps first
        // clear it at attempt index 3 (21.6 degrees)
        let start = Vec2::new(8.765, 0.0);
        let pursuer = Vec2::new(7.765, 0.0);
        let initial = start + Vec2::X * 1.3;
        assert!(!is_on_screen(&cam, initial));

        let search = search_hop_destination(&cam, start, initial, 1.3, 50, pursuer);
        assert!(search.on_screen);
        assert_eq!(search.attempts, 4);
        let expected = start + Vec2::from_angle(21.6_f32.to_radians()) * 1.3;
        assert!((search.end - expected).length() < 1e-4);
    }

    #[test]
    fn test_hop_start_runs_search_near_edge() {
        let cam = camera();
        let mut events = Vec::new();
        let mut e = Evader::new(Vec2::new(8.765, 0.0), EvaderTuning::default());
        e.state = EvaderState::HopStart;

        e.tick(&StubPursuer::at(Vec2::new(7.765, 0.0)), &cam, 0.0, &mut events);
        assert_eq!(e.state, EvaderState::Hop);
        assert!(is_on_screen(&cam, e.hop_end_position));
        assert!(e.hop_end_position.y > 0.0);
    }

    #[test]
    fn test_search_with_zero_attempts() {
        let cam = camera();
        let start = Vec2::new(9.5, 0.0);
        let initial = Vec2::new(10.8, 0.0);

        let search = search_hop_destination(&cam, start, initial, 1.3, 0, Vec2::new(8.5, 0.0));
        assert_eq!(search.attempts, 0);
        assert!(!search.on_screen);
        assert_eq!(search.end, initial);
    }

    #[test]
    fn test_zero_attempts_still_hops() {
        let cam = camera();
        let mut events = Vec::new();
        let tuning = EvaderTuning {
            max_move_attempts: 0,
            ..Default::default()
        };
        let mut e = Evader::new(Vec2::new(9.5, 0.0), tuning);
        e.state = EvaderState::HopStart;

        e.tick(&StubPursuer::at(Vec2::new(8.5, 0.0)), &cam, 0.0, &mut events);
        assert_eq!(e.state, EvaderState::Hop);
        assert!((e.hop_end_position - Vec2::new(10.8, 0.0)).length() < 1e-5);
        assert!(matches!(events[0], GameEvent::HopStarted { on_screen: false, .. }));
    }

    #[test]
    fn test_search_exhaustion_picks_least_offscreen() {
        let cam = camera();
        // Every direction lands beyond the right edge
        let start = Vec2::new(30.0, 0.0);
        let pursuer = Vec2::new(29.0, 0.0);
        let initial = start + Vec2::X * 1.3;

        let search = search_hop_destination(&cam, start, initial, 1.3, 50, pursuer);
        assert!(!search.on_screen);
        assert_eq!(search.attempts, 50);
        assert!((search.end - Vec2::new(28.7, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_badness_prefers_on_screen_over_distance() {
        let cam = camera();
        // 0.01 viewport overflow, 1 unit from the pursuer
        let slightly_off = badness_score(&cam, Vec2::new(10.2, 0.0), Vec2::new(9.2, 0.0));
        assert!((slightly_off - 9.0).abs() < 1e-2);

        // On screen, a million units from the pursuer
        let far_on_screen = badness_score(&cam, Vec2::ZERO, Vec2::new(1_000_000.0, 0.0));
        assert!(far_on_screen < slightly_off);
    }

    #[test]
    fn test_badness_weight_is_finite() {
        let cam = camera();
        let a = badness_score(&cam, Vec2::new(10.2, 0.0), Vec2::new(9.2, 0.0));
        // Twice the overflow but 100 units from the pursuer: 20 - 100 beats 10 - 1.
        // Known limitation of a finite weight, not a bug.
        let b = badness_score(&cam, Vec2::new(10.4, 0.0), Vec2::new(-89.6, 0.0));
        assert!(b < a);
    }

    #[test]
    fn test_hop_interpolation_endpoints() {
        let cam = camera();
        let mut events = Vec::new();
        let pursuer = StubPursuer::at(Vec2::new(-20.0, 0.0));
        let mut e = Evader::new(Vec2::ZERO, EvaderTuning::default());
        e.state = EvaderState::Hop;
        e.hop_start_time = 1.0;
        e.hop_start_position = Vec2::new(0.5, 0.5);
        e.hop_end_position = Vec2::new(1.8, 0.5);

        e.tick(&pursuer, &cam, 1.0, &mut events);
        assert_eq!(e.position, Vec2::new(0.5, 0.5));
        assert_eq!(e.state, EvaderState::Hop);

        // Late tick: weight is clamped, no overshoot
        e.tick(&pursuer, &cam, 1.5, &mut events);
        assert!((e.position - Vec2::new(1.8, 0.5)).length() < 1e-6);
        assert_eq!(e.state, EvaderState::Idle);
    }

    #[test]
    fn test_hop_first_tick_past_end_lands_on_end() {
        let cam = camera();
        let mut events = Vec::new();
        let pursuer = StubPursuer::at(Vec2::new(-20.0, 0.0));
        let mut e = Evader::new(Vec2::ZERO, EvaderTuning::default());
        e.state = EvaderState::Hop;
        e.hop_start_time = 0.0;
        e.hop_end_position = Vec2::new(1.3, 0.0);

        let mut now = 0.0;
        let mut last_x = 0.0;
        while e.state == EvaderState::Hop {
            now += SIM_DT;
            e.tick(&pursuer, &cam, now, &mut events);
            assert!(e.position.x >= last_x);
            assert!(e.position.x <= 1.3 + 1e-5);
            last_x = e.position.x;
            assert!(now < 1.0, "hop never finished");
        }
        assert_eq!(e.state, EvaderState::Idle);
        assert!((e.position - Vec2::new(1.3, 0.0)).length() < 1e-5);
        assert!(events.iter().any(|ev| matches!(ev, GameEvent::HopFinished { .. })));
    }

    #[test]
    fn test_overlap_catches_only_while_diving() {
        let mut events = Vec::new();
        let mut e = Evader::new(Vec2::new(2.0, 2.8), EvaderTuning::default());

        let mut pursuer = StubPursuer::at(Vec2::new(2.0, 3.0));
        assert!(!e.on_overlap(&pursuer, &mut events));
        assert_eq!(e.state, EvaderState::Idle);
        assert_eq!(e.position, Vec2::new(2.0, 2.8));
        assert!(events.is_empty());

        pursuer.diving = true;
        assert!(e.on_overlap(&pursuer, &mut events));
        assert_eq!(e.state, EvaderState::Caught);
        assert!((e.position - Vec2::new(2.0, 2.5)).length() < 1e-6);
        assert!(events.contains(&GameEvent::EvaderStateChanged {
            from: EvaderState::Idle,
            to: EvaderState::Caught,
        }));

        // Already caught: further overlaps are ignored
        assert!(!e.on_overlap(&pursuer, &mut events));
    }

    #[test]
    fn test_caught_follows_pursuer() {
        let cam = camera();
        let mut events = Vec::new();
        let mut e = Evader::new(Vec2::ZERO, EvaderTuning::default());
        let mut pursuer = StubPursuer {
            position: Vec2::ZERO,
            angle: 0.0,
            diving: true,
        };
        e.on_overlap(&pursuer, &mut events);

        pursuer.position = Vec2::new(5.0, 5.0);
        pursuer.angle = 90.0;
        pursuer.diving = false;
        e.tick(&pursuer, &cam, 1.0, &mut events);

        assert_eq!(e.state, EvaderState::Caught);
        assert!((e.position - Vec2::new(5.5, 5.0)).length() < 1e-5);
    }
}
