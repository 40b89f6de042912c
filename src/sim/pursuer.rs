//! Player-controlled pursuer
//!
//! Four-state movement model. MoveSlow snaps to the pointer direction and
//! accelerates; once the speed reaches the slow threshold the pursuer switches
//! to MoveFast, where it can only turn gradually inside a narrow cone and bleeds
//! speed when asked to turn harder. Holding the trigger while moving starts a
//! dive, the only way to catch the evader.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Projection;
use super::state::{GameEvent, PursuerState};
use super::tick::TickInput;
use crate::tuning::{DivePolicy, PursuerTuning};
use crate::{
    delta_angle, facing_right, heading_degrees, move_towards, move_towards_angle, progress,
    wrap_degrees,
};

/// Read-only view of the pursuer handed to the evader each tick
pub trait PursuerView {
    fn position(&self) -> Vec2;
    /// Facing angle in degrees
    fn angle(&self) -> f32;
    fn is_diving(&self) -> bool;
}

/// The player's actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub position: Vec2,
    /// Facing angle (degrees); the pursuer travels along -right
    pub angle: f32,
    /// Current speed (world units per tick)
    pub speed: f32,
    pub target_speed: f32,
    pub target_angle: f32,
    pub state: PursuerState,
    pub dive_start_position: Vec2,
    pub dive_end_position: Vec2,
    pub dive_start_time: f32,
    pub recovery_start_time: f32,
    pub tuning: PursuerTuning,
}

impl Pursuer {
    pub fn new(position: Vec2, tuning: PursuerTuning) -> Self {
        Self {
            position,
            angle: 0.0,
            speed: 0.0,
            target_speed: 0.0,
            target_angle: 0.0,
            state: PursuerState::MoveSlow,
            dive_start_position: position,
            dive_end_position: position,
            dive_start_time: 0.0,
            recovery_start_time: 0.0,
            tuning,
        }
    }

    #[inline]
    pub fn is_diving(&self) -> bool {
        self.state == PursuerState::Diving
    }

    /// Advance one fixed tick. `now` is the simulation time in seconds.
    pub fn tick<P: Projection + ?Sized>(
        &mut self,
        input: &TickInput,
        projection: &P,
        now: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let before = self.state;

        match self.state {
            PursuerState::MoveSlow => self.handle_move_slow(input, projection, now, events),
            PursuerState::MoveFast => self.handle_move_fast(input, projection, now, events),
            PursuerState::Diving => self.handle_diving(now, events),
            PursuerState::Recovering => self.handle_recovering(now),
        }

        if self.state != before {
            log::debug!("pursuer {} -> {}", before.as_str(), self.state.as_str());
            events.push(GameEvent::PursuerStateChanged {
                from: before,
                to: self.state,
            });
        }
    }

    /// Derive the requested heading and speed from the pointer position
    fn update_direction_and_speed<P: Projection + ?Sized>(
        &mut self,
        pointer: Vec2,
        projection: &P,
    ) {
        let offset = self.position - pointer;
        self.target_angle = heading_degrees(offset);

        let extent = projection.screen_extent();
        let ratio = if extent > f32::EPSILON {
            offset.length() / extent
        } else {
            0.0
        };

        self.target_speed = if ratio > self.tuning.magnitude_fast {
            self.tuning.max_speed
        } else if ratio > self.tuning.magnitude_slow {
            self.tuning.slow_speed()
        } else {
            0.0
        };
    }

    /// Start a dive if the trigger is held. Returns true when a dive began.
    fn check_for_dive(&mut self, trigger: bool, now: f32, events: &mut Vec<GameEvent>) -> bool {
        if !trigger || matches!(self.state, PursuerState::Diving | PursuerState::Recovering) {
            return false;
        }

        self.state = PursuerState::Diving;
        self.speed = 0.0;
        self.dive_start_position = self.position;
        self.dive_end_position =
            self.position - facing_right(self.angle) * self.tuning.dive_distance;
        self.dive_start_time = now;

        events.push(GameEvent::DiveStarted {
            from: self.dive_start_position,
            to: self.dive_end_position,
        });
        true
    }

    fn handle_move_slow<P: Projection + ?Sized>(
        &mut self,
        input: &TickInput,
        projection: &P,
        now: f32,
        events: &mut Vec<GameEvent>,
    ) {
        self.update_direction_and_speed(input.pointer, projection);
        if self.check_for_dive(input.trigger, now, events) {
            return;
        }

        // Instant turn
        self.angle = self.target_angle;
        self.speed = move_towards(self.speed, self.target_speed, self.tuning.inc_speed);
        self.apply_motion();

        if self.speed >= self.tuning.slow_speed() {
            self.state = PursuerState::MoveFast;
        }
    }

    fn handle_move_fast<P: Projection + ?Sized>(
        &mut self,
        input: &TickInput,
        projection: &P,
        now: f32,
        events: &mut Vec<GameEvent>,
    ) {
        self.update_direction_and_speed(input.pointer, projection);
        if self.check_for_dive(input.trigger, now, events) {
            return;
        }

        let diff = delta_angle(self.angle, self.target_angle);
        if diff.abs() <= self.tuning.fast_rotate_max {
            self.angle =
                move_towards_angle(self.angle, self.target_angle, self.tuning.fast_rotate_speed);
            self.speed = move_towards(self.speed, self.target_speed, self.tuning.inc_speed);
        } else {
            // Outside the turn cone: hold heading and slow down
            self.speed = move_towards(self.speed, 0.0, self.tuning.inc_speed);
        }
        self.apply_motion();

        if self.speed < self.tuning.slow_speed() {
            self.state = PursuerState::MoveSlow;
        }
    }

    fn handle_diving(&mut self, now: f32, events: &mut Vec<GameEvent>) {
        if self.tuning.dive_policy == DivePolicy::Frozen {
            return;
        }

        let t = progress(now - self.dive_start_time, self.tuning.dive_time);
        self.position = self
            .dive_start_position
            .lerp(self.dive_end_position, t.clamp(0.0, 1.0));
        self.speed = 0.0;

        if t >= 1.0 {
            self.state = PursuerState::Recovering;
            self.recovery_start_time = now;
            events.push(GameEvent::DiveFinished { at: self.position });
        }
    }

    fn handle_recovering(&mut self, now: f32) {
        if self.tuning.dive_policy == DivePolicy::Frozen {
            return;
        }

        self.speed = 0.0;
        if now - self.recovery_start_time >= self.tuning.dive_recovery_time {
            self.state = PursuerState::MoveSlow;
        }
    }

    /// Clamp speed, then move along -right at the current heading
    fn apply_motion(&mut self) {
        self.speed = self.speed.clamp(0.0, self.tuning.max_speed);
        self.angle = wrap_degrees(self.angle);
        self.position += -facing_right(self.angle) * self.speed;
    }
}

impl PursuerView for Pursuer {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn angle(&self) -> f32 {
        self.angle
    }

    fn is_diving(&self) -> bool {
        Pursuer::is_diving(self)
    }
}
