//! Actor states, simulation events and the presentation seam

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Pursuer movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PursuerState {
    /// Instant turning, accelerating up to the slow threshold
    #[default]
    MoveSlow,
    /// Limited turn cone, gradual rotation
    MoveFast,
    /// Lunging toward the dive end point
    Diving,
    /// Stationary cool-down after a dive
    Recovering,
}

impl PursuerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PursuerState::MoveSlow => "MoveSlow",
            PursuerState::MoveFast => "MoveFast",
            PursuerState::Diving => "Diving",
            PursuerState::Recovering => "Recovering",
        }
    }

    /// Debug color for this state (RGB)
    pub fn color(&self) -> [u8; 3] {
        match self {
            PursuerState::MoveSlow => [0, 0, 0],
            PursuerState::MoveFast => [255, 255, 255],
            PursuerState::Diving => [0, 0, 255],
            PursuerState::Recovering => [0, 255, 0],
        }
    }
}

/// Evader behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EvaderState {
    /// Waiting; watches the pursuer distance
    #[default]
    Idle,
    /// Choosing a hop destination (lasts one tick)
    HopStart,
    /// Travelling between the hop start and end points
    Hop,
    /// Attached to the pursuer (terminal)
    Caught,
}

impl EvaderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaderState::Idle => "Idle",
            EvaderState::HopStart => "HopStart",
            EvaderState::Hop => "Hop",
            EvaderState::Caught => "Caught",
        }
    }

    /// Debug color for this state (RGB)
    pub fn color(&self) -> [u8; 3] {
        match self {
            EvaderState::Idle => [255, 0, 0],
            EvaderState::HopStart => [0, 255, 0],
            EvaderState::Hop => [0, 0, 255],
            EvaderState::Caught => [255, 255, 255],
        }
    }
}

/// Notable things that happened during a tick (drained by the caller)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PursuerStateChanged { from: PursuerState, to: PursuerState },
    EvaderStateChanged { from: EvaderState, to: EvaderState },
    DiveStarted { from: Vec2, to: Vec2 },
    DiveFinished { at: Vec2 },
    /// Hop destination chosen; `on_screen` is false when the search fell back
    /// to the best-scored candidate
    HopStarted { from: Vec2, to: Vec2, on_screen: bool },
    HopFinished { at: Vec2 },
    Caught { at: Vec2 },
}

/// Receives each actor's state once per tick (e.g. to recolor sprites)
pub trait PresentationSink {
    fn present_pursuer(&mut self, state: PursuerState);
    fn present_evader(&mut self, state: EvaderState);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_colors_are_distinct() {
        let pursuer = [
            PursuerState::MoveSlow,
            PursuerState::MoveFast,
            PursuerState::Diving,
            PursuerState::Recovering,
        ];
        for (i, a) in pursuer.iter().enumerate() {
            for b in &pursuer[i + 1..] {
                assert_ne!(a.color(), b.color(), "{} vs {}", a.as_str(), b.as_str());
            }
        }
        assert_eq!(EvaderState::Caught.color(), [255, 255, 255]);
        assert_eq!(EvaderState::default(), EvaderState::Idle);
        assert_eq!(PursuerState::default(), PursuerState::MoveSlow);
    }
}
