//! Data-driven tunables
//!
//! Every actor owns a copy of its tuning block; nothing here is global or
//! mutated by the simulation. Files are JSON and every field is optional.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default pursuer top speed (world units per tick)
pub const DEFAULT_MAX_SPEED: f32 = 0.10;
/// Slow speed as a fraction of max speed when not set explicitly
pub const SLOW_SPEED_RATIO: f32 = 0.66;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// What the pursuer does while in the Diving and Recovering states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DivePolicy {
    /// Timed lunge to the dive end point, then a timed recovery
    #[default]
    Animated,
    /// No per-tick update: the pursuer stays frozen once it dives
    Frozen,
}

/// Pursuer movement tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerTuning {
    /// Top speed (world units per tick)
    pub max_speed: f32,
    /// Speed requested for a mid-range pointer; also the MoveSlow/MoveFast threshold.
    /// Follows `max_speed * SLOW_SPEED_RATIO` when unset; read it through [`Self::slow_speed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow_speed: Option<f32>,
    /// Speed change per tick
    pub inc_speed: f32,
    /// Pointer distance ratio above which max speed is requested
    pub magnitude_fast: f32,
    /// Pointer distance ratio above which slow speed is requested
    pub magnitude_slow: f32,
    /// Rotation per tick while moving fast (degrees)
    pub fast_rotate_speed: f32,
    /// Half-width of the turn cone while moving fast (degrees)
    pub fast_rotate_max: f32,
    /// Dive duration (seconds)
    pub dive_time: f32,
    /// Recovery duration after a dive (seconds)
    pub dive_recovery_time: f32,
    /// Dive length (world units)
    pub dive_distance: f32,
    pub dive_policy: DivePolicy,
    /// Overlap radius used by the catch check
    pub radius: f32,
}

impl Default for PursuerTuning {
    fn default() -> Self {
        Self {
            max_speed: DEFAULT_MAX_SPEED,
            slow_speed: None,
            inc_speed: 0.0025,
            magnitude_fast: 0.6,
            magnitude_slow: 0.06,
            fast_rotate_speed: 0.2,
            fast_rotate_max: 10.0,
            dive_time: 0.3,
            dive_recovery_time: 0.5,
            dive_distance: 3.0,
            dive_policy: DivePolicy::Animated,
            radius: 0.5,
        }
    }
}

impl PursuerTuning {
    /// Effective slow speed threshold
    #[inline]
    pub fn slow_speed(&self) -> f32 {
        self.slow_speed.unwrap_or(self.max_speed * SLOW_SPEED_RATIO)
    }
}

/// Evader hopping tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaderTuning {
    /// Hop duration (seconds)
    pub hop_time: f32,
    /// Hop speed (world units per second); hop length is speed * time
    pub hop_speed: f32,
    /// Pursuer distance that triggers a hop
    pub scared_distance: f32,
    /// Directions tried when the straight-away hop leaves the screen
    pub max_move_attempts: u32,
    /// Local offset from the pursuer once caught
    pub caught_offset: Vec2,
    /// Overlap radius used by the catch check
    pub radius: f32,
}

impl Default for EvaderTuning {
    fn default() -> Self {
        Self {
            hop_time: 0.2,
            hop_speed: 6.5,
            scared_distance: 3.0,
            max_move_attempts: 50,
            caught_offset: Vec2::new(0.0, -0.5),
            radius: 0.5,
        }
    }
}

impl EvaderTuning {
    /// Distance covered by a single hop
    #[inline]
    pub fn hop_distance(&self) -> f32 {
        self.hop_speed * self.hop_time
    }
}

/// Complete tuning set for a chase session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Tuning {
    pub pursuer: PursuerTuning,
    pub evader: EvaderTuning,
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the state machines cannot make sense of
    pub fn validate(&self) -> Result<(), TuningError> {
        let p = &self.pursuer;
        let e = &self.evader;

        let non_negative = [
            ("pursuer.max_speed", p.max_speed),
            ("pursuer.slow_speed", p.slow_speed()),
            ("pursuer.inc_speed", p.inc_speed),
            ("pursuer.magnitude_fast", p.magnitude_fast),
            ("pursuer.magnitude_slow", p.magnitude_slow),
            ("pursuer.fast_rotate_speed", p.fast_rotate_speed),
            ("pursuer.fast_rotate_max", p.fast_rotate_max),
            ("pursuer.dive_time", p.dive_time),
            ("pursuer.dive_recovery_time", p.dive_recovery_time),
            ("pursuer.dive_distance", p.dive_distance),
            ("pursuer.radius", p.radius),
            ("evader.hop_time", e.hop_time),
            ("evader.hop_speed", e.hop_speed),
            ("evader.scared_distance", e.scared_distance),
            ("evader.radius", e.radius),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("expected a finite non-negative number, got {value}"),
                });
            }
        }

        if !e.caught_offset.is_finite() {
            return Err(TuningError::Invalid {
                field: "evader.caught_offset",
                reason: "expected finite components".to_string(),
            });
        }
        if p.slow_speed() > p.max_speed {
            return Err(TuningError::Invalid {
                field: "pursuer.slow_speed",
                reason: format!("{} exceeds max_speed {}", p.slow_speed(), p.max_speed),
            });
        }
        if p.magnitude_slow > p.magnitude_fast {
            return Err(TuningError::Invalid {
                field: "pursuer.magnitude_slow",
                reason: format!(
                    "{} exceeds magnitude_fast {}",
                    p.magnitude_slow, p.magnitude_fast
                ),
            });
        }
        Ok(())
    }
}
