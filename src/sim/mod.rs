//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (autopilot)
//! - Fixed update order: pursuer, then evader, then overlap
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod camera;
pub mod collision;
pub mod evader;
pub mod pursuer;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use camera::{OrthoCamera, Projection};
pub use collision::{OverlapResult, circle_overlap};
pub use evader::{Evader, HopSearch, badness_score, is_on_screen, search_hop_destination};
pub use pursuer::{Pursuer, PursuerView};
pub use state::{EvaderState, GameEvent, PresentationSink, PursuerState};
pub use tick::{TickInput, World, tick};
