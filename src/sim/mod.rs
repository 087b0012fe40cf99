//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only, drawn in a fixed order
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering, storage or platform dependencies

pub mod chaos;
pub mod collision;
pub mod disruption;
pub mod input;
pub mod projection;
pub mod state;
pub mod tick;
pub mod track;

#[cfg(test)]
pub(crate) mod testing;

pub use chaos::ChaosState;
pub use collision::{CollisionJudge, Outcome};
pub use disruption::{DisruptionEvent, TickRolls};
pub use input::{Direction, InputArbiter, Resolution};
pub use projection::{Projection, Projector, Sprite};
pub use state::{
    GameEvent, GameSession, PlayerState, ScoreState, SessionConfig, SessionPhase, SessionSummary,
};
pub use tick::{TickInput, autopilot_press, tick};
pub use track::{AdvanceReport, Obstacle, ObstacleKind, TrackSimulator};
