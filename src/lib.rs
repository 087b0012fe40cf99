//! You Are Not The Player - an endless runner that sabotages its own player
//!
//! Core modules:
//! - `sim`: Deterministic simulation (chaos, input arbitration, track, collisions)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (streamer mode, starting chaos)
//! - `persistence`: Key-value storage backends
//! - `highscores`: The single persisted high score
//! - `flavor`: Chat lines, insults and other comedic text

pub mod flavor;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{load_high_score, persist_high_score};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Number of lanes on the track
    pub const LANE_COUNT: u8 = 3;
    /// Lane the player starts in (middle)
    pub const START_LANE: u8 = 1;

    /// Largest frame delta accepted by a single tick (ms); longer gaps are clamped
    pub const MAX_FRAME_MS: f32 = 250.0;
    /// Track and collision sub-step size (ms) so fast obstacles can't tunnel
    pub const MAX_STEP_MS: f32 = 20.0;

    /// Distance travelled per point of score
    pub const SCORE_DISTANCE_UNIT: f32 = 100.0;

    /// Chaos below this never fires a disruption
    pub const DISRUPTION_FLOOR: f32 = 0.05;
    /// Chaos above this unlocks fake donations
    pub const DONATION_CHAOS: f32 = 0.4;
    /// Starting chaos forced by streamer mode
    pub const STREAMER_MIN_CHAOS: f32 = 0.5;
    /// Chaos cap in streamer mode
    pub const STREAMER_CHAOS_CAP: f32 = 1.0;

    /// Smallest depth the projector divides by
    pub const DEPTH_EPSILON: f32 = 1.0e-3;
}

/// Clamp a lane index into the track, treating anything past the edges as the edge
#[inline]
pub fn clamp_lane(lane: i32) -> u8 {
    lane.clamp(0, consts::LANE_COUNT as i32 - 1) as u8
}
