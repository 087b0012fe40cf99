//! Data-driven game balance
//!
//! Every number that shapes a run lives here so a balance pass can be done
//! from a JSON file without touching the simulation. The defaults are the
//! shipped values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_STEP_MS;

/// Problems found while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("{low} ({low_value}) must not exceed {high} ({high_value})")]
    Inverted {
        low: &'static str,
        low_value: f32,
        high: &'static str,
        high_value: f32,
    },
    #[error("an obstacle can travel {travel} per step but the collision window is only {window} deep")]
    StepTooCoarse { travel: f32, window: f32 },
}

/// Balance values for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Chaos ===
    /// Chaos ceiling outside streamer mode
    pub chaos_cap: f32,
    /// Chaos gained per millisecond of play
    pub chaos_growth_per_ms: f32,

    // === Track ===
    /// Speed at session start (track units per ms)
    pub base_speed: f32,
    /// Hard speed cap
    pub max_speed: f32,
    /// Speed gained per millisecond
    pub speed_ramp_per_ms: f32,
    /// Multiplier applied to speed * dt when converting to distance
    pub distance_scale: f32,
    /// Depth at which new obstacles appear
    pub draw_distance: f32,
    /// How far behind the camera an obstacle may fall before it is dropped
    pub cull_margin: f32,
    /// Newest obstacle must be at least this far in before another may spawn
    pub min_spawn_gap: f32,
    /// Once the newest obstacle is this far in, the next spawn is forced
    pub max_spawn_gap: f32,
    /// Per-tick spawn chance once the minimum gap is open
    pub spawn_chance_base: f32,
    /// Extra per-tick spawn chance per unit of chaos
    pub spawn_chance_per_chaos: f32,
    /// Share of obstacles that are harmless decoys
    pub decoy_chance: f32,

    // === Camera ===
    pub focal_length: f32,
    pub camera_height: f32,
    /// Screen x of the track centre line
    pub center_x: f32,
    /// Screen y of the horizon
    pub horizon_y: f32,
    /// Lateral distance between lane centres
    pub lane_width: f32,
    /// Sprites projected larger than this are past the player and not drawn
    pub max_visible_scale: f32,

    // === Player / collision ===
    /// Depth of the player's avatar in front of the camera
    pub player_depth: f32,
    /// Half-depth of the window in which an obstacle touches the player
    pub collision_tolerance: f32,

    // === Timed effects (ms) ===
    pub fake_lag_min_ms: f32,
    pub fake_lag_max_ms: f32,
    pub fake_crash_lock_ms: f32,
    pub auto_play_lock_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            chaos_cap: 0.5,
            chaos_growth_per_ms: 0.000_015,

            base_speed: 0.6,
            max_speed: 1.5,
            speed_ramp_per_ms: 0.000_02,
            distance_scale: 1.0,
            draw_distance: 3000.0,
            cull_margin: 200.0,
            min_spawn_gap: 400.0,
            max_spawn_gap: 1200.0,
            spawn_chance_base: 0.02,
            spawn_chance_per_chaos: 0.08,
            decoy_chance: 0.2,

            focal_length: 300.0,
            camera_height: 120.0,
            center_x: 400.0,
            horizon_y: 300.0,
            lane_width: 150.0,
            max_visible_scale: 3.0,

            player_depth: 150.0,
            collision_tolerance: 40.0,

            fake_lag_min_ms: 200.0,
            fake_lag_max_ms: 800.0,
            fake_crash_lock_ms: 1000.0,
            auto_play_lock_ms: 500.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning file; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positives = [
            ("chaos_cap", self.chaos_cap),
            ("base_speed", self.base_speed),
            ("max_speed", self.max_speed),
            ("distance_scale", self.distance_scale),
            ("draw_distance", self.draw_distance),
            ("cull_margin", self.cull_margin),
            ("min_spawn_gap", self.min_spawn_gap),
            ("focal_length", self.focal_length),
            ("camera_height", self.camera_height),
            ("lane_width", self.lane_width),
            ("max_visible_scale", self.max_visible_scale),
            ("player_depth", self.player_depth),
            ("collision_tolerance", self.collision_tolerance),
        ];
        for (field, value) in positives {
            // NaN fails this comparison too
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let unit_ranges = [
            ("chaos_cap", self.chaos_cap),
            ("spawn_chance_base", self.spawn_chance_base),
            ("decoy_chance", self.decoy_chance),
        ];
        for (field, value) in unit_ranges {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::OutOfRange {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }

        let non_negative = [
            ("chaos_growth_per_ms", self.chaos_growth_per_ms),
            ("speed_ramp_per_ms", self.speed_ramp_per_ms),
            ("spawn_chance_per_chaos", self.spawn_chance_per_chaos),
            ("fake_lag_min_ms", self.fake_lag_min_ms),
            ("fake_crash_lock_ms", self.fake_crash_lock_ms),
            ("auto_play_lock_ms", self.auto_play_lock_ms),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TuningError::OutOfRange {
                    field,
                    min: 0.0,
                    max: f32::INFINITY,
                    value,
                });
            }
        }

        let ordered = [
            ("base_speed", self.base_speed, "max_speed", self.max_speed),
            ("min_spawn_gap", self.min_spawn_gap, "max_spawn_gap", self.max_spawn_gap),
            ("max_spawn_gap", self.max_spawn_gap, "draw_distance", self.draw_distance),
            ("player_depth", self.player_depth, "draw_distance", self.draw_distance),
            ("fake_lag_min_ms", self.fake_lag_min_ms, "fake_lag_max_ms", self.fake_lag_max_ms),
        ];
        for (low, low_value, high, high_value) in ordered {
            if low_value > high_value {
                return Err(TuningError::Inverted {
                    low,
                    low_value,
                    high,
                    high_value,
                });
            }
        }

        let travel = self.max_speed * self.distance_scale * MAX_STEP_MS;
        let window = self.collision_tolerance * 2.0;
        if travel > window {
            return Err(TuningError::StepTooCoarse { travel, window });
        }

        Ok(())
    }
}
