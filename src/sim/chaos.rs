//! The chaos scalar
//!
//! Chaos grows linearly with play time and is read by every sabotage system.
//! It never decreases during a session; randomness lives in the consumers.

use serde::{Deserialize, Serialize};

/// Session-wide sabotage intensity, always within `[0, cap]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChaosState {
    level: f32,
    cap: f32,
    growth_rate: f32,
}

impl ChaosState {
    /// `growth_rate` is chaos per millisecond
    pub fn new(cap: f32, growth_rate: f32) -> Self {
        Self {
            level: 0.0,
            cap: cap.max(0.0),
            growth_rate: growth_rate.max(0.0),
        }
    }

    /// Seed a starting level at session init, clamped into `[0, cap]`
    pub fn set_level(&mut self, level: f32) {
        self.level = if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, self.cap)
        };
    }

    /// Raise the ceiling (streamer mode). The cap never drops below the current level.
    pub fn raise_cap(&mut self, cap: f32) {
        self.cap = self.cap.max(cap);
    }

    /// Grow by `dt_ms * growth_rate`, saturating at the cap
    pub fn update(&mut self, dt_ms: f32) {
        let dt_ms = dt_ms.max(0.0);
        self.level = (self.level + dt_ms * self.growth_rate).min(self.cap);
    }

    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    #[inline]
    pub fn cap(&self) -> f32 {
        self.cap
    }
}
