//! The track: distance travelled, obstacle spawning, advance and culling
//!
//! Obstacles carry their depth relative to the camera plane. Each step the
//! camera moves forward by `speed * dt`, which pulls every obstacle that
//! much closer. Depths only ever shrink; an obstacle that falls far enough
//! behind the camera is dropped and never comes back.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::LANE_COUNT;
use crate::flavor;
use crate::tuning::Tuning;

/// Whether touching an obstacle ends the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Deadly,
    /// Harmless bait that pops on contact
    Decoy,
}

/// Something in a lane, approaching the player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: u8,
    /// Distance in front of the camera plane (negative once passed)
    pub depth: f32,
    pub kind: ObstacleKind,
    /// Cleared once a decoy has been popped so it can't trigger again
    pub active: bool,
    /// What the presentation draws for it
    pub glyph: &'static str,
}

/// Obstacle field and forward motion
#[derive(Debug, Clone, Serialize)]
pub struct TrackSimulator {
    /// Total distance travelled by the camera
    pub position: f32,
    /// Current speed in track units per ms
    pub speed: f32,
    /// Live obstacles in spawn order (newest last)
    pub obstacles: Vec<Obstacle>,
    next_id: u32,
}

/// What happened to the obstacle field during one advance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvanceReport {
    /// Distance travelled this step
    pub travelled: f32,
    pub spawned: Vec<u32>,
    pub culled: Vec<u32>,
}

impl TrackSimulator {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position: 0.0,
            speed: tuning.base_speed,
            obstacles: Vec::new(),
            next_id: 1,
        }
    }

    /// Move the camera forward by `dt_ms`, ramp speed, then spawn and cull
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f32,
        chaos: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> AdvanceReport {
        let dt_ms = dt_ms.max(0.0);
        let travelled = self.speed * dt_ms * tuning.distance_scale;

        self.position += travelled;
        for obstacle in &mut self.obstacles {
            obstacle.depth -= travelled;
        }

        self.speed = (self.speed + tuning.speed_ramp_per_ms * dt_ms).min(tuning.max_speed);

        let mut report = AdvanceReport {
            travelled,
            ..Default::default()
        };

        if self.spawn_due(chaos, tuning, rng) {
            report.spawned.push(self.spawn(tuning, rng));
        }
        report.culled = self.cull(tuning);

        report
    }

    /// Spawn cadence: always when the field is empty, always once the newest
    /// obstacle is `max_spawn_gap` in, and with a chaos-scaled chance per
    /// tick once it is `min_spawn_gap` in.
    fn spawn_due<R: Rng + ?Sized>(&self, chaos: f32, tuning: &Tuning, rng: &mut R) -> bool {
        let Some(newest) = self.obstacles.last() else {
            return true;
        };

        let gap = tuning.draw_distance - newest.depth;
        if gap >= tuning.max_spawn_gap {
            return true;
        }
        if gap < tuning.min_spawn_gap {
            return false;
        }

        let chance = tuning.spawn_chance_base + tuning.spawn_chance_per_chaos * chaos;
        rng.random::<f32>() < chance
    }

    /// Put a new obstacle at the draw boundary in a random lane. Returns its id.
    pub fn spawn<R: Rng + ?Sized>(&mut self, tuning: &Tuning, rng: &mut R) -> u32 {
        let lane = rng.random_range(0..LANE_COUNT);
        let kind = if rng.random::<f32>() < tuning.decoy_chance {
            ObstacleKind::Decoy
        } else {
            ObstacleKind::Deadly
        };

        let id = self.next_id;
        self.next_id += 1;

        self.obstacles.push(Obstacle {
            id,
            lane,
            depth: tuning.draw_distance,
            kind,
            active: true,
            glyph: flavor::obstacle_glyph(kind, rng),
        });
        log::debug!("Spawned {:?} #{} in lane {}", kind, id, lane);

        id
    }

    /// Drop obstacles that have fallen more than `cull_margin` behind the camera
    pub fn cull(&mut self, tuning: &Tuning) -> Vec<u32> {
        let mut culled = Vec::new();
        self.obstacles.retain(|o| {
            let keep = o.depth >= -tuning.cull_margin;
            if !keep {
                culled.push(o.id);
            }
            keep
        });
        culled
    }

    /// Remove an obstacle consumed by a collision
    pub fn remove(&mut self, id: u32) -> Option<Obstacle> {
        let idx = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.remove(idx))
    }
}
