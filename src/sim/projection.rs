//! Pinhole projection from track space to the screen
//!
//! A point at lateral offset `x` and depth `z` in front of the camera lands at
//! `(center_x + x * s, horizon_y + camera_height * s)` with `s = focal / z`.
//! The same depth ordering drives back-to-front drawing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::track::Obstacle;
use crate::consts::DEPTH_EPSILON;
use crate::tuning::Tuning;

/// Screen position and sprite scale of a projected point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub pos: Vec2,
    pub scale: f32,
}

/// An obstacle ready to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub id: u32,
    pub glyph: &'static str,
    pub pos: Vec2,
    pub scale: f32,
    /// Decoys are drawn slightly see-through
    pub decoy: bool,
}

/// Camera model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projector {
    pub focal_length: f32,
    pub camera_height: f32,
    /// Screen x of the centre lane, screen y of the horizon
    pub center: Vec2,
    pub lane_width: f32,
    pub max_visible_scale: f32,
    pub player_depth: f32,
}

impl Projector {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            focal_length: tuning.focal_length,
            camera_height: tuning.camera_height,
            center: Vec2::new(tuning.center_x, tuning.horizon_y),
            lane_width: tuning.lane_width,
            max_visible_scale: tuning.max_visible_scale,
            player_depth: tuning.player_depth,
        }
    }

    /// Lateral offset of a lane centre from the track centre line
    #[inline]
    pub fn lane_offset(&self, lane: u8) -> f32 {
        (f32::from(lane) - 1.0) * self.lane_width
    }

    /// Project a track-space point. Depths at or behind the camera are
    /// clamped to a small epsilon so the scale stays finite.
    pub fn project(&self, lane_offset: f32, depth: f32) -> Projection {
        let depth = if depth.is_nan() { DEPTH_EPSILON } else { depth.max(DEPTH_EPSILON) };
        let scale = self.focal_length / depth;
        Projection {
            pos: Vec2::new(
                self.center.x + lane_offset * scale,
                self.center.y + self.camera_height * scale,
            ),
            scale,
        }
    }

    /// The player's avatar, always drawn at `player_depth`
    pub fn player(&self, lane: u8) -> Projection {
        self.project(self.lane_offset(lane), self.player_depth)
    }

    /// Visible obstacles, projected and sorted back to front
    pub fn render_list(&self, obstacles: &[Obstacle]) -> Vec<Sprite> {
        let mut visible: Vec<&Obstacle> = obstacles
            .iter()
            .filter(|o| o.active && o.depth > 0.0)
            .collect();
        visible.sort_by(|a, b| b.depth.total_cmp(&a.depth).then(a.id.cmp(&b.id)));

        visible
            .into_iter()
            .filter_map(|o| {
                let p = self.project(self.lane_offset(o.lane), o.depth);
                (p.scale <= self.max_visible_scale).then_some(Sprite {
                    id: o.id,
                    glyph: o.glyph,
                    pos: p.pos,
                    scale: p.scale,
                    decoy: o.kind == super::track::ObstacleKind::Decoy,
                })
            })
            .collect()
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}
