//! Collision detection between the player and the obstacle field
//!
//! The player occupies one lane at a fixed depth. An obstacle touches the
//! player while its depth is within the tolerance window around that depth
//! and it shares the player's lane.

use serde::{Deserialize, Serialize};

use super::track::{Obstacle, ObstacleKind};

/// Result of a collision check
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    None,
    /// A decoy was popped; it is now inactive
    DecoyHit(u32),
    /// A deadly obstacle reached the player
    LethalHit(Obstacle),
}

/// Decides what the player ran into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionJudge {
    /// Half-depth of the contact window
    pub tolerance: f32,
}

impl CollisionJudge {
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    #[inline]
    fn touches(&self, obstacle: &Obstacle, player_lane: u8, player_depth: f32) -> bool {
        obstacle.active
            && obstacle.lane == player_lane
            && (obstacle.depth - player_depth).abs() <= self.tolerance
    }

    /// Check the player against every obstacle.
    ///
    /// A lethal hit wins over any decoy in the same pass and ends the scan at
    /// the first one found. Decoys hit in a pass without a lethal hit are
    /// deactivated; the first one is reported.
    pub fn check(&self, player_lane: u8, player_depth: f32, obstacles: &mut [Obstacle]) -> Outcome {
        if let Some(lethal) = obstacles.iter().find(|o| {
            o.kind == ObstacleKind::Deadly && self.touches(o, player_lane, player_depth)
        }) {
            return Outcome::LethalHit(lethal.clone());
        }

        let mut popped = None;
        for obstacle in obstacles.iter_mut() {
            if obstacle.kind == ObstacleKind::Decoy && self.touches(obstacle, player_lane, player_depth) {
                obstacle.active = false;
                popped.get_or_insert(obstacle.id);
            }
        }

        popped.map_or(Outcome::None, Outcome::DecoyHit)
    }
}
