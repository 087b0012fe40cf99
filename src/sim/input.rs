//! Input arbitration
//!
//! Every directional press passes through the arbiter, which may swallow it,
//! flip it, or let it through depending on chaos. A timed lock swallows
//! everything until its deadline.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Base chance that a press is ignored, before chaos
pub const IGNORE_BASE: f32 = 0.04;
/// Base chance that a press is reversed, before chaos
pub const REVERSE_BASE: f32 = 0.04;
/// Reverse chance gained per unit of chaos
pub const REVERSE_PER_CHAOS: f32 = 0.8;

/// A discrete lane-change press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Lane delta for this direction
    #[inline]
    pub fn delta(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    /// Only `-1` and `+1` are directions; anything else is rejected
    pub fn from_delta(delta: i32) -> Option<Self> {
        match delta {
            -1 => Some(Direction::Left),
            1 => Some(Direction::Right),
            _ => None,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// What the arbiter did with a press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Dropped: chaos roll or lock
    Ignored,
    /// Flipped to the opposite direction
    Reversed(Direction),
    /// Passed through unchanged
    Passed(Direction),
}

impl Resolution {
    /// The direction that actually reaches the player, if any
    pub fn direction(self) -> Option<Direction> {
        match self {
            Resolution::Ignored => None,
            Resolution::Reversed(dir) | Resolution::Passed(dir) => Some(dir),
        }
    }
}

/// Decides the fate of each press
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputArbiter {
    /// Session clock time (ms) until which all input is swallowed
    locked_until: Option<f64>,
}

impl InputArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swallow all input for `duration_ms` from `now_ms`.
    /// Locks don't stack: the deadline is simply reset.
    pub fn lock(&mut self, duration_ms: f32, now_ms: f64) {
        self.locked_until = Some(now_ms + f64::from(duration_ms.max(0.0)));
    }

    pub fn is_locked(&self, now_ms: f64) -> bool {
        self.locked_until.is_some_and(|deadline| now_ms < deadline)
    }

    /// Resolve one press against the current chaos level.
    ///
    /// A single uniform sample decides both thresholds, so the ignore and
    /// reverse outcomes are mutually exclusive and occur with probability
    /// `0.04 + chaos` and `0.04 + 0.8 * chaos` respectively. No sample is
    /// drawn while locked.
    pub fn resolve<R: Rng + ?Sized>(
        &mut self,
        raw: Direction,
        chaos: f32,
        now_ms: f64,
        rng: &mut R,
    ) -> Resolution {
        if self.is_locked(now_ms) {
            return Resolution::Ignored;
        }
        // Stale deadline
        self.locked_until = None;

        let r: f32 = rng.random();
        let ignore_chance = IGNORE_BASE + chaos;
        let reverse_chance = REVERSE_BASE + REVERSE_PER_CHAOS * chaos;

        if r < ignore_chance {
            Resolution::Ignored
        } else if r < ignore_chance + reverse_chance {
            Resolution::Reversed(raw.reversed())
        } else {
            Resolution::Passed(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::ScriptedRng;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_from_delta_rejects_non_binary() {
        assert_eq!(Direction::from_delta(-1), Some(Direction::Left));
        assert_eq!(Direction::from_delta(1), Some(Direction::Right));
        assert_eq!(Direction::from_delta(0), None);
        assert_eq!(Direction::from_delta(2), None);
        assert_eq!(Direction::from_delta(-7), None);
    }

    #[test]
    fn test_threshold_bands_at_zero_chaos() {
        // ignore < 0.04, reverse < 0.08, else pass
        let mut arbiter = InputArbiter::new();
        let mut rng = ScriptedRng::new(&[0.01, 0.06, 0.5]);
        assert_eq!(
            arbiter.resolve(Direction::Left, 0.0, 0.0, &mut rng),
            Resolution::Ignored
        );
        assert_eq!(
            arbiter.resolve(Direction::Left, 0.0, 0.0, &mut rng),
            Resolution::Reversed(Direction::Right)
        );
        assert_eq!(
            arbiter.resolve(Direction::Left, 0.0, 0.0, &mut rng),
            Resolution::Passed(Direction::Left)
        );
        assert_eq!(rng.draws, 3);
    }

    #[test]
    fn test_threshold_bands_at_high_chaos() {
        // chaos 0.3: ignore < 0.34, reverse < 0.34 + 0.28 = 0.62
        let mut arbiter = InputArbiter::new();
        let mut rng = ScriptedRng::new(&[0.33, 0.35, 0.61, 0.63]);
        let outcomes: Vec<_> = (0..4)
            .map(|_| arbiter.resolve(Direction::Right, 0.3, 0.0, &mut rng))
            .collect();
        assert_eq!(
            outcomes,
            vec![
                Resolution::Ignored,
                Resolution::Reversed(Direction::Left),
                Resolution::Reversed(Direction::Left),
                Resolution::Passed(Direction::Right),
            ]
        );
    }

    #[test]
    fn test_full_chaos_ignores_everything() {
        let mut arbiter = InputArbiter::new();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            assert_eq!(
                arbiter.resolve(Direction::Right, 1.0, 0.0, &mut rng),
                Resolution::Ignored
            );
        }
    }

    #[test]
    fn test_empirical_partition_converges() {
        let chaos = 0.2;
        let trials = 200_000;
        let mut arbiter = InputArbiter::new();
        let mut rng = Pcg32::seed_from_u64(0xC4A05);
        let (mut ignored, mut reversed, mut passed) = (0u32, 0u32, 0u32);
        for _ in 0..trials {
            match arbiter.resolve(Direction::Left, chaos, 0.0, &mut rng) {
                Resolution::Ignored => ignored += 1,
                Resolution::Reversed(dir) => {
                    assert_eq!(dir, Direction::Right);
                    reversed += 1;
                }
                Resolution::Passed(dir) => {
                    assert_eq!(dir, Direction::Left);
                    passed += 1;
                }
            }
        }
        assert_eq!(ignored + reversed + passed, trials);
        let frac = |n: u32| n as f32 / trials as f32;
        assert!((frac(ignored) - 0.24).abs() < 0.01);
        assert!((frac(reversed) - 0.20).abs() < 0.01);
        assert!((frac(passed) - 0.56).abs() < 0.01);
    }

    #[test]
    fn test_lock_swallows_without_drawing() {
        let mut arbiter = InputArbiter::new();
        let mut rng = ScriptedRng::new(&[0.9]);
        arbiter.lock(500.0, 1000.0);
        assert!(arbiter.is_locked(1200.0));
        assert_eq!(
            arbiter.resolve(Direction::Left, 0.0, 1200.0, &mut rng),
            Resolution::Ignored
        );
        assert_eq!(rng.draws, 0);

        // Deadline passed
        assert_eq!(
            arbiter.resolve(Direction::Left, 0.0, 1500.0, &mut rng),
            Resolution::Passed(Direction::Left)
        );
        assert_eq!(rng.draws, 1);
    }

    #[test]
    fn test_lock_resets_rather_than_stacks() {
        let mut arbiter = InputArbiter::new();
        arbiter.lock(1000.0, 0.0);
        arbiter.lock(100.0, 50.0);
        // Second lock replaced the first deadline
        assert!(arbiter.is_locked(149.0));
        assert!(!arbiter.is_locked(150.0));
    }
}
