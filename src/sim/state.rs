//! Session state and core simulation types
//!
//! A `GameSession` owns everything one run mutates: chaos, player, score,
//! the track and the seeded RNG. Nothing outside the simulation touches
//! these directly; input goes through [`GameSession::press`] and time
//! through [`super::tick`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chaos::ChaosState;
use super::collision::CollisionJudge;
use super::disruption::DisruptionEvent;
use super::input::{Direction, InputArbiter, Resolution};
use super::projection::Projector;
use super::track::TrackSimulator;
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};
use crate::{clamp_lane, flavor};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Built but not started
    Init,
    /// Active gameplay
    Running,
    /// Player died; gameplay state is frozen
    Dead,
}

/// Parameters chosen on the title screen
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Chaos at the start of the run, in `[0, 1]`
    pub starting_chaos: f32,
    /// Starts at half chaos at least and lets chaos climb to 1.0
    pub streamer_mode: bool,
}

impl SessionConfig {
    /// Starting chaos after clamping and streamer-mode adjustment
    pub fn effective_starting_chaos(&self) -> f32 {
        let chaos = if self.starting_chaos.is_nan() {
            0.0
        } else {
            self.starting_chaos.clamp(0.0, 1.0)
        };
        if self.streamer_mode {
            chaos.max(STREAMER_MIN_CHAOS)
        } else {
            chaos
        }
    }
}

/// The player's avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub lane: u8,
    pub alive: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            lane: START_LANE,
            alive: true,
        }
    }
}

impl PlayerState {
    /// Move one lane, stopping at the edges
    pub fn shift(&mut self, dir: Direction) {
        self.lane = clamp_lane(i32::from(self.lane) + dir.delta());
    }
}

/// Current run score and the best on record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreState {
    pub current: u32,
    pub best: u32,
}

impl ScoreState {
    /// Raise the current score; it never goes down
    pub fn raise_to(&mut self, score: u32) {
        self.current = self.current.max(score);
    }

    /// Fold the current score into the best
    pub fn checkpoint(&mut self) {
        self.best = self.best.max(self.current);
    }
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// A press was swallowed ("Input ignored 🙂")
    InputIgnored,
    /// A press moved the player; `reversed` if chaos flipped it
    Moved { lane: u8, reversed: bool },
    /// A decoy was touched ("FAKE OUT 👻")
    DecoyPopped { id: u32 },
    /// A scheduled disruption, with text for the ones that show some
    Disruption {
        event: DisruptionEvent,
        caption: Option<String>,
    },
    /// "Helping you 😇" - input is locked for a moment
    AutoPlay,
    /// "ERROR: PLAYER SKILL NOT FOUND" - input is locked for a moment
    FakeCrash,
    CameraShake,
    Died { reason: String },
}

/// Payload handed to the death screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub reason: String,
    pub score: u32,
    pub high_score: u32,
    pub insult: String,
    pub achievement: Option<String>,
}

/// One run of the game
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) tuning: Tuning,
    pub(crate) config: SessionConfig,
    pub(crate) phase: SessionPhase,
    /// Session clock (ms), advanced only by ticks
    pub(crate) clock_ms: f64,
    pub(crate) chaos: ChaosState,
    pub(crate) arbiter: InputArbiter,
    pub(crate) track: TrackSimulator,
    pub(crate) judge: CollisionJudge,
    pub(crate) projector: Projector,
    pub(crate) player: PlayerState,
    pub(crate) score: ScoreState,
    /// Track motion is suspended until this clock time (fake lag)
    pub(crate) frozen_until: Option<f64>,
    /// Drunk-camera roll target for this tick
    pub(crate) camera_tilt: f32,
    pub(crate) avatar: &'static str,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) summary: Option<SessionSummary>,
}

impl GameSession {
    /// Create a session in the `Init` phase. `high_score` is the best score
    /// read from storage, if any. Fails if `tuning` doesn't validate.
    pub fn new(
        seed: u64,
        config: SessionConfig,
        tuning: Tuning,
        high_score: u32,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            chaos: ChaosState::new(tuning.chaos_cap, tuning.chaos_growth_per_ms),
            arbiter: InputArbiter::new(),
            track: TrackSimulator::new(&tuning),
            judge: CollisionJudge::new(tuning.collision_tolerance),
            projector: Projector::from_tuning(&tuning),
            tuning,
            config,
            phase: SessionPhase::Init,
            clock_ms: 0.0,
            player: PlayerState::default(),
            score: ScoreState {
                current: 0,
                best: high_score,
            },
            frozen_until: None,
            camera_tilt: 0.0,
            avatar: "🤡",
            events: Vec::new(),
            summary: None,
        })
    }

    /// `Init -> Running`. Seeds starting chaos, picks an avatar and puts the
    /// first obstacle on the track. Returns false if already started.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::Init {
            return false;
        }

        if self.config.streamer_mode {
            self.chaos.raise_cap(STREAMER_CHAOS_CAP);
        }
        self.chaos.set_level(self.config.effective_starting_chaos());
        self.avatar = flavor::avatar(&mut self.rng);
        self.track.spawn(&self.tuning, &mut self.rng);
        self.phase = SessionPhase::Running;

        log::info!(
            "Session {} started (chaos {:.2}, cap {:.2}, streamer mode {})",
            self.seed,
            self.chaos.level(),
            self.chaos.cap(),
            self.config.streamer_mode
        );
        true
    }

    /// A raw directional press. Resolved immediately against the current
    /// chaos; ignored outright unless the session is running.
    pub fn press(&mut self, dir: Direction) -> Resolution {
        if self.phase != SessionPhase::Running {
            return Resolution::Ignored;
        }

        let resolution = self
            .arbiter
            .resolve(dir, self.chaos.level(), self.clock_ms, &mut self.rng);
        match resolution {
            Resolution::Ignored => self.events.push(GameEvent::InputIgnored),
            Resolution::Reversed(applied) | Resolution::Passed(applied) => {
                self.player.shift(applied);
                self.events.push(GameEvent::Moved {
                    lane: self.player.lane,
                    reversed: matches!(resolution, Resolution::Reversed(_)),
                });
            }
        }
        resolution
    }

    /// Press from a raw lane delta. Anything but `-1`/`+1` is rejected.
    pub fn press_delta(&mut self, delta: i32) -> Option<Resolution> {
        let Some(dir) = Direction::from_delta(delta) else {
            log::debug!("Rejected lane delta {}", delta);
            return None;
        };
        Some(self.press(dir))
    }

    /// `Running -> Dead`. Only the first call has any effect.
    pub(crate) fn die(&mut self, reason: String) {
        if self.phase != SessionPhase::Running {
            return;
        }
        self.phase = SessionPhase::Dead;
        self.player.alive = false;
        self.score.checkpoint();

        let summary = SessionSummary {
            reason: reason.clone(),
            score: self.score.current,
            high_score: self.score.best,
            insult: flavor::insult(&mut self.rng).to_string(),
            achievement: flavor::achievement(&mut self.rng).map(str::to_string),
        };
        log::info!(
            "Session {} over: {} (score {}, best {})",
            self.seed,
            reason,
            summary.score,
            summary.high_score
        );
        self.summary = Some(summary);
        self.events.push(GameEvent::Died { reason });
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn chaos(&self) -> f32 {
        self.chaos.level()
    }

    pub fn chaos_cap(&self) -> f32 {
        self.chaos.cap()
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn player(&self) -> PlayerState {
        self.player
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    pub fn track(&self) -> &TrackSimulator {
        &self.track
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn camera_tilt(&self) -> f32 {
        self.camera_tilt
    }

    pub fn avatar(&self) -> &'static str {
        self.avatar
    }

    pub fn input_locked(&self) -> bool {
        self.arbiter.is_locked(self.clock_ms)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_until.is_some_and(|deadline| self.clock_ms < deadline)
    }

    /// Death-screen payload, once the run is over
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }
}
