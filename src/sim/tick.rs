//! Simulation tick
//!
//! Core game loop that advances a session by one frame. Order is fixed:
//! presses, chaos, chaos rolls, then track, score and collision per sub-step.

use rand::Rng;

use super::collision::Outcome;
use super::disruption::{DisruptionEvent, TickRolls};
use super::input::Direction;
use super::state::{GameEvent, GameSession, SessionPhase};
use super::track::ObstacleKind;
use crate::consts::*;
use crate::flavor;

/// How far ahead of the player the autopilot looks for trouble
const AUTOPILOT_LOOKAHEAD: f32 = 600.0;

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional presses, oldest first
    pub presses: Vec<Direction>,
    /// Demo mode - a simple bot steers (its presses are sabotaged too)
    pub autopilot: bool,
}

/// Advance the session by `dt_ms` of wall time
pub fn tick(session: &mut GameSession, input: &TickInput, dt_ms: f32) {
    // Dead sessions are frozen; unstarted ones wait for start()
    if session.phase != SessionPhase::Running {
        return;
    }

    for &dir in &input.presses {
        session.press(dir);
    }
    if input.autopilot
        && let Some(dir) = autopilot_press(session)
    {
        session.press(dir);
    }

    let dt_ms = if dt_ms.is_nan() { 0.0 } else { dt_ms.clamp(0.0, MAX_FRAME_MS) };
    session.clock_ms += f64::from(dt_ms);

    // Fake lag hangs the whole game, chaos included
    if session.is_frozen() {
        return;
    }

    session.chaos.update(dt_ms);
    let chaos = session.chaos.level();

    let rolls = TickRolls::roll(chaos, &mut session.rng);
    apply_rolls(session, &rolls);

    if !session.is_frozen() {
        advance_track(session, dt_ms, chaos);
    }
}

/// Turn this tick's chaos rolls into timers and events
pub(crate) fn apply_rolls(session: &mut GameSession, rolls: &TickRolls) {
    let now = session.clock_ms;

    if rolls.auto_play {
        session.arbiter.lock(session.tuning.auto_play_lock_ms, now);
        session.events.push(GameEvent::AutoPlay);
    }

    if rolls.fake_crash {
        session.arbiter.lock(session.tuning.fake_crash_lock_ms, now);
        session.events.push(GameEvent::FakeCrash);
    }

    if rolls.disruption != DisruptionEvent::None {
        let caption = match rolls.disruption {
            DisruptionEvent::FakeChat => Some(flavor::chat_message(&mut session.rng).to_string()),
            DisruptionEvent::FakeDonation => Some(flavor::donation(&mut session.rng)),
            DisruptionEvent::FakeLag => {
                let lag = session
                    .rng
                    .random_range(session.tuning.fake_lag_min_ms..=session.tuning.fake_lag_max_ms);
                // The whole game "hangs": track stops and presses go nowhere
                session.frozen_until = Some(now + f64::from(lag));
                session.arbiter.lock(lag, now);
                Some(format!("⟳ Connection Lost... ({lag:.0}ms)"))
            }
            _ => None,
        };
        log::info!("Disruption: {}", rolls.disruption.as_str());
        session.events.push(GameEvent::Disruption {
            event: rolls.disruption,
            caption,
        });
    }

    if rolls.camera_shake {
        session.events.push(GameEvent::CameraShake);
    }
    session.camera_tilt = rolls.camera_tilt;
}

/// Move the track in slices no longer than `MAX_STEP_MS`, resolving
/// collisions after each slice so nothing passes through the player.
fn advance_track(session: &mut GameSession, dt_ms: f32, chaos: f32) {
    let mut remaining = dt_ms;
    while remaining > 0.0 && session.phase == SessionPhase::Running {
        let step = remaining.min(MAX_STEP_MS);
        remaining -= step;

        let report = session
            .track
            .advance(step, chaos, &session.tuning, &mut session.rng);
        if !report.culled.is_empty() {
            log::debug!("Culled {:?}", report.culled);
        }

        // Score the distance before a hit can end the run
        let score = (session.track.position / SCORE_DISTANCE_UNIT) as u32;
        session.score.raise_to(score);

        resolve_collisions(session);
    }
}

fn resolve_collisions(session: &mut GameSession) {
    let outcome = session.judge.check(
        session.player.lane,
        session.tuning.player_depth,
        &mut session.track.obstacles,
    );
    match outcome {
        Outcome::None => {}
        Outcome::DecoyHit(id) => {
            log::debug!("Decoy #{} popped", id);
            session.events.push(GameEvent::DecoyPopped { id });
        }
        Outcome::LethalHit(obstacle) => {
            session.track.remove(obstacle.id);
            session.die(format!("Died to {}", obstacle.glyph));
        }
    }
}

/// Demo-mode steering: if a deadly obstacle is coming down the player's
/// lane, head for the nearest lane that is clear.
pub fn autopilot_press(session: &GameSession) -> Option<Direction> {
    let player_depth = session.tuning.player_depth;
    let tolerance = session.judge.tolerance;
    let threatened = |lane: u8| {
        session.track.obstacles.iter().any(|o| {
            o.active
                && o.kind == ObstacleKind::Deadly
                && o.lane == lane
                && o.depth >= player_depth - tolerance
                && o.depth <= player_depth + AUTOPILOT_LOOKAHEAD
        })
    };

    let lane = session.player.lane;
    if !threatened(lane) {
        return None;
    }

    (0..LANE_COUNT)
        .filter(|&l| l != lane && !threatened(l))
        .min_by_key(|&l| (i32::from(l) - i32::from(lane)).abs())
        .and_then(|target| Direction::from_delta((i32::from(target) - i32::from(lane)).signum()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SessionConfig;
    use crate::sim::track::Obstacle;
    use crate::tuning::Tuning;

    const FRAME_MS: f32 = 1000.0 / 60.0;

    fn running(seed: u64) -> GameSession {
        let mut session =
            GameSession::new(seed, SessionConfig::default(), Tuning::default(), 0).unwrap();
        session.start();
        session.drain_events();
        session
    }

    fn place(session: &mut GameSession, lane: u8, depth: f32, kind: ObstacleKind) -> u32 {
        let id = 10_000 + session.track.obstacles.len() as u32;
        session.track.obstacles.push(Obstacle {
            id,
            lane,
            depth,
            kind,
            active: true,
            glyph: "🧱",
        });
        id
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let mut session =
            GameSession::new(1, SessionConfig::default(), Tuning::default(), 0).unwrap();
        tick(&mut session, &TickInput::default(), FRAME_MS);
        assert_eq!(session.phase(), SessionPhase::Init);
        assert_eq!(session.clock_ms(), 0.0);
        assert_eq!(session.track().position, 0.0);
    }

    #[test]
    fn test_tick_moves_track_and_scores() {
        let mut session = running(7);
        for _ in 0..600 {
            // Keep the lane clear so the run survives
            session.track.obstacles.clear();
            tick(&mut session, &TickInput::default(), FRAME_MS);
        }
        assert!(session.is_running());
        assert!(session.track().position > 0.0);
        assert_eq!(
            session.score().current,
            (session.track().position / SCORE_DISTANCE_UNIT) as u32
        );
        assert!(session.chaos() > 0.0);
    }

    #[test]
    fn test_lethal_collision_kills() {
        let mut session = running(3);
        let lane = session.player().lane;
        let depth = session.tuning.player_depth + 5.0;
        place(&mut session, lane, depth, ObstacleKind::Deadly);

        tick(&mut session, &TickInput::default(), FRAME_MS);
        assert_eq!(session.phase(), SessionPhase::Dead);
        assert!(!session.player().alive);
        let summary = session.summary().unwrap();
        assert_eq!(summary.reason, "Died to 🧱");
        assert!(
            session
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Died { .. }))
        );
    }

    #[test]
    fn test_fatal_tick_distance_is_scored() {
        let mut session = running(3);
        session.track.position = 1_099.0;
        let lane = session.player().lane;
        let depth = session.tuning.player_depth + 5.0;
        place(&mut session, lane, depth, ObstacleKind::Deadly);

        tick(&mut session, &TickInput::default(), FRAME_MS);
        assert_eq!(session.phase(), SessionPhase::Dead);
        assert_eq!(session.score().current, 11);
        assert_eq!(session.summary().unwrap().score, 11);
    }

    #[test]
    fn test_decoy_pops_without_killing() {
        let mut session = running(3);
        let lane = session.player().lane;
        let depth = session.tuning.player_depth + 5.0;
        let id = place(&mut session, lane, depth, ObstacleKind::Decoy);

        tick(&mut session, &TickInput::default(), FRAME_MS);
        assert!(session.is_running());
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::DecoyPopped { id }));

        // Popped once only
        tick(&mut session, &TickInput::default(), FRAME_MS);
        assert!(
            !session
                .drain_events()
                .contains(&GameEvent::DecoyPopped { id })
        );
    }

    #[test]
    fn test_dead_session_is_frozen() {
        let mut session = running(11);
        let lane = session.player().lane;
        let depth = session.tuning.player_depth;
        place(&mut session, lane, depth, ObstacleKind::Deadly);
        tick(&mut session, &TickInput::default(), FRAME_MS);
        assert_eq!(session.phase(), SessionPhase::Dead);

        let player = session.player();
        let score = session.score();
        let chaos = session.chaos();
        let obstacles = session.track().obstacles.clone();
        let position = session.track().position;

        let input = TickInput {
            presses: vec![Direction::Left, Direction::Right, Direction::Left],
            autopilot: true,
        };
        for _ in 0..200 {
            tick(&mut session, &input, FRAME_MS);
            session.press(Direction::Right);
        }

        assert_eq!(session.player(), player);
        assert_eq!(session.score(), score);
        assert_eq!(session.chaos(), chaos);
        assert_eq!(session.track().obstacles, obstacles);
        assert_eq!(session.track().position, position);
    }

    #[test]
    fn test_fast_obstacle_cannot_tunnel() {
        let mut session = running(5);
        session.track.speed = session.tuning.max_speed;
        let lane = session.player().lane;
        // One huge frame would carry it far past the player in a single step
        let depth = session.tuning.player_depth + 200.0;
        place(&mut session, lane, depth, ObstacleKind::Deadly);
        tick(&mut session, &TickInput::default(), 1000.0);
        assert_eq!(session.phase(), SessionPhase::Dead);
    }

    #[test]
    fn test_frame_gap_is_clamped() {
        let mut session = running(5);
        session.track.obstacles.clear();
        let before = session.clock_ms();
        tick(&mut session, &TickInput::default(), 10_000.0);
        assert_eq!(session.clock_ms() - before, f64::from(MAX_FRAME_MS));
    }

    #[test]
    fn test_fake_lag_freezes_track_and_input() {
        let config = SessionConfig {
            starting_chaos: 1.0,
            streamer_mode: true,
        };
        let mut session = GameSession::new(21, config, Tuning::default(), 0).unwrap();
        session.start();
        session.track.obstacles.clear();
        let rolls = TickRolls {
            disruption: DisruptionEvent::FakeLag,
            auto_play: false,
            fake_crash: false,
            camera_shake: false,
            camera_tilt: 0.0,
        };
        apply_rolls(&mut session, &rolls);
        assert!(session.is_frozen());
        assert!(session.input_locked());

        session.drain_events();

        let position = session.track().position;
        let chaos = session.chaos();
        tick(&mut session, &TickInput::default(), 100.0);
        assert_eq!(session.track().position, position);
        // The hang stops everything else too
        assert_eq!(session.chaos(), chaos);
        assert_eq!(session.camera_tilt(), 0.0);
        assert!(session.drain_events().is_empty());

        // Longest possible lag is over after this
        for _ in 0..10 {
            session.track.obstacles.clear();
            tick(&mut session, &TickInput::default(), 100.0);
        }
        assert!(session.track().position > position);
    }

    #[test]
    fn test_fake_crash_and_auto_play_lock_input() {
        let mut session = running(21);
        let rolls = TickRolls {
            disruption: DisruptionEvent::None,
            auto_play: true,
            fake_crash: true,
            camera_shake: true,
            camera_tilt: 0.05,
        };
        apply_rolls(&mut session, &rolls);
        assert!(session.input_locked());
        assert_eq!(session.camera_tilt(), 0.05);

        let lane = session.player().lane;
        assert_eq!(
            session.press(Direction::Left),
            crate::sim::Resolution::Ignored
        );
        assert_eq!(session.player().lane, lane);

        let events = session.drain_events();
        assert!(events.contains(&GameEvent::AutoPlay));
        assert!(events.contains(&GameEvent::FakeCrash));
        assert!(events.contains(&GameEvent::CameraShake));
    }

    #[test]
    fn test_chat_disruption_has_caption() {
        let mut session = running(2);
        let rolls = TickRolls {
            disruption: DisruptionEvent::FakeChat,
            auto_play: false,
            fake_crash: false,
            camera_shake: false,
            camera_tilt: 0.0,
        };
        apply_rolls(&mut session, &rolls);
        match session.drain_events().as_slice() {
            [GameEvent::Disruption { event, caption }] => {
                assert_eq!(*event, DisruptionEvent::FakeChat);
                assert!(caption.as_deref().is_some_and(|c| !c.is_empty()));
            }
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and input produce the same run
        let config = SessionConfig {
            starting_chaos: 0.3,
            streamer_mode: true,
        };
        let mut a = GameSession::new(99999, config, Tuning::default(), 0).unwrap();
        let mut b = GameSession::new(99999, config, Tuning::default(), 0).unwrap();
        a.start();
        b.start();

        let input = TickInput {
            presses: Vec::new(),
            autopilot: true,
        };
        for i in 0..3_000 {
            let frame = TickInput {
                presses: if i % 37 == 0 { vec![Direction::Left] } else { Vec::new() },
                ..input.clone()
            };
            tick(&mut a, &frame, FRAME_MS);
            tick(&mut b, &frame, FRAME_MS);
            assert_eq!(a.drain_events(), b.drain_events());
        }

        assert_eq!(a.phase(), b.phase());
        assert_eq!(a.player(), b.player());
        assert_eq!(a.score(), b.score());
        assert_eq!(a.track().obstacles, b.track().obstacles);
        assert_eq!(a.summary(), b.summary());
    }

    #[test]
    fn test_autopilot_steers_off_threatened_lane() {
        let mut session = running(4);
        session.track.obstacles.clear();
        session.player.lane = 1;
        place(&mut session, 1, 400.0, ObstacleKind::Deadly);
        place(&mut session, 0, 400.0, ObstacleKind::Deadly);
        assert_eq!(autopilot_press(&session), Some(Direction::Right));

        // Decoys are not a threat
        session.track.obstacles.clear();
        place(&mut session, 1, 400.0, ObstacleKind::Decoy);
        assert_eq!(autopilot_press(&session), None);
    }

    #[test]
    fn test_presses_clamp_at_edges() {
        let mut session = running(8);
        session.track.obstacles.clear();
        let mut lanes = Vec::new();
        for _ in 0..500 {
            let dir = if lanes.len() % 3 == 0 { Direction::Right } else { Direction::Left };
            session.press(dir);
            lanes.push(session.player().lane);
        }
        assert!(lanes.iter().all(|&l| l < LANE_COUNT));
    }
}
